//! Procedurally generated sound effects.
//!
//! Every tone is a handful of sine partials behind an exponentially
//! decaying gain, scheduled on a single shared `AudioContext`.

use std::cell::RefCell;

use wasm_bindgen::JsValue;
use web_sys::{AudioContext, OscillatorType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneKind {
    /// Short tick when the pointer passes a segment boundary.
    Click,
    /// Bell chord when the wheel stops.
    Win,
}

struct ToneSpec {
    partials: &'static [(f32, f32)], // (frequency Hz, amplitude)
    duration_secs: f64,
    level: f32,
}

const SILENCE: f32 = 0.0001;

impl ToneKind {
    fn spec(&self) -> ToneSpec {
        match self {
            ToneKind::Click => ToneSpec {
                partials: &[(800.0, 1.0)],
                duration_secs: 0.05,
                level: 0.3,
            },
            ToneKind::Win => ToneSpec {
                partials: &[(800.0, 0.5), (1000.0, 0.3), (1200.0, 0.2)],
                duration_secs: 1.0,
                level: 0.5,
            },
        }
    }
}

thread_local! {
    static AUDIO: RefCell<Option<AudioContext>> = const { RefCell::new(None) };
}

fn with_context<T>(f: impl FnOnce(&AudioContext) -> Result<T, JsValue>) -> Result<T, JsValue> {
    AUDIO.with(|audio| {
        let mut audio = audio.borrow_mut();
        if audio.is_none() {
            *audio = Some(AudioContext::new()?);
        }
        match audio.as_ref() {
            Some(context) => f(context),
            None => Err(JsValue::from_str("audio unavailable")),
        }
    })
}

fn schedule(kind: ToneKind) -> Result<(), JsValue> {
    let spec = kind.spec();
    with_context(|context| {
        // Browsers keep the context suspended until a user gesture
        let _ = context.resume()?;

        let start = context.current_time();
        let end = start + spec.duration_secs;

        for &(frequency, amplitude) in spec.partials {
            let oscillator = context.create_oscillator()?;
            oscillator.set_type(OscillatorType::Sine);
            oscillator.frequency().set_value(frequency);

            let gain = context.create_gain()?;
            let peak = (amplitude * spec.level).max(SILENCE);
            gain.gain().set_value_at_time(peak, start)?;
            gain.gain().exponential_ramp_to_value_at_time(SILENCE, end)?;

            oscillator.connect_with_audio_node(&gain)?;
            gain.connect_with_audio_node(&context.destination())?;
            oscillator.start_with_when(start)?;
            oscillator.stop_with_when(end)?;
        }
        Ok(())
    })
}

/// Fire and forget. Audio failures never interrupt the wheel.
pub fn produce_tone(kind: ToneKind) {
    if let Err(e) = schedule(kind) {
        log::debug!("Could not play {:?} tone: {:?}", kind, e);
    }
}
