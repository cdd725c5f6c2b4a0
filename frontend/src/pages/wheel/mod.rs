mod code_entry;
mod wheel_canvas;
mod wheel_utils;

use std::cell::RefCell;
use std::rc::Rc;

use gloo_render::{request_animation_frame, AnimationFrame};
use gloo_timers::future::TimeoutFuture;
use rand::thread_rng;
use shared::constants::APP_TITLE;
use shared::notify::NotifyRequest;
use shared::shared_wheel_game::{LoadedWheel, SpinResult, WheelError, WheelSession};
use shared::wheel_modes::WheelMode;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::{fetch_notify_status, post_notify};
use crate::sound::{produce_tone, ToneKind};
use crate::styles;

use code_entry::CodeEntryModal;
use wheel_canvas::WheelCanvas;
use wheel_utils::{ModeSelector, ResultDisplay, SpinButton};

// Small pause so the wheel visibly settles before the modal covers it
const RESULT_REVEAL_DELAY_MS: u32 = 100;

type FrameSlot = Rc<RefCell<Option<AnimationFrame>>>;

/// The state an animation frame writes back into the component.
#[derive(Clone)]
struct FrameTargets {
    session: Rc<RefCell<WheelSession>>,
    frame: FrameSlot,
    rotation: UseStateHandle<f64>,
    is_spinning: UseStateHandle<bool>,
    result: UseStateHandle<Option<SpinResult>>,
    show_result: UseStateHandle<bool>,
}

fn schedule_frame(targets: FrameTargets) {
    let slot = targets.frame.clone();
    let handle = request_animation_frame(move |_| animate(targets));
    *slot.borrow_mut() = Some(handle);
}

fn animate(targets: FrameTargets) {
    let tick = targets.session.borrow_mut().tick(js_sys::Date::now());
    targets.rotation.set(tick.rotation);

    if tick.crossed.is_some() {
        produce_tone(ToneKind::Click);
    }

    let Some(winner) = tick.completed else {
        schedule_frame(targets);
        return;
    };

    targets.frame.borrow_mut().take();
    targets.is_spinning.set(false);
    targets.result.set(targets.session.borrow().result_for(winner));
    produce_tone(ToneKind::Win);

    let show_result = targets.show_result.clone();
    spawn_local(async move {
        TimeoutFuture::new(RESULT_REVEAL_DELAY_MS).await;
        show_result.set(true);
    });
}

#[function_component(WheelPage)]
pub fn wheel_page() -> Html {
    let session = use_mut_ref(|| {
        WheelSession::new(WheelMode::default().configuration(), &mut thread_rng())
            .expect("built-in wheel tables are valid")
    });
    let frame: FrameSlot = use_mut_ref(|| None);

    let mode = use_state(WheelMode::default);
    let wheel = use_state(|| Rc::new(session.borrow().wheel().clone()));
    let rotation = use_state(|| 0.0_f64);
    let is_spinning = use_state(|| false);
    let result = use_state(|| None::<SpinResult>);
    let show_result = use_state(|| false);

    let announce_enabled = use_state(|| false);
    let show_code = use_state(|| false);
    let submitting = use_state(|| false);
    let code_error = use_state(|| None::<String>);
    let announce_message = use_state(|| None::<Result<String, String>>);

    // Ask the backend whether announcing is available
    {
        let announce_enabled = announce_enabled.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match fetch_notify_status().await {
                    Ok(enabled) => announce_enabled.set(enabled),
                    Err(e) => {
                        log::warn!("Could not fetch notify status: {}", e);
                        announce_enabled.set(false);
                    }
                }
            });
            || ()
        });
    }

    // Stop the animation if the page goes away mid-spin
    {
        let frame = frame.clone();
        use_effect_with((), move |_| {
            move || {
                frame.borrow_mut().take();
            }
        });
    }

    let start_spin = {
        let targets = FrameTargets {
            session: session.clone(),
            frame: frame.clone(),
            rotation: rotation.clone(),
            is_spinning: is_spinning.clone(),
            result: result.clone(),
            show_result: show_result.clone(),
        };
        let announce_message = announce_message.clone();
        Callback::from(move |_: MouseEvent| {
            let started = targets
                .session
                .borrow_mut()
                .request_spin(js_sys::Date::now(), &mut thread_rng());
            if !started {
                return;
            }

            targets.is_spinning.set(true);
            targets.result.set(None);
            targets.show_result.set(false);
            announce_message.set(None);
            schedule_frame(targets.clone());
        })
    };

    let on_mode_change = {
        let session = session.clone();
        let mode = mode.clone();
        let wheel = wheel.clone();
        let result = result.clone();
        Callback::from(move |next: WheelMode| {
            if next == *mode {
                return;
            }
            let loaded = session.borrow_mut().load(next.configuration(), &mut thread_rng());
            match loaded {
                Ok(()) => {
                    log::info!("Switched to the {} wheel", next);
                    mode.set(next);
                    wheel.set(Rc::new(session.borrow().wheel().clone()));
                    result.set(None);
                }
                Err(WheelError::SwitchBlocked) => {}
                Err(e) => log::error!("Could not load the {} wheel: {}", next, e),
            }
        })
    };

    let on_close_result = {
        let show_result = show_result.clone();
        let announce_message = announce_message.clone();
        Callback::from(move |_: ()| {
            show_result.set(false);
            announce_message.set(None);
        })
    };

    let on_announce = {
        let show_code = show_code.clone();
        let code_error = code_error.clone();
        Callback::from(move |_: ()| {
            code_error.set(None);
            show_code.set(true);
        })
    };

    let on_close_code = {
        let show_code = show_code.clone();
        let submitting = submitting.clone();
        Callback::from(move |_: ()| {
            if !*submitting {
                show_code.set(false);
            }
        })
    };

    let on_submit_code = {
        let mode = mode.clone();
        let result = result.clone();
        let show_code = show_code.clone();
        let submitting = submitting.clone();
        let code_error = code_error.clone();
        let announce_message = announce_message.clone();
        Callback::from(move |code: String| {
            let Some(winner) = (*result).clone() else {
                return;
            };
            if *submitting {
                return;
            }

            let request = NotifyRequest {
                mode: mode.label().to_string(),
                item: winner.item.name.clone(),
                asset: winner.asset.clone(),
                code,
            };

            submitting.set(true);
            code_error.set(None);

            let show_code = show_code.clone();
            let submitting = submitting.clone();
            let code_error = code_error.clone();
            let announce_message = announce_message.clone();
            spawn_local(async move {
                match post_notify(&request).await {
                    Ok(response) => {
                        show_code.set(false);
                        announce_message.set(Some(Ok(response.message)));
                    }
                    Err(e) => {
                        log::warn!("Announcement failed: {}", e);
                        code_error.set(Some(e));
                    }
                }
                submitting.set(false);
            });
        })
    };

    let current_wheel: Rc<LoadedWheel> = (*wheel).clone();

    html! {
        <div class={styles::CARD}>
            <h1 class={styles::TEXT_H1}>{ APP_TITLE }</h1>

            <ModeSelector
                selected={*mode}
                disabled={*is_spinning}
                onchange={on_mode_change}
            />

            <WheelCanvas
                wheel={current_wheel}
                rotation={*rotation}
                is_spinning={*is_spinning}
                onclick={start_spin.clone()}
            />

            <SpinButton is_spinning={*is_spinning} onclick={start_spin} />

            <ResultDisplay
                result={(*result).clone()}
                show={*show_result && !*show_code}
                announce_enabled={*announce_enabled}
                announce_message={(*announce_message).clone()}
                on_close={on_close_result}
                {on_announce}
            />

            <CodeEntryModal
                show={*show_code}
                submitting={*submitting}
                error={(*code_error).clone()}
                on_submit={on_submit_code}
                on_close={on_close_code}
            />
        </div>
    }
}
