use std::collections::HashSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::wheel_pointer::resolve;
use crate::wheel_spin::{Spin, SpinState, SpinTick, SpinTiming};

const TRANSPORT_ANCHOR: &str = "/Strategies#Transportation";
const EQUIPMENT_ANCHOR: &str = "/Strategies#Equipment";

/// One entry of a wheel, occupying `weight` segments.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeightedItem {
    pub name: String,
    pub weight: u32,
    #[serde(default)]
    pub display_assets: Vec<String>,
    #[serde(default)]
    pub detail_link: Option<String>,
}

impl WeightedItem {
    pub fn new(name: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            weight,
            display_assets: Vec::new(),
            detail_link: None,
        }
    }

    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.display_assets.push(asset.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.detail_link = Some(link.into());
        self
    }

    pub fn transport_url(&self) -> Option<String> {
        self.detail_link.as_ref().map(|link| format!("{}{}", link, TRANSPORT_ANCHOR))
    }

    pub fn equipment_url(&self) -> Option<String> {
        self.detail_link.as_ref().map(|link| format!("{}{}", link, EQUIPMENT_ANCHOR))
    }

    pub fn has_asset(&self, asset: &str) -> bool {
        self.display_assets.iter().any(|a| a == asset)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WheelConfiguration {
    pub items: Vec<WeightedItem>,
    pub spin_duration_ms: f64,
    pub spin_duration_variance_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NoItems,
    ZeroWeight(String),
    DuplicateName(String),
    InvalidTiming,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoItems => write!(f, "Wheel has no items"),
            ConfigError::ZeroWeight(name) => write!(f, "Item '{}' has zero weight", name),
            ConfigError::DuplicateName(name) => write!(f, "Item '{}' appears more than once", name),
            ConfigError::InvalidTiming => write!(f, "Spin duration and variance must be finite and non-negative"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl WheelConfiguration {
    pub fn total_weight(&self) -> usize {
        self.items.iter().map(|item| item.weight as usize).sum()
    }

    pub fn item(&self, name: &str) -> Option<&WeightedItem> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items.is_empty() {
            return Err(ConfigError::NoItems);
        }

        let mut seen = HashSet::new();
        for item in &self.items {
            if item.weight == 0 {
                return Err(ConfigError::ZeroWeight(item.name.clone()));
            }
            if !seen.insert(item.name.as_str()) {
                return Err(ConfigError::DuplicateName(item.name.clone()));
            }
        }

        let timing_ok = |value: f64| value.is_finite() && value >= 0.0;
        if !timing_ok(self.spin_duration_ms) || !timing_ok(self.spin_duration_variance_ms) {
            return Err(ConfigError::InvalidTiming);
        }

        Ok(())
    }

    pub fn timing(&self) -> SpinTiming {
        SpinTiming {
            duration_ms: self.spin_duration_ms,
            variance_ms: self.spin_duration_variance_ms,
        }
    }
}

/// Flat, shuffled list of item names, one per segment.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct SegmentSequence(pub Vec<String>);

impl SegmentSequence {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn count_of(&self, name: &str) -> usize {
        self.iter().filter(|segment| *segment == name).count()
    }
}

/// Every item appears exactly `weight` times, in uniformly random order.
pub fn distribute_segments<R: Rng + ?Sized>(config: &WheelConfiguration, rng: &mut R) -> SegmentSequence {
    let mut segments = Vec::with_capacity(config.total_weight());
    for item in &config.items {
        for _ in 0..item.weight {
            segments.push(item.name.clone());
        }
    }

    segments.shuffle(rng);
    log::debug!("Distributed {} items over {} segments", config.items.len(), segments.len());
    SegmentSequence(segments)
}

/// Picks one display asset per segment, so repeated items can show different images.
pub fn assign_segment_assets<R: Rng + ?Sized>(
    config: &WheelConfiguration,
    segments: &SegmentSequence,
    rng: &mut R,
) -> Vec<Option<String>> {
    segments
        .iter()
        .map(|name| {
            config
                .item(name)
                .and_then(|item| item.display_assets.choose(&mut *rng))
                .cloned()
        })
        .collect()
}

/// A validated configuration together with its current layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedWheel {
    pub config: WheelConfiguration,
    pub segments: SegmentSequence,
    pub asset_bindings: Vec<Option<String>>,
}

impl LoadedWheel {
    pub fn load<R: Rng + ?Sized>(config: WheelConfiguration, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let segments = distribute_segments(&config, rng);
        let asset_bindings = assign_segment_assets(&config, &segments, rng);
        Ok(Self {
            config,
            segments,
            asset_bindings,
        })
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WheelError {
    SwitchBlocked,
    Config(ConfigError),
}

impl fmt::Display for WheelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelError::SwitchBlocked => write!(f, "Cannot switch wheels while spinning"),
            WheelError::Config(e) => write!(f, "Invalid wheel configuration: {}", e),
        }
    }
}

impl std::error::Error for WheelError {}

impl From<ConfigError> for WheelError {
    fn from(error: ConfigError) -> Self {
        WheelError::Config(error)
    }
}

/// The winning segment of a finished spin.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpinResult {
    pub index: usize,
    pub item: WeightedItem,
    pub asset: Option<String>,
}

/// Represents the current state of the wheel game
#[derive(Debug, Clone)]
pub struct WheelSession {
    wheel: LoadedWheel,
    spin: Spin,
}

impl WheelSession {
    pub fn new<R: Rng + ?Sized>(config: WheelConfiguration, rng: &mut R) -> Result<Self, WheelError> {
        Ok(Self {
            wheel: LoadedWheel::load(config, rng)?,
            spin: Spin::default(),
        })
    }

    pub fn wheel(&self) -> &LoadedWheel {
        &self.wheel
    }

    pub fn rotation(&self) -> f64 {
        self.spin.rotation()
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_spinning()
    }

    /// Replaces the wheel with a freshly shuffled layout. Rotation carries over.
    pub fn load<R: Rng + ?Sized>(&mut self, config: WheelConfiguration, rng: &mut R) -> Result<(), WheelError> {
        if self.spin.is_spinning() {
            log::warn!("Ignoring wheel switch while spinning");
            return Err(WheelError::SwitchBlocked);
        }
        self.wheel = LoadedWheel::load(config, rng)?;
        Ok(())
    }

    /// Returns false when a spin is already running.
    pub fn request_spin<R: Rng + ?Sized>(&mut self, now: f64, rng: &mut R) -> bool {
        let (spin, started) = std::mem::take(&mut self.spin).start(self.wheel.config.timing(), now, rng);
        self.spin = spin;
        started
    }

    pub fn begin_spin(&mut self, state: SpinState) -> bool {
        let (spin, started) = std::mem::take(&mut self.spin).begin(state);
        self.spin = spin;
        started
    }

    pub fn tick(&mut self, now: f64) -> SpinTick {
        let (spin, tick) = std::mem::take(&mut self.spin).tick(now, self.wheel.segment_count());
        self.spin = spin;
        tick
    }

    pub fn current_segment(&self) -> usize {
        resolve(self.rotation(), self.wheel.segment_count())
    }

    pub fn result_for(&self, index: usize) -> Option<SpinResult> {
        let name = self.wheel.segments.get(index)?;
        let item = self.wheel.config.item(name)?.clone();
        let asset = self.wheel.asset_bindings.get(index).cloned().flatten();
        Some(SpinResult { index, item, asset })
    }
}
