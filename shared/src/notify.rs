use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{INVALID_CODE_ERROR, NOTIFY_DISABLED_ERROR};
use crate::shared_wheel_game::WheelConfiguration;
use crate::validation::*;
use crate::wheel_modes::WheelMode;

/// The code is checked by the notifier itself so that a disabled
/// integration is reported before anything about the code.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct NotifyRequest {
    #[validate(custom = "validate_mode")]
    pub mode: String,
    #[validate(length(min = 1, max = 100))]
    pub item: String,
    #[serde(default)]
    pub asset: Option<String>,
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotifyResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct NotifyStatusResponse {
    pub enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ModeEntry {
    pub mode: WheelMode,
    pub configuration: WheelConfiguration,
}

impl ModeEntry {
    pub fn all() -> Vec<ModeEntry> {
        WheelMode::ALL
            .iter()
            .map(|mode| ModeEntry {
                mode: *mode,
                configuration: mode.configuration(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotifyError {
    Disabled,
    InvalidCode,
    Transport(String),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::Disabled => write!(f, "{}", NOTIFY_DISABLED_ERROR),
            NotifyError::InvalidCode => write!(f, "{}", INVALID_CODE_ERROR),
            NotifyError::Transport(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for NotifyError {}
