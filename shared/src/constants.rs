pub const NOTIFY_ENDPOINT: &str = "/api/notify";
pub const NOTIFY_STATUS_ENDPOINT: &str = "/api/notify/status";
pub const MODES_ENDPOINT: &str = "/api/modes";
pub const HEALTH_CHECK_ENDPOINT: &str = "/api/health_check";
pub const TOTP_SETUP_ENDPOINT: &str = "/totp/setup";

pub const DISCORD_WEBHOOK_BASE: &str = "https://discord.com/api/webhooks";

pub const INVALID_CODE_ERROR: &str = "Invalid code";
pub const NOTIFY_DISABLED_ERROR: &str = "Discord integration is disabled";
pub const UNKNOWN_MODE_ERROR: &str = "Unknown wheel mode";
pub const UNKNOWN_ITEM_ERROR: &str = "Unknown wheel item";
pub const NETWORK_ERROR: &str = "Network error. Please try again";

pub const APP_TITLE: &str = "OSRS Boss Wheel";

pub const CODE_LENGTH: usize = 6;
