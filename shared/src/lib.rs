pub mod constants;
pub mod validation;
pub mod wheel_pointer;
pub mod wheel_spin;
pub mod shared_wheel_game;
pub mod wheel_modes;
pub mod totp;
pub mod code_entry;
pub mod notify;
