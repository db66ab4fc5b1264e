pub mod debug_wheel;
pub mod i18n;
pub mod options_source;
pub mod player;
pub mod spin;
pub mod winner_log;
