//! Fixed wheel and player for exercising the spin without the form.

use crate::player::PlayerInfo;
use wheel_core::{
    OptionConfig,
    ValidationError,
    Wheel,
    resolve,
};

const DEBUG_OPTIONS: [(&str, f64, f64); 6] = [
    ("Debug Option A", 15.0, 1.0),
    ("Debug Option B", 20.0, 1.4),
    ("Debug Option C", 10.0, 0.8),
    ("Debug Option D", 18.0, 1.3),
    ("Debug Option E", 12.0, 0.9),
    ("Debug Option F", 25.0, 1.6),
];

pub fn debug_wheel() -> Result<Wheel, ValidationError> {
    let configs: Vec<OptionConfig> = DEBUG_OPTIONS
        .iter()
        .map(|(label, chance, ratio)| {
            OptionConfig::new(*label).with_chance(*chance).with_ratio(*ratio)
        })
        .collect();
    resolve(&configs)
}

pub fn debug_player() -> PlayerInfo {
    PlayerInfo {
        email: "debug@example.com".to_string(),
        phone: "+84 999 999 999".to_string(),
    }
}
