use crate::options::{
    OptionConfig,
    ResolvedOption,
};

pub fn explicit(label: &str, chance: f64, ratio: f64) -> OptionConfig {
    OptionConfig::new(label).with_chance(chance).with_ratio(ratio)
}

pub fn auto(label: &str) -> OptionConfig {
    OptionConfig::new(label)
}

/// A resolved option built directly, bypassing validation.
pub fn resolved(label: &str, resolved_chance: f64, ratio: f64) -> ResolvedOption {
    ResolvedOption {
        label: label.to_string(),
        chance: Some(resolved_chance),
        ratio,
        resolved_chance,
    }
}

/// `count` equal slices with equal odds.
pub fn uniform_wheel(count: usize) -> Vec<ResolvedOption> {
    let chance = 100.0 / count as f64;
    (0..count)
        .map(|i| resolved(&format!("slice-{i}"), chance, 1.0))
        .collect()
}

pub fn total_resolved_chance(options: &[ResolvedOption]) -> f64 {
    options.iter().map(|opt| opt.resolved_chance).sum()
}

/// The JSON a spreadsheet endpoint returns for a small mixed wheel.
pub fn sheet_payload() -> serde_json::Value {
    serde_json::json!({
        "ok": true,
        "options": [
            { "label": " Free Lesson ", "chance": "30%", "ratio": "1.5" },
            { "label": "Notebook", "chance": 20, "ratio": null },
            { "label": "Sticker", "chance": "", "ratio": 1 },
            { "label": "", "chance": null, "ratio": "" },
            { "label": "Try Again" }
        ]
    })
}
