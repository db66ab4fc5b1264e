use crate::error::ValidationError;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fmt::Write as _,
    sync::Arc,
};

/// Allowed drift when comparing chance totals against 100%.
pub const CHANCE_TOLERANCE: f64 = 1e-3;

const FULL_CHANCE: f64 = 100.0;
const DEFAULT_RATIO: f64 = 1.0;

/// One prize option as written in the config. `chance` and `ratio` are optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionConfig {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
}

impl OptionConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            chance: None,
            ratio: None,
        }
    }

    pub fn with_chance(mut self, chance: f64) -> Self {
        self.chance = Some(chance);
        self
    }

    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = Some(ratio);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedOption {
    pub label: String,
    /// The chance as configured; `None` for auto-filled options.
    pub chance: Option<f64>,
    /// Visual slice weight. Never affects the odds.
    pub ratio: f64,
    /// Win probability in percent. Never affects the slice size.
    pub resolved_chance: f64,
}

impl ResolvedOption {
    pub fn is_auto(&self) -> bool {
        self.chance.is_none()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResolutionSummary {
    pub missing_chance_count: usize,
    pub missing_ratio_count: usize,
    pub auto_chance: f64,
    pub total_ratio: f64,
}

/// A validated, non-empty option list. Cloning shares the same options.
#[derive(Clone, Debug, PartialEq)]
pub struct Wheel {
    options: Arc<[ResolvedOption]>,
    summary: ResolutionSummary,
}

impl Wheel {
    pub fn options(&self) -> &[ResolvedOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Always `false`; an empty wheel cannot be resolved.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ResolvedOption> {
        self.options.get(index)
    }

    pub fn total_ratio(&self) -> f64 {
        self.summary.total_ratio
    }

    pub fn summary(&self) -> ResolutionSummary {
        self.summary
    }

    /// Human-readable chance and ratio breakdown, one line per option.
    pub fn breakdown(&self) -> String {
        let summary = self.summary;
        let mut out = String::new();
        if summary.missing_chance_count > 0 {
            let _ = writeln!(
                out,
                "{} option(s) will auto-fill with {:.2}% each.",
                summary.missing_chance_count, summary.auto_chance
            );
        }
        if summary.missing_ratio_count > 0 {
            let _ = writeln!(
                out,
                "{} option(s) missing ratio will default to 1 (equal proportion baseline).",
                summary.missing_ratio_count
            );
        }
        let _ = writeln!(out, "Chances breakdown:");
        for opt in self.options() {
            let _ = writeln!(out, "- {}: {}%", opt.label, opt.resolved_chance);
        }
        let _ = writeln!(out, "Ratio breakdown (visual slice size):");
        for opt in self.options() {
            let portion = opt.ratio / summary.total_ratio * 100.0;
            let _ = writeln!(out, "- {}: ratio {} ({portion:.2}%)", opt.label, opt.ratio);
        }
        out
    }
}

/// Validates `configs` and fills in every missing chance and ratio.
///
/// Options without a chance split whatever the explicit chances leave of 100%
/// equally, regardless of their ratio. Output order matches input order.
pub fn resolve(configs: &[OptionConfig]) -> Result<Wheel, ValidationError> {
    if configs.is_empty() {
        return Err(ValidationError::EmptyConfig);
    }

    let mut explicit_total = 0.0;
    let mut total_ratio = 0.0;
    let mut auto_count = 0usize;
    let mut missing_ratio_count = 0usize;

    for (index, config) in configs.iter().enumerate() {
        if config.label.trim().is_empty() {
            return Err(ValidationError::InvalidLabel {
                index,
                entry: describe_entry(config),
            });
        }
        match config.ratio {
            Some(ratio) if !ratio.is_finite() || ratio <= 0.0 => {
                return Err(ValidationError::InvalidRatio {
                    label: config.label.clone(),
                    value: ratio.to_string(),
                });
            }
            Some(ratio) => total_ratio += ratio,
            None => {
                missing_ratio_count += 1;
                total_ratio += DEFAULT_RATIO;
            }
        }
        // individually valid ratios can still overflow the slice geometry
        if !total_ratio.is_finite() {
            return Err(ValidationError::InvalidRatio {
                label: config.label.clone(),
                value: config.ratio.unwrap_or(DEFAULT_RATIO).to_string(),
            });
        }
        match config.chance {
            Some(chance) if !chance.is_finite() || chance < 0.0 => {
                return Err(ValidationError::InvalidChance {
                    label: config.label.clone(),
                    value: chance.to_string(),
                });
            }
            Some(chance) => explicit_total += chance,
            None => auto_count += 1,
        }
    }

    if explicit_total > FULL_CHANCE + CHANCE_TOLERANCE {
        return Err(ValidationError::ChanceOverflow {
            total: explicit_total,
        });
    }

    let auto_chance = if auto_count == 0 {
        if (explicit_total - FULL_CHANCE).abs() > CHANCE_TOLERANCE {
            return Err(ValidationError::ChanceTotalMismatch {
                total: explicit_total,
            });
        }
        0.0
    } else {
        let remaining = FULL_CHANCE - explicit_total;
        if remaining < 0.0 {
            return Err(ValidationError::ChanceOverflow {
                total: explicit_total,
            });
        }
        remaining / auto_count as f64
    };

    let options: Arc<[ResolvedOption]> = configs
        .iter()
        .map(|config| ResolvedOption {
            label: config.label.clone(),
            chance: config.chance,
            ratio: config.ratio.unwrap_or(DEFAULT_RATIO),
            resolved_chance: config.chance.unwrap_or(auto_chance),
        })
        .collect();

    tracing::debug!(
        options = options.len(),
        auto_count,
        auto_chance,
        explicit_total,
        "resolved wheel options"
    );

    Ok(Wheel {
        options,
        summary: ResolutionSummary {
            missing_chance_count: auto_count,
            missing_ratio_count,
            auto_chance,
            total_ratio,
        },
    })
}

fn describe_entry(config: &OptionConfig) -> String {
    serde_json::to_string(config).unwrap_or_else(|_| format!("{config:?}"))
}
