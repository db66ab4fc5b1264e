use thiserror::Error;

/// Why an option list was rejected. Every variant is fatal to resolution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Wheel must have at least one option.")]
    EmptyConfig,

    #[error("Each option must have a non-empty \"label\" string. Got entry {index}: {entry}")]
    InvalidLabel { index: usize, entry: String },

    #[error("Option \"{label}\" has invalid ratio ({value}). Ratio must be a positive number.")]
    InvalidRatio { label: String, value: String },

    #[error("Option \"{label}\" has invalid chance ({value}). Chance must be a number >= 0.")]
    InvalidChance { label: String, value: String },

    #[error("Total explicit chances add up to {total}%, which exceeds 100%.")]
    ChanceOverflow { total: f64 },

    #[error("Total chances add up to {total}%, but must equal 100%.")]
    ChanceTotalMismatch { total: f64 },
}

/// Field-less view of [`ValidationError`] for callers that only branch on the kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationKind {
    EmptyConfig,
    InvalidLabel,
    InvalidRatio,
    InvalidChance,
    ChanceOverflow,
    ChanceTotalMismatch,
}

impl ValidationError {
    pub fn kind(&self) -> ValidationKind {
        match self {
            ValidationError::EmptyConfig => ValidationKind::EmptyConfig,
            ValidationError::InvalidLabel { .. } => ValidationKind::InvalidLabel,
            ValidationError::InvalidRatio { .. } => ValidationKind::InvalidRatio,
            ValidationError::InvalidChance { .. } => ValidationKind::InvalidChance,
            ValidationError::ChanceOverflow { .. } => ValidationKind::ChanceOverflow,
            ValidationError::ChanceTotalMismatch { .. } => {
                ValidationKind::ChanceTotalMismatch
            }
        }
    }
}

/// Failures while turning a raw payload (file or endpoint body) into a wheel.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The endpoint answered `{ "ok": false }`.
    #[error("{0}")]
    Endpoint(String),

    #[error("Options payload must be an array or {{ \"options\": [...] }}.")]
    MissingOptions,

    #[error("Options payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read options file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl LoadError {
    /// The validation kind, when the payload was well-formed but the options were not.
    pub fn validation_kind(&self) -> Option<ValidationKind> {
        match self {
            LoadError::Validation(err) => Some(err.kind()),
            _ => None,
        }
    }
}
