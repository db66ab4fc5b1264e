use crate::{
    error::{
        LoadError,
        ValidationError,
    },
    options::{
        OptionConfig,
        Wheel,
        resolve,
    },
};
use serde_json::Value;
use sha2::{
    Digest,
    Sha256,
};
use std::{
    fs,
    path::Path,
};

const DEFAULT_ENDPOINT_ERROR: &str = "Options endpoint returned an error.";

#[derive(Clone, Copy, Debug)]
enum NumberField {
    Chance,
    Ratio,
}

impl NumberField {
    fn invalid(self, label: &str, value: String) -> ValidationError {
        let label = label.to_string();
        match self {
            NumberField::Chance => ValidationError::InvalidChance { label, value },
            NumberField::Ratio => ValidationError::InvalidRatio { label, value },
        }
    }
}

/// Coerces a loosely typed payload into option configs.
///
/// Accepts a bare array or `{ "options": [...] }`. Numbers may arrive as
/// strings, optionally suffixed with `%`. Fully blank rows are skipped.
pub fn parse_payload(payload: &Value) -> Result<Vec<OptionConfig>, LoadError> {
    if let Value::Object(map) = payload
        && map.get("ok") == Some(&Value::Bool(false))
    {
        let message = map
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_ENDPOINT_ERROR);
        return Err(LoadError::Endpoint(message.to_string()));
    }

    let entries = match payload {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("options") {
            Some(Value::Array(items)) => items,
            _ => return Err(LoadError::MissingOptions),
        },
        _ => return Err(LoadError::MissingOptions),
    };

    let mut configs = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let Value::Object(fields) = entry else {
            return Err(ValidationError::InvalidLabel {
                index,
                entry: entry.to_string(),
            }
            .into());
        };
        let label = fields
            .get("label")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default()
            .to_string();
        let display = if label.is_empty() {
            format!("<index:{index}>")
        } else {
            label.clone()
        };
        let chance = coerce_number(fields.get("chance"), NumberField::Chance, &display)?;
        let ratio = coerce_number(fields.get("ratio"), NumberField::Ratio, &display)?;

        if label.is_empty() {
            if chance.is_none() && ratio.is_none() {
                tracing::trace!(index, "skipping blank option row");
                continue;
            }
            // report the row's position in the payload, not after blank rows are dropped
            return Err(ValidationError::InvalidLabel {
                index,
                entry: entry.to_string(),
            }
            .into());
        }
        configs.push(OptionConfig {
            label,
            chance,
            ratio,
        });
    }
    Ok(configs)
}

fn coerce_number(
    value: Option<&Value>,
    field: NumberField,
    label: &str,
) -> Result<Option<f64>, ValidationError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let parsed = match value {
        Value::Null => return Ok(None),
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let normalized = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
            normalized.parse::<f64>().ok()
        }
        _ => None,
    };
    match parsed {
        Some(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(field.invalid(label, value.to_string())),
    }
}

/// Parses, coerces and resolves a raw JSON document.
pub fn load_slice(bytes: &[u8]) -> Result<Wheel, LoadError> {
    let payload: Value = serde_json::from_slice(bytes)?;
    let configs = parse_payload(&payload)?;
    Ok(resolve(&configs)?)
}

pub fn load_str(raw: &str) -> Result<Wheel, LoadError> {
    load_slice(raw.as_bytes())
}

pub fn load_file(path: impl AsRef<Path>) -> Result<Wheel, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let wheel = load_slice(&bytes)?;
    tracing::info!(
        path = %path.display(),
        fingerprint = %fingerprint(&bytes),
        options = wheel.len(),
        "loaded wheel options"
    );
    Ok(wheel)
}

/// SHA-256 hex digest of a raw config document.
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use crate::{
        error::ValidationKind,
        test_helpers::sheet_payload,
    };
    use serde_json::json;

    #[test]
    fn parse_payload__coerces_sheet_rows() {
        // given
        let payload = sheet_payload();

        // when
        let configs = parse_payload(&payload).unwrap();

        // then
        let expected = vec![
            OptionConfig::new("Free Lesson").with_chance(30.0).with_ratio(1.5),
            OptionConfig::new("Notebook").with_chance(20.0),
            OptionConfig::new("Sticker").with_ratio(1.0),
            OptionConfig::new("Try Again"),
        ];
        assert_eq!(configs, expected);
    }

    #[test]
    fn parse_payload__accepts_bare_array() {
        // given
        let payload = json!([{ "label": "Only", "chance": 100 }]);

        // when
        let configs = parse_payload(&payload).unwrap();

        // then
        assert_eq!(configs, vec![OptionConfig::new("Only").with_chance(100.0)]);
    }

    #[test]
    fn parse_payload__endpoint_error_is_surfaced() {
        // given
        let payload = json!({ "ok": false, "error": "Sheet is locked" });

        // when
        let err = parse_payload(&payload).unwrap_err();

        // then
        assert!(matches!(err, LoadError::Endpoint(ref msg) if msg == "Sheet is locked"));
    }

    #[test]
    fn parse_payload__endpoint_error_without_message_uses_default() {
        // given
        let payload = json!({ "ok": false, "error": 500 });

        // when
        let err = parse_payload(&payload).unwrap_err();

        // then
        assert_eq!(err.to_string(), DEFAULT_ENDPOINT_ERROR);
    }

    #[test]
    fn parse_payload__object_without_options_is_rejected() {
        for payload in [json!({ "items": [] }), json!("nope"), json!({ "options": {} })] {
            // when
            let err = parse_payload(&payload).unwrap_err();

            // then
            assert!(matches!(err, LoadError::MissingOptions), "payload {payload}");
        }
    }

    #[test]
    fn parse_payload__non_object_entry_is_an_invalid_label() {
        // given
        let payload = json!({ "options": [{ "label": "A" }, 42] });

        // when
        let err = parse_payload(&payload).unwrap_err();

        // then
        match err {
            LoadError::Validation(ValidationError::InvalidLabel { index, entry }) => {
                assert_eq!(index, 1);
                assert_eq!(entry, "42");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn parse_payload__rejects_unparsable_numbers() {
        let cases = [
            (json!([{ "label": "A", "chance": "lots" }]), ValidationKind::InvalidChance),
            (json!([{ "label": "A", "chance": "inf" }]), ValidationKind::InvalidChance),
            (json!([{ "label": "A", "ratio": true }]), ValidationKind::InvalidRatio),
            (json!([{ "label": "A", "ratio": "NaN" }]), ValidationKind::InvalidRatio),
        ];
        for (payload, kind) in cases {
            // when
            let err = parse_payload(&payload).unwrap_err();

            // then
            assert_eq!(err.validation_kind(), Some(kind), "payload {payload}");
        }
    }

    #[test]
    fn parse_payload__unlabelled_number_error_names_the_index() {
        // given
        let payload = json!([{ "label": "A" }, { "chance": "x" }]);

        // when
        let err = parse_payload(&payload).unwrap_err();

        // then
        assert!(err.to_string().contains("<index:1>"), "{err}");
    }

    #[test]
    fn parse_payload__unlabelled_row_reports_its_payload_index() {
        // given
        let payload = json!([
            { "label": "A" },
            { "label": "", "chance": null },
            { "label": "B" },
            { "chance": 25 }
        ]);

        // when
        let err = parse_payload(&payload).unwrap_err();

        // then
        match err {
            LoadError::Validation(ValidationError::InvalidLabel { index, entry }) => {
                assert_eq!(index, 3);
                assert!(entry.contains("25"), "entry was {entry}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn load_str__resolves_coerced_rows() {
        // given
        let raw = sheet_payload().to_string();

        // when
        let wheel = load_str(&raw).unwrap();

        // then
        let chances: Vec<f64> = wheel.options().iter().map(|o| o.resolved_chance).collect();
        assert_eq!(chances, vec![30.0, 20.0, 25.0, 25.0]);
    }

    #[test]
    fn load_str__unlabelled_row_with_values_fails_validation() {
        // given
        let raw = r#"[{ "label": "A", "chance": 50 }, { "label": "  ", "chance": 50 }]"#;

        // when
        let err = load_str(raw).unwrap_err();

        // then
        assert_eq!(err.validation_kind(), Some(ValidationKind::InvalidLabel));
    }

    #[test]
    fn load_str__invalid_json_is_reported() {
        // when
        let err = load_str("{ not json").unwrap_err();

        // then
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn load_str__empty_list_is_empty_config() {
        // when
        let err = load_str("[]").unwrap_err();

        // then
        assert_eq!(err.validation_kind(), Some(ValidationKind::EmptyConfig));
    }

    #[test]
    fn fingerprint__is_sha256_hex() {
        // when
        let digest = fingerprint(b"");

        // then
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
