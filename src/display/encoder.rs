use std::fs;
use std::path::{Path, PathBuf};

use crate::display::error::ShowError;
use crate::display::figure::{self, SaveOptions};
use crate::display::value::{ShowValue, StructuredValue};

/// Write `value` into `dir` under `base_name`, picking the extension from
/// the serialization family. Returns the written path.
pub(crate) fn write_artifact(
    dir: &Path,
    base_name: &str,
    value: &ShowValue,
    prefix: Option<&str>,
) -> Result<PathBuf, ShowError> {
    match value {
        ShowValue::Figure => {
            let path = dir.join(format!("{}.png", base_name));
            figure::save_current_figure(&path, &SaveOptions::default())?;
            println!("Saved figure to {}", path.display());
            Ok(path)
        }
        ShowValue::Dataset(summary) => write_text(dir, base_name, summary, prefix, "dataset"),
        ShowValue::Text(text) => write_text(dir, base_name, text, prefix, "text"),
        ShowValue::Structured(value) => write_structured(dir, base_name, value, prefix),
    }
}

fn write_text(
    dir: &Path,
    base_name: &str,
    body: &str,
    prefix: Option<&str>,
    kind: &str,
) -> Result<PathBuf, ShowError> {
    let path = dir.join(format!("{}.txt", base_name));
    fs::write(&path, apply_prefix(body, prefix))?;
    println!("Saved {} to {}", kind, path.display());
    Ok(path)
}

// Ordered encoder attempts for structured data. A serialization failure
// moves on to the next encoder; an IO failure always propagates.
const ENCODERS: &[(
    &str,
    &str,
    fn(&StructuredValue) -> Result<String, String>,
)] = &[
    ("JSON", "json", encode_json),
    ("pretty-printed", "txt", encode_pretty),
    ("plain string", "txt", encode_plain),
];

fn write_structured(
    dir: &Path,
    base_name: &str,
    value: &StructuredValue,
    prefix: Option<&str>,
) -> Result<PathBuf, ShowError> {
    let mut last_error = String::new();
    for (label, extension, encode) in ENCODERS {
        match encode(value) {
            Ok(body) => {
                let path = dir.join(format!("{}.{}", base_name, extension));
                fs::write(&path, apply_prefix(&body, prefix))?;
                println!(
                    "Saved object to {} with {} serialization",
                    path.display(),
                    label
                );
                return Ok(path);
            }
            Err(error) => last_error = error,
        }
    }

    // The plain string encoder cannot fail; reaching this point means the
    // value has no usable representation at all.
    Err(ShowError::Serialization(last_error))
}

fn encode_json(value: &StructuredValue) -> Result<String, String> {
    let json = value
        .json()
        .ok_or_else(|| "value is not representable in JSON".to_string())?;
    serde_json::to_string_pretty(json).map_err(|error| error.to_string())
}

fn encode_pretty(value: &StructuredValue) -> Result<String, String> {
    // Captured eagerly at classification time, so nothing to go wrong here
    Ok(value.pretty().to_string())
}

fn encode_plain(value: &StructuredValue) -> Result<String, String> {
    Ok(value.plain().to_string())
}

fn apply_prefix(body: &str, prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) => format!("{}\n{}", prefix, body),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_text_artifact_with_prefix() {
        let dir = tempdir().unwrap();
        let value = ShowValue::from("3");

        let path = write_artifact(dir.path(), "C_0", &value, Some("Routing file")).unwrap();

        assert_eq!(path, dir.path().join("C_0.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "Routing file\n3");
    }

    #[test]
    fn test_json_artifact_round_trips() {
        let dir = tempdir().unwrap();
        let original = serde_json::json!({"cycle": 0, "lead_times": [1, 2, 3]});
        let value = ShowValue::from(original.clone());

        let path = write_artifact(dir.path(), "C_0", &value, None).unwrap();

        assert_eq!(path, dir.path().join("C_0.json"));
        let written = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_unrepresentable_value_falls_back_to_text() {
        let dir = tempdir().unwrap();
        let mut by_cell: HashMap<(i32, i32), f64> = HashMap::new();
        by_cell.insert((1, 1), 0.5);
        let value = ShowValue::structured(&by_cell);

        let path = write_artifact(dir.path(), "C_0", &value, None).unwrap();

        assert_eq!(path, dir.path().join("C_0.txt"));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("0.5"));
    }

    #[test]
    fn test_prefix_applies_to_json_artifacts() {
        let dir = tempdir().unwrap();
        let value = ShowValue::from(serde_json::json!([1, 2]));

        let path = write_artifact(dir.path(), "C_3", &value, Some("leads")).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("leads\n"));
    }
}
