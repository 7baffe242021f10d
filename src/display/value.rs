use std::fmt;

use serde::Serialize;

/// A value accepted by `show`, classified into its serialization family.
#[derive(Debug, Clone)]
pub enum ShowValue {
    /// The current plotting surface; captured as a PNG image.
    Figure,
    /// A labeled dataset summary; written as its textual representation.
    Dataset(String),
    /// Plain text; written verbatim.
    Text(String),
    /// Arbitrary structured data with fallback representations.
    Structured(StructuredValue),
}

impl ShowValue {
    /// Classify an arbitrary serializable value as structured data.
    ///
    /// The JSON view is captured up front; values the JSON data model cannot
    /// represent keep only their string forms and degrade to a text artifact
    /// when displayed.
    pub fn structured<T: Serialize + fmt::Debug>(value: &T) -> Self {
        ShowValue::Structured(StructuredValue::capture(value))
    }
}

impl From<&str> for ShowValue {
    fn from(text: &str) -> Self {
        ShowValue::Text(text.to_string())
    }
}

impl From<String> for ShowValue {
    fn from(text: String) -> Self {
        ShowValue::Text(text)
    }
}

impl From<serde_json::Value> for ShowValue {
    fn from(value: serde_json::Value) -> Self {
        ShowValue::Structured(StructuredValue {
            pretty: format!("{:#?}", value),
            plain: value.to_string(),
            json: Some(value),
        })
    }
}

impl From<bool> for ShowValue {
    fn from(value: bool) -> Self {
        ShowValue::from(serde_json::Value::from(value))
    }
}

impl From<i32> for ShowValue {
    fn from(value: i32) -> Self {
        ShowValue::from(serde_json::Value::from(value))
    }
}

impl From<i64> for ShowValue {
    fn from(value: i64) -> Self {
        ShowValue::from(serde_json::Value::from(value))
    }
}

impl From<f64> for ShowValue {
    fn from(value: f64) -> Self {
        ShowValue::from(serde_json::Value::from(value))
    }
}

/// Structured data captured with every representation the encoder chain can
/// use: a JSON view when the value is representable, plus pretty and plain
/// string forms that are always obtainable.
#[derive(Debug, Clone)]
pub struct StructuredValue {
    json: Option<serde_json::Value>,
    pretty: String,
    plain: String,
}

impl StructuredValue {
    /// Capture all representations of `value`.
    pub fn capture<T: Serialize + fmt::Debug>(value: &T) -> Self {
        Self {
            json: serde_json::to_value(value).ok(),
            pretty: format!("{:#?}", value),
            plain: format!("{:?}", value),
        }
    }

    pub(crate) fn json(&self) -> Option<&serde_json::Value> {
        self.json.as_ref()
    }

    pub(crate) fn pretty(&self) -> &str {
        &self.pretty
    }

    pub(crate) fn plain(&self) -> &str {
        &self.plain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_strings_classify_as_text() {
        assert!(matches!(ShowValue::from("streamflow"), ShowValue::Text(_)));
        assert!(matches!(
            ShowValue::from(String::from("streamflow")),
            ShowValue::Text(_)
        ));
    }

    #[test]
    fn test_scalars_classify_as_structured() {
        let value = ShowValue::from(3);
        match value {
            ShowValue::Structured(structured) => {
                assert_eq!(structured.json(), Some(&serde_json::json!(3)));
            }
            other => panic!("expected structured value, got {:?}", other),
        }
    }

    #[test]
    fn test_capture_keeps_json_view_for_mappings() {
        let mut cycles = HashMap::new();
        cycles.insert("short_range".to_string(), vec![0, 6, 12, 18]);

        let captured = StructuredValue::capture(&cycles);
        assert!(captured.json().is_some());
        assert!(captured.pretty().contains("short_range"));
    }

    #[derive(Debug, serde::Serialize)]
    struct CycleReport {
        run: String,
        cycles: Vec<u8>,
    }

    #[test]
    fn test_capture_serializable_struct() {
        let report = CycleReport {
            run: "short_range".to_string(),
            cycles: vec![0, 6],
        };

        let value = ShowValue::structured(&report);
        match value {
            ShowValue::Structured(structured) => {
                let json = structured.json().unwrap();
                assert_eq!(json["run"], "short_range");
                assert_eq!(json["cycles"], serde_json::json!([0, 6]));
            }
            other => panic!("expected structured value, got {:?}", other),
        }
    }

    #[test]
    fn test_capture_degrades_unrepresentable_keys() {
        // JSON object keys must be strings; tuple keys are not representable
        let mut by_cell: HashMap<(i32, i32), f64> = HashMap::new();
        by_cell.insert((4, 2), 1.5);

        let captured = StructuredValue::capture(&by_cell);
        assert!(captured.json().is_none());
        assert!(!captured.plain().is_empty());
    }
}
