//! Select options and label normalization.
//!
//! Callers describe the options of a select surface in several shapes. All of
//! them collapse into a flat list of [`SelectOption`]s before rendering.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// One normalized option.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: Value,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Option object as given by the caller; the label may be left out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    #[serde(default)]
    pub label: Option<String>,
    pub value: Value,
}

/// Accepted selection shapes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionSpec {
    /// `[[value, label], ...]`
    Pairs(Vec<(Value, String)>),
    /// `[{label?, value}, ...]`
    Options(Vec<OptionSpec>),
    /// `[value, ...]`, each value doubling as its label.
    Values(Vec<Value>),
    /// `{value: label}`. Keys are visited in sorted order.
    Mapping(BTreeMap<String, String>),
}

impl From<Vec<SelectOption>> for SelectionSpec {
    fn from(options: Vec<SelectOption>) -> Self {
        SelectionSpec::Options(
            options
                .into_iter()
                .map(|o| OptionSpec {
                    label: Some(o.label),
                    value: o.value,
                })
                .collect(),
        )
    }
}

/// Label overrides: positional, or keyed by option value.
///
/// A mapping may carry `true` and `false` keys to label boolean options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Labels {
    List(Vec<String>),
    Map(BTreeMap<String, String>),
}

/// Options shown for a boolean field without an explicit selection.
pub fn boolean_options() -> Vec<SelectOption> {
    vec![SelectOption::new("No", false), SelectOption::new("Yes", true)]
}

/// Flatten `selection` and apply `labels`.
///
/// Without a selection the labels themselves become the options. Positional
/// labels replace option labels by index. Keyed labels are looked up by the
/// option's value, or by its label when the value is empty, zero or false.
pub fn normalize_selection(
    selection: Option<&SelectionSpec>,
    labels: Option<&Labels>,
) -> Option<Vec<SelectOption>> {
    let (selection, labels) = match (selection, labels) {
        (Some(selection), labels) => (selection.clone(), labels),
        (None, Some(Labels::List(values))) => (
            SelectionSpec::Values(values.iter().cloned().map(Value::Text).collect()),
            None,
        ),
        (None, Some(Labels::Map(mapping))) => (SelectionSpec::Mapping(mapping.clone()), None),
        (None, None) => return None,
    };

    let positional = |index: usize, fallback: String| match labels {
        Some(Labels::List(list)) => list.get(index).cloned().unwrap_or(fallback),
        _ => fallback,
    };

    let mut options: Vec<SelectOption> = match selection {
        SelectionSpec::Pairs(pairs) => pairs
            .into_iter()
            .enumerate()
            .map(|(i, (value, label))| SelectOption {
                label: positional(i, label),
                value,
            })
            .collect(),
        SelectionSpec::Options(specs) => specs
            .into_iter()
            .enumerate()
            .map(|(i, spec)| SelectOption {
                label: positional(i, spec.label.unwrap_or_else(|| spec.value.to_plain_string())),
                value: spec.value,
            })
            .collect(),
        SelectionSpec::Values(values) => values
            .into_iter()
            .enumerate()
            .map(|(i, value)| SelectOption {
                label: positional(i, value.to_plain_string()),
                value,
            })
            .collect(),
        SelectionSpec::Mapping(mapping) => mapping
            .into_iter()
            .map(|(value, label)| SelectOption {
                label,
                value: Value::Text(value),
            })
            .collect(),
    };

    if let Some(Labels::Map(mapping)) = labels {
        for option in &mut options {
            let key = if is_truthy(&option.value) {
                option.value.to_plain_string()
            } else {
                option.label.clone()
            };
            if let Some(label) = mapping.get(&key) {
                option.label = label.clone();
            } else if let Value::Bool(flag) = option.value {
                if let Some(label) = mapping.get(if flag { "true" } else { "false" }) {
                    option.label = label.clone();
                }
            }
        }
    }

    Some(options)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::Text(s) => !s.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_spec(json: &str) -> SelectionSpec {
        serde_json::from_str(json).unwrap()
    }

    fn labels_of(options: &[SelectOption]) -> Vec<&str> {
        options.iter().map(|o| o.label.as_str()).collect()
    }

    #[test]
    fn test_shapes_deserialize() {
        assert!(matches!(parse_spec(r#"[["a", "A"]]"#), SelectionSpec::Pairs(_)));
        assert!(matches!(parse_spec(r#"[{"value": 1}]"#), SelectionSpec::Options(_)));
        assert!(matches!(parse_spec(r#"["a", "b"]"#), SelectionSpec::Values(_)));
        assert!(matches!(parse_spec(r#"{"a": "A"}"#), SelectionSpec::Mapping(_)));
    }

    #[test]
    fn test_positional_labels() {
        let spec = parse_spec(r#"["a", "b", "c"]"#);
        let labels = Labels::List(vec!["Alpha".into(), "Beta".into()]);
        let options = normalize_selection(Some(&spec), Some(&labels)).unwrap();
        assert_eq!(labels_of(&options), vec!["Alpha", "Beta", "c"]);
        assert_eq!(options[2].value, Value::Text("c".into()));
    }

    #[test]
    fn test_keyed_labels_and_booleans() {
        let spec = SelectionSpec::from(boolean_options());
        let labels: Labels = serde_json::from_str(r#"{"true": "Ja", "false": "Nein"}"#).unwrap();
        let options = normalize_selection(Some(&spec), Some(&labels)).unwrap();
        assert_eq!(labels_of(&options), vec!["Nein", "Ja"]);
    }

    #[test]
    fn test_keyed_labels_fall_back_to_label_for_empty_value() {
        let spec =
            parse_spec(r#"[{"label": "none", "value": ""}, {"label": "one", "value": "1"}]"#);
        let labels: Labels = serde_json::from_str(r#"{"none": "Nothing", "1": "One"}"#).unwrap();
        let options = normalize_selection(Some(&spec), Some(&labels)).unwrap();
        assert_eq!(labels_of(&options), vec!["Nothing", "One"]);
    }

    #[test]
    fn test_labels_without_selection_become_options() {
        let labels = Labels::List(vec!["x".into(), "y".into()]);
        let options = normalize_selection(None, Some(&labels)).unwrap();
        assert_eq!(options, vec![SelectOption::new("x", "x"), SelectOption::new("y", "y")]);
        assert_eq!(normalize_selection(None, None), None);
    }

    #[test]
    fn test_mapping_selection() {
        let spec = parse_spec(r#"{"b": "Bee", "a": "Ay"}"#);
        let options = normalize_selection(Some(&spec), None).unwrap();
        assert_eq!(options, vec![SelectOption::new("Ay", "a"), SelectOption::new("Bee", "b")]);
    }
}
