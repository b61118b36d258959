//! Validation evaluator.
//!
//! A pure function from a model to its invalid flags. Every rule runs on
//! every pass; nothing short-circuits. Lengths count characters.

use crate::configuration::Model;
use crate::types::ModelState;
use crate::value::Value;

/// The invalid flags derived from a model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValidationPatch {
    pub invalid_maximum: bool,
    pub invalid_maximum_length: bool,
    pub invalid_minimum: bool,
    pub invalid_minimum_length: bool,
    pub invalid_inverted_pattern: bool,
    pub invalid_pattern: bool,
    pub invalid_required: bool,
}

impl ValidationPatch {
    pub fn invalid(&self) -> bool {
        self.invalid_maximum
            || self.invalid_maximum_length
            || self.invalid_minimum
            || self.invalid_minimum_length
            || self.invalid_inverted_pattern
            || self.invalid_pattern
            || self.invalid_required
    }

    /// Write the flags into `state`, keeping `valid == !invalid`. Returns
    /// whether any flag differs from before.
    pub fn apply_to(&self, state: &mut ModelState) -> bool {
        let before = *state;
        state.invalid_maximum = self.invalid_maximum;
        state.invalid_maximum_length = self.invalid_maximum_length;
        state.invalid_minimum = self.invalid_minimum;
        state.invalid_minimum_length = self.invalid_minimum_length;
        state.invalid_inverted_pattern = self.invalid_inverted_pattern;
        state.invalid_pattern = self.invalid_pattern;
        state.invalid_required = self.invalid_required;
        state.invalid = self.invalid();
        state.valid = !state.invalid;
        before != *state
    }
}

/// Evaluate every rule against `model`.
pub fn evaluate(model: &Model) -> ValidationPatch {
    let number = match &model.value {
        Value::Number(n) if !n.is_nan() => Some(*n),
        _ => None,
    };
    let text = model.value.as_text();
    let length = text.map(|t| t.chars().count());

    ValidationPatch {
        invalid_maximum: match (number, model.maximum) {
            (Some(n), Some(max)) => max >= 0.0 && n > max,
            _ => false,
        },
        invalid_maximum_length: match (length, model.maximum_length) {
            (Some(len), Some(max)) => usize::try_from(max).is_ok_and(|max| len > max),
            _ => false,
        },
        invalid_minimum: match (number, model.minimum) {
            (Some(n), Some(min)) => n < min,
            _ => false,
        },
        invalid_minimum_length: match (length, model.minimum_length) {
            (Some(len), Some(min)) => usize::try_from(min).is_ok_and(|min| len < min),
            _ => false,
        },
        invalid_inverted_pattern: match (text, &model.inverted_pattern) {
            (Some(t), Some(pattern)) => pattern.is_match(t),
            _ => false,
        },
        invalid_pattern: match (text, &model.pattern) {
            (Some(t), Some(pattern)) => !pattern.is_match(t),
            _ => false,
        },
        invalid_required: model.required && model.value.is_empty(),
    }
}

/// Evaluate and write the result into the model's own state. Returns
/// whether anything changed.
pub fn validate(model: &mut Model) -> bool {
    let patch = evaluate(model);
    patch.apply_to(&mut model.state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;
    use crate::transform::FieldType;

    fn with_value(value: impl Into<Value>) -> Model {
        Model {
            value: value.into(),
            ..Model::default()
        }
    }

    #[test]
    fn test_required_empty_string() {
        let mut model = Model {
            required: true,
            ..with_value("")
        };
        assert!(validate(&mut model));
        assert!(model.state.invalid_required);
        assert!(model.state.invalid && !model.state.valid);
        // Second pass: nothing changes.
        assert!(!validate(&mut model));
    }

    #[test]
    fn test_required_null() {
        let model = Model {
            required: true,
            ..Model::default()
        };
        assert!(evaluate(&model).invalid_required);
    }

    #[test]
    fn test_bounds() {
        let model = Model {
            field_type: FieldType::Integer,
            minimum: Some(1.0),
            maximum: Some(10.0),
            ..with_value(11.0)
        };
        let patch = evaluate(&model);
        assert!(patch.invalid_maximum && !patch.invalid_minimum);

        let below = Model {
            value: Value::Number(0.0),
            ..model
        };
        let patch = evaluate(&below);
        assert!(patch.invalid_minimum && !patch.invalid_maximum);
    }

    #[test]
    fn test_negative_maximum_is_not_enforced() {
        let model = Model {
            maximum: Some(-5.0),
            ..with_value(3.0)
        };
        assert!(!evaluate(&model).invalid_maximum);
    }

    #[test]
    fn test_nan_skips_numeric_rules() {
        let model = Model {
            minimum: Some(0.0),
            maximum: Some(1.0),
            ..with_value(f64::NAN)
        };
        assert_eq!(evaluate(&model), ValidationPatch::default());
    }

    #[test]
    fn test_lengths_count_characters() {
        let model = Model {
            minimum_length: Some(3),
            maximum_length: Some(3),
            ..with_value("äöü")
        };
        assert!(!evaluate(&model).invalid());
        let long = Model {
            value: Value::from("äöüß"),
            ..model
        };
        assert!(evaluate(&long).invalid_maximum_length);
    }

    #[test]
    fn test_negative_length_bounds_disable_the_rule() {
        let model = Model {
            minimum_length: Some(-1),
            maximum_length: Some(-1),
            ..with_value("abc")
        };
        assert_eq!(evaluate(&model), ValidationPatch::default());
    }

    #[test]
    fn test_patterns() {
        let model = Model {
            pattern: Some(Pattern::new("^[a-z]+$").unwrap()),
            inverted_pattern: Some(Pattern::new("admin").unwrap()),
            ..with_value("admin")
        };
        let patch = evaluate(&model);
        assert!(!patch.invalid_pattern);
        assert!(patch.invalid_inverted_pattern);

        let upper = Model {
            value: Value::from("Bob"),
            ..model
        };
        let patch = evaluate(&upper);
        assert!(patch.invalid_pattern && !patch.invalid_inverted_pattern);
    }

    #[test]
    fn test_patterns_ignore_non_text() {
        let model = Model {
            pattern: Some(Pattern::new("^x$").unwrap()),
            ..with_value(5.0)
        };
        assert!(!evaluate(&model).invalid());
    }

    #[test]
    fn test_valid_mirrors_invalid() {
        let mut state = ModelState::default();
        let patch = ValidationPatch {
            invalid_pattern: true,
            ..ValidationPatch::default()
        };
        assert!(patch.apply_to(&mut state));
        assert!(state.invalid && !state.valid);
        assert!(ValidationPatch::default().apply_to(&mut state));
        assert!(state.valid && !state.invalid && !state.invalid_pattern);
    }
}
