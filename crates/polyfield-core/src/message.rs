//! Help message templates.
//!
//! Templates interpolate configuration values: `${name}` inserts the plain
//! string of a property and `${formatValue(name)}` its final formatted form,
//! as produced by the field's transformer. A template that cannot be
//! rendered yields an empty message.

use crate::configuration::Configuration;
use crate::error::FieldError;
use crate::transform::TransformRegistry;
use crate::value::Value;

/// Property lookup for template placeholders.
fn lookup(config: &Configuration, name: &str) -> Option<Value> {
    let model = &config.model;
    let text = |value: Option<&String>| value.map_or(Value::Null, |v| Value::from(v.as_str()));
    let value = match name {
        "value" => model.value.clone(),
        "default" => model.default.clone(),
        "type" => Value::from(model.field_type.as_str()),
        "minimum" => model.minimum.map_or(Value::Null, Value::Number),
        "maximum" => model.maximum.map_or(Value::Null, Value::Number),
        "minimumLength" => model
            .minimum_length
            .map_or(Value::Null, |n| Value::Number(n as f64)),
        "maximumLength" => model
            .maximum_length
            .map_or(Value::Null, |n| Value::Number(n as f64)),
        "pattern" => model
            .pattern
            .as_ref()
            .map_or(Value::Null, |p| Value::from(p.as_str())),
        "invertedPattern" => model
            .inverted_pattern
            .as_ref()
            .map_or(Value::Null, |p| Value::from(p.as_str())),
        "required" => Value::Bool(model.required),
        "representation" => Value::from(config.representation.as_str()),
        "name" => text(config.name.as_ref()),
        "description" => text(config.description.as_ref()),
        "placeholder" => text(config.placeholder.as_ref()),
        "declaration" => text(config.declaration.as_ref()),
        _ => return None,
    };
    Some(value)
}

fn render_expression(
    expression: &str,
    config: &Configuration,
    registry: &TransformRegistry,
) -> Result<String, FieldError> {
    let expression = expression.trim();
    let unknown = || FieldError::Template(format!("unknown placeholder `{expression}`"));

    if let Some(inner) = expression
        .strip_prefix("formatValue(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let value = lookup(config, inner.trim()).ok_or_else(unknown)?;
        let pipeline = registry.pipeline(config.field_type(), config.transformer.as_ref());
        return Ok(pipeline.format(&value, &config.model, true));
    }

    lookup(config, expression)
        .map(|value| value.to_plain_string())
        .ok_or_else(unknown)
}

/// Render `template` against `config`.
pub fn render_template(
    template: &str,
    config: &Configuration,
    registry: &TransformRegistry,
) -> Result<String, FieldError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("${") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let close = after
            .find('}')
            .ok_or_else(|| FieldError::Template(format!("unbalanced braces in `{template}`")))?;
        out.push_str(&render_expression(&after[..close], config, registry)?);
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Like [`render_template`], but failures are logged and render as `""`.
pub fn render_message(
    template: &str,
    config: &Configuration,
    registry: &TransformRegistry,
) -> String {
    match render_template(template, config, registry) {
        Ok(message) => message,
        Err(err) => {
            tracing::warn!(
                target: "polyfield::message",
                %err,
                "message template could not be rendered"
            );
            String::new()
        }
    }
}

/// Error message for the first violated constraint that has a template.
///
/// Checked in the order maximum, maximum length, minimum, minimum length,
/// inverted pattern, pattern, required.
pub fn error_message(config: &Configuration, registry: &TransformRegistry) -> Option<String> {
    let state = &config.model.state;
    let messages = &config.messages;
    let template = [
        (state.invalid_maximum, &messages.maximum_text),
        (state.invalid_maximum_length, &messages.maximum_length_text),
        (state.invalid_minimum, &messages.minimum_text),
        (state.invalid_minimum_length, &messages.minimum_length_text),
        (state.invalid_inverted_pattern, &messages.inverted_pattern_text),
        (state.invalid_pattern, &messages.pattern_text),
        (state.invalid_required, &messages.required_text),
    ]
    .into_iter()
    .find_map(|(violated, template)| template.as_deref().filter(|_| violated))?;
    Some(render_message(template, config, registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::FieldProperties;
    use crate::reconcile::{Reconciler, RetainedState};
    use crate::transform::FieldType;

    fn configure(given: FieldProperties) -> (Configuration, Reconciler) {
        let reconciler = Reconciler::default();
        let retained = RetainedState::initial(&given, &reconciler);
        let config = reconciler.consolidate(&given, &retained).configuration;
        (config, reconciler)
    }

    #[test]
    fn test_plain_placeholders() {
        let (config, reconciler) = configure(FieldProperties {
            name: Some("code".into()),
            minimum_length: Some(3),
            ..FieldProperties::default()
        });
        let rendered = render_template(
            "${name} needs ${ minimumLength } symbols",
            &config,
            &reconciler.registry,
        );
        assert_eq!(rendered.unwrap(), "code needs 3 symbols");
    }

    #[test]
    fn test_format_value_uses_transformer() {
        let (config, reconciler) = configure(FieldProperties {
            field_type: Some(FieldType::Date),
            minimum: Some(86_400.0),
            ..FieldProperties::default()
        });
        let rendered =
            render_template("after ${formatValue(minimum)}", &config, &reconciler.registry);
        assert_eq!(rendered.unwrap(), "after 1970-01-02");

        let (config, reconciler) = configure(FieldProperties {
            field_type: Some(FieldType::Float),
            maximum: Some(1234.5),
            ..FieldProperties::default()
        });
        let rendered = render_template("${formatValue(maximum)}", &config, &reconciler.registry);
        assert_eq!(rendered.unwrap(), "1,234.5");
    }

    #[test]
    fn test_broken_templates() {
        let (config, reconciler) = configure(FieldProperties::default());
        assert!(matches!(
            render_template("${nope}", &config, &reconciler.registry),
            Err(FieldError::Template(_))
        ));
        assert!(matches!(
            render_template("oops ${name", &config, &reconciler.registry),
            Err(FieldError::Template(_))
        ));
        assert_eq!(render_message("${nope}", &config, &reconciler.registry), "");
    }

    #[test]
    fn test_error_message_priority() {
        let (config, reconciler) = configure(FieldProperties {
            field_type: Some(FieldType::Integer),
            minimum: Some(10.0),
            maximum: Some(20.0),
            value: Some(Value::from(30.0)),
            ..FieldProperties::default()
        });
        insta::assert_snapshot!(
            error_message(&config, &reconciler.registry).unwrap(),
            @"Please provide something less or equal than 20."
        );
    }

    #[test]
    fn test_error_message_falls_through_missing_template() {
        let (mut config, reconciler) = configure(FieldProperties {
            required: Some(true),
            minimum_length: Some(4),
            value: Some(Value::from("")),
            ..FieldProperties::default()
        });
        assert!(config.model.state.invalid_minimum_length);
        config.messages.minimum_length_text = None;
        assert_eq!(
            error_message(&config, &reconciler.registry).as_deref(),
            Some("Please fill this field.")
        );
    }

    #[test]
    fn test_no_message_when_valid() {
        let (config, reconciler) = configure(FieldProperties::default());
        assert_eq!(error_message(&config, &reconciler.registry), None);
    }
}
