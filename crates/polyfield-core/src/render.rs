//! Render plan: what a view layer needs to draw one pass of a field.
//!
//! The plan is derived from a consolidated [`Configuration`] and carries no
//! markup. A DOM layer or any other view maps it onto its widgets.

use serde::Serialize;
use smol_str::SmolStr;

use crate::configuration::Configuration;
use crate::message;
use crate::selection::SelectOption;
use crate::transform::{FieldType, NativeType, TransformRegistry};
use crate::types::{Align, EditorKind, IconDescriptor, RichTextMode};
use crate::value::Value;

/// Native constraint attributes of the text-field surface.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    pub min: Option<String>,
    pub max: Option<String>,
    pub step: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "surface", rename_all = "camelCase")]
pub enum SurfacePlan {
    Select {
        options: Vec<SelectOption>,
    },
    CodeEditor {
        mode: SmolStr,
        rows: u32,
    },
    RichTextEditor {
        mode: RichTextMode,
    },
    #[serde(rename_all = "camelCase")]
    TextField {
        native_type: NativeType,
        textarea: bool,
        rows: Option<u32>,
        align: Align,
        constraints: Constraints,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum HelpText {
    Declaration(String),
    Error(String),
}

/// What clicking an icon does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IconAction {
    Clear,
    TogglePassword,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IconPlan {
    pub icon: SmolStr,
    pub tooltip: Option<String>,
    pub action: Option<IconAction>,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    pub surface: SurfacePlan,
    /// Description or name, with `*` appended for required fields.
    pub label: Option<String>,
    pub value: String,
    pub placeholder: Option<String>,
    pub disabled: bool,
    pub outlined: bool,
    pub full_width: bool,
    /// Highlight the field as invalid.
    pub invalid: bool,
    pub help: Option<HelpText>,
    pub icon: Option<IconPlan>,
    pub trailing_icon: Option<IconPlan>,
    /// Icon of the editor toggle, shown for selectable non-plain editors.
    pub editor_toggle: Option<&'static str>,
    /// Icon of the declaration toggle, shown when there is a declaration.
    pub declaration_toggle: Option<&'static str>,
}

fn resolve_icon(icon: &IconDescriptor, config: &Configuration) -> IconPlan {
    if icon.is_clear_preset() {
        return IconPlan {
            icon: SmolStr::new_static("clear"),
            tooltip: Some("Clear input".to_string()),
            action: Some(IconAction::Clear),
            visible: config.model.value != config.model.default,
        };
    }
    if icon.is_password_preset() {
        let (icon, tooltip) = if config.hidden {
            ("lock_open", "Show password")
        } else {
            ("lock", "Hide password")
        };
        return IconPlan {
            icon: SmolStr::new_static(icon),
            tooltip: Some(tooltip.to_string()),
            action: Some(IconAction::TogglePassword),
            visible: true,
        };
    }
    match icon {
        IconDescriptor::Named(name) => IconPlan {
            icon: name.clone(),
            tooltip: None,
            action: None,
            visible: true,
        },
        IconDescriptor::Icon { icon, tooltip } => IconPlan {
            icon: icon.clone(),
            tooltip: tooltip.clone(),
            action: None,
            visible: true,
        },
    }
}

fn text_field(config: &Configuration, registry: &TransformRegistry) -> SurfacePlan {
    let model = &config.model;
    let pipeline = registry.pipeline(model.field_type, config.transformer.as_ref());
    let textarea = model.field_type == FieldType::String && !config.editor.is_plain();

    let format_bound = |bound: Option<f64>| {
        bound.map(|b| pipeline.format(&Value::Number(b), model, true))
    };
    let constraints = match model.field_type {
        FieldType::Number => Constraints {
            min: model.minimum.map(crate::value::number_to_string),
            max: model.maximum.map(crate::value::number_to_string),
            step: config.step,
            ..Constraints::default()
        },
        FieldType::String => Constraints {
            min_length: Some(
                model
                    .minimum_length
                    .and_then(|n| usize::try_from(n).ok())
                    .unwrap_or(0),
            ),
            max_length: model.maximum_length.and_then(|n| usize::try_from(n).ok()),
            ..Constraints::default()
        },
        ty if ty.is_temporal() => Constraints {
            min: format_bound(model.minimum),
            max: format_bound(model.maximum),
            step: config.step,
            ..Constraints::default()
        },
        _ => Constraints::default(),
    };

    SurfacePlan::TextField {
        native_type: pipeline.surface_type(config.hidden),
        textarea,
        rows: textarea.then_some(config.rows),
        align: config.align,
        constraints,
    }
}

/// Build the render plan of `config`.
pub fn plan(config: &Configuration, registry: &TransformRegistry) -> RenderPlan {
    let surface = match (&config.selection, &config.editor) {
        (Some(options), _) => SurfacePlan::Select {
            options: options.clone(),
        },
        (None, EditorKind::Code(_)) if config.is_advanced_editor() => SurfacePlan::CodeEditor {
            mode: SmolStr::new(config.editor.code_mode().unwrap_or(EditorKind::DEFAULT_CODE_MODE)),
            rows: config.rows,
        },
        (None, EditorKind::RichText(mode)) if config.is_advanced_editor() => {
            SurfacePlan::RichTextEditor { mode: *mode }
        }
        _ => text_field(config, registry),
    };

    let help = if config.show_declaration {
        config.declaration.clone().map(HelpText::Declaration)
    } else if config.shows_invalid() {
        message::error_message(config, registry).map(HelpText::Error)
    } else {
        None
    };

    let label = config.label().map(|label| {
        if config.model.required {
            format!("{label}*")
        } else {
            label.to_string()
        }
    });

    let editor_toggle = (config.selectable_editor
        && config.field_type() == FieldType::String
        && !config.editor.is_plain())
    .then(|| match (&config.editor, config.editor_is_active) {
        (_, true) => "subject",
        (EditorKind::Code(_), false) => "code",
        _ => "text_format",
    });

    let declaration_toggle = config
        .declaration
        .as_ref()
        .filter(|declaration| !declaration.is_empty())
        .map(|_| if config.show_declaration { "more_vert" } else { "more_horiz" });

    RenderPlan {
        surface,
        label,
        value: config.representation.clone(),
        placeholder: config.placeholder.clone(),
        disabled: config.disabled,
        outlined: config.outlined,
        full_width: config.full_width,
        invalid: config.shows_invalid(),
        help,
        icon: config.icon.as_ref().map(|icon| resolve_icon(icon, config)),
        trailing_icon: config.trailing_icon.as_ref().map(|icon| resolve_icon(icon, config)),
        editor_toggle,
        declaration_toggle,
    }
}
