use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::cursor::{NativeInput, NativeSurface};
use crate::render::HelpText;
use crate::types::{CursorProperties, EditorKind, IconDescriptor};

type Log = Rc<RefCell<Vec<String>>>;

/// Callbacks writing one line per invocation into `log`. Value listeners are
/// left out so fields stay uncontrolled unless a test adds them.
fn recording(log: &Log) -> Callbacks {
    let push = |log: &Log| {
        let log = log.clone();
        move |line: String| log.borrow_mut().push(line)
    };
    let (blur, focus, click, touch) = (push(log), push(log), push(log), push(log));
    let (key_down, key_up, selection, state) = (push(log), push(log), push(log), push(log));
    let (editor, declaration) = (push(log), push(log));
    Callbacks::new()
        .on_change_state(move |_, _, _| state("changeState".into()))
        .on_change_editor_is_active(move |active, _, _| {
            editor(format!("changeEditorIsActive({active})"))
        })
        .on_change_show_declaration(move |shown, _, _| {
            declaration(format!("changeShowDeclaration({shown})"))
        })
        .on_blur(move |_, _| blur("blur".into()))
        .on_focus(move |_, _| focus("focus".into()))
        .on_click(move |_, _| click("click".into()))
        .on_touch(move |_, _| touch("touch".into()))
        .on_key_down(move |_, _| key_down("keyDown".into()))
        .on_key_up(move |_, _| key_up("keyUp".into()))
        .on_selection_change(move |_, config| {
            selection(format!("selectionChange({}..{})", config.cursor.start, config.cursor.end))
        })
}

/// Adds `change` and `changeValue` listeners.
fn listening(log: &Log) -> Callbacks {
    let (change, value) = (log.clone(), log.clone());
    recording(log)
        .on_change(move |_, _| change.borrow_mut().push("change".into()))
        .on_change_value(move |v, _, _| {
            let line = format!("changeValue({})", v.to_plain_string());
            value.borrow_mut().push(line)
        })
}

fn drain(log: &Log) -> String {
    log.borrow_mut().drain(..).collect::<Vec<_>>().join("\n")
}

/// Native input whose selection the test controls.
#[derive(Clone, Default)]
struct SharedInput(Rc<RefCell<Option<(usize, usize)>>>);

impl NativeInput for SharedInput {
    fn selection(&self) -> Option<(usize, usize)> {
        *self.0.borrow()
    }

    fn set_selection(&mut self, start: usize, end: usize) -> Result<(), SurfaceError> {
        *self.0.borrow_mut() = Some((start, end));
        Ok(())
    }
}

#[test]
fn test_typing_session_callback_order() {
    let log = Log::default();
    let mut field = InputField::new(FieldProperties {
        enforce_uncontrolled: Some(true),
        callbacks: listening(&log),
        ..FieldProperties::default()
    });
    assert!(!field.ownership().value_controlled());

    field.handle_focus();
    insta::assert_snapshot!(drain(&log), @r"
    focus
    change
    changeState
    touch
    ");

    field.handle_change_value("a");
    insta::assert_snapshot!(drain(&log), @r"
    change
    changeValue(a)
    changeState
    ");

    field.handle_change_value("ab");
    insta::assert_snapshot!(drain(&log), @r"
    change
    changeValue(ab)
    ");

    field.handle_blur();
    insta::assert_snapshot!(drain(&log), @r"
    change
    changeState
    blur
    ");

    let state = field.configuration().model.state;
    assert!(state.dirty && state.touched && state.visited && !state.focused);
    assert_eq!(field.configuration().value(), &Value::from("ab"));
}

#[test]
fn test_unchanged_input_is_ignored() {
    let log = Log::default();
    let mut field = InputField::new(FieldProperties {
        default: Some(Value::from("same")),
        callbacks: listening(&log),
        ..FieldProperties::default()
    });
    field.handle_change_value("same");
    assert!(log.borrow().is_empty());
    assert!(field.configuration().model.state.pristine);
}

#[test]
fn test_new_spelling_of_same_value_is_silent() {
    let log = Log::default();
    let mut field = InputField::new(FieldProperties {
        field_type: Some(FieldType::Float),
        default: Some(Value::from(1.5)),
        callbacks: listening(&log),
        ..FieldProperties::default()
    });
    assert_eq!(field.configuration().representation, "1.5");

    field.handle_change_value("1.50");
    assert!(log.borrow().is_empty());
    assert_eq!(field.configuration().representation, "1.50");
    assert_eq!(field.configuration().value(), &Value::from(1.5));

    // Blur settles on the canonical spelling.
    field.handle_blur();
    assert_eq!(field.configuration().representation, "1.5");
    insta::assert_snapshot!(drain(&log), @r"
    change
    changeState
    blur
    ");
}

#[test]
fn test_blur_commits_final_format() {
    let mut field = InputField::new(FieldProperties {
        field_type: Some(FieldType::Float),
        ..FieldProperties::default()
    });
    field.handle_focus();
    field.handle_change_value("1234.5");
    assert_eq!(field.configuration().representation, "1234.5");
    field.handle_blur();
    assert_eq!(field.configuration().representation, "1,234.5");
    assert_eq!(field.configuration().value(), &Value::from(1234.5));
}

#[test]
fn test_controlled_value_survives_internal_updates() {
    let log = Log::default();
    let given = FieldProperties {
        value: Some(Value::from("V1")),
        callbacks: listening(&log),
        ..FieldProperties::default()
    };
    let mut field = InputField::new(given.clone());
    assert!(field.ownership().value_controlled());

    field.handle_change_value("V2");
    insta::assert_snapshot!(drain(&log), @r"
    change
    changeValue(V2)
    changeState
    ");
    // The caller did not accept the edit.
    assert_eq!(field.configuration().value(), &Value::from("V1"));
    assert_eq!(field.configuration().representation, "V1");
    assert!(field.configuration().model.state.dirty);

    field.set_properties(FieldProperties {
        value: Some(Value::from("V2")),
        ..given
    });
    assert_eq!(field.configuration().value(), &Value::from("V2"));
    assert_eq!(field.configuration().representation, "V2");
}

#[test]
fn test_controlled_null_clears_the_value() {
    let log = Log::default();
    let with_callbacks = |json: &str| FieldProperties {
        callbacks: listening(&log),
        ..FieldProperties::from_json(json).unwrap()
    };
    let mut field = InputField::new(with_callbacks(r#"{"value": "abc"}"#));
    assert_eq!(field.configuration().representation, "abc");

    field.set_properties(with_callbacks(r#"{"value": null}"#));
    assert!(field.ownership().value_controlled());
    assert_eq!(field.configuration().value(), &Value::Null);
    assert_eq!(field.configuration().representation, "");
}

#[test]
fn test_typed_number_keeps_its_fraction() {
    let field = InputField::new(FieldProperties {
        field_type: Some(FieldType::Number),
        value: Some(Value::Number(2.5)),
        ..FieldProperties::default()
    });
    assert_eq!(field.configuration().value(), &Value::Number(2.5));
    assert_eq!(field.configuration().representation, "2.5");
}

#[test]
fn test_uncontrolled_keeps_edits_until_new_value() {
    let given = FieldProperties {
        value: Some(Value::from("initial")),
        ..FieldProperties::default()
    };
    let mut field = InputField::new(given.clone());
    field.handle_change_value("edited");

    // Same properties again: the edit stays.
    field.set_properties(given.clone());
    assert_eq!(field.configuration().value(), &Value::from("edited"));

    field.set_properties(FieldProperties {
        value: Some(Value::from("replaced")),
        ..given
    });
    assert_eq!(field.configuration().value(), &Value::from("replaced"));
    assert_eq!(field.configuration().representation, "replaced");
}

#[test]
fn test_rebuild_is_idempotent() {
    let given = FieldProperties {
        field_type: Some(FieldType::Integer),
        value: Some(Value::from("12")),
        ..FieldProperties::default()
    };
    let mut field = InputField::new(given.clone());
    let first = field.configuration().clone();
    field.set_properties(given.clone());
    field.set_properties(given);
    let again = field.configuration();
    assert_eq!(again.model, first.model);
    assert_eq!(again.representation, first.representation);
    assert_eq!(again.cursor, first.cursor);
}

#[test]
fn test_sign_correction_on_input() {
    let mut field = InputField::new(FieldProperties {
        field_type: Some(FieldType::Integer),
        minimum: Some(0.0),
        value: Some(Value::from("-5")),
        ..FieldProperties::default()
    });
    assert_eq!(field.configuration().value(), &Value::from(5.0));
    assert!(!field.configuration().model.state.invalid_minimum);

    field.handle_change_value("-7");
    assert_eq!(field.configuration().value(), &Value::from(7.0));
    assert_eq!(field.configuration().representation, "-7");
}

#[test]
fn test_flags_never_revert() {
    let mut field = InputField::new(FieldProperties::default());
    field.handle_focus();
    field.handle_change_value("x");
    field.handle_blur();
    field.handle_change_value("");
    field.handle_focus();
    field.handle_blur();

    let state = field.configuration().model.state;
    assert!(state.dirty && !state.pristine);
    assert!(state.touched && !state.untouched);
    assert!(state.visited);
}

#[test]
fn test_required_error_shown_after_visit() {
    let mut field = InputField::new(FieldProperties {
        required: Some(true),
        value: Some(Value::from("")),
        ..FieldProperties::default()
    });
    assert!(field.configuration().model.state.invalid_required);
    assert_eq!(field.render_plan().help, None);
    assert!(!field.render_plan().invalid);

    field.handle_focus();
    field.handle_blur();
    let plan = field.render_plan();
    assert!(plan.invalid);
    assert_eq!(plan.help, Some(HelpText::Error("Please fill this field.".into())));
}

#[test]
fn test_enter_in_multiline_editor_stops() {
    let log = Log::default();
    let mut textarea = InputField::new(FieldProperties {
        editor: Some(EditorKind::RichText(crate::types::RichTextMode::Raw)),
        selectable_editor: Some(true),
        callbacks: recording(&log),
        ..FieldProperties::default()
    });
    assert_eq!(textarea.handle_key_down(KeyInfo::new("Enter", 13)), Propagation::Stop);
    assert_eq!(textarea.handle_key_down(KeyInfo::new("a", 65)), Propagation::Continue);

    let mut plain = InputField::new(FieldProperties::default());
    assert_eq!(plain.handle_key_down(KeyInfo::new("Enter", 13)), Propagation::Continue);

    insta::assert_snapshot!(drain(&log), @r"
    keyDown
    keyDown
    ");
}

#[test]
fn test_key_up_without_code_is_ignored() {
    let log = Log::default();
    let mut field = InputField::new(FieldProperties {
        callbacks: recording(&log),
        ..FieldProperties::default()
    });
    field.handle_key_up(KeyInfo::new("", 0));
    assert!(log.borrow().is_empty());
}

#[test]
fn test_selection_round_trip_through_surface() {
    let log = Log::default();
    let input = SharedInput::default();
    let mut field = InputField::new(FieldProperties {
        value: Some(Value::from("hello")),
        cursor: Some(CursorProperties::from(Cursor::new(1, 3))),
        enforce_uncontrolled: Some(true),
        callbacks: recording(&log),
        ..FieldProperties::default()
    });

    field.attach_surface(Box::new(NativeSurface::new(input.clone())));
    assert!(field.selection_is_unstable());
    field.after_render();
    assert!(!field.selection_is_unstable());
    assert_eq!(*input.0.borrow(), Some((1, 3)));

    // The caller gave the cursor, so the surface selection is not adopted.
    *input.0.borrow_mut() = Some((2, 4));
    field.handle_click();
    assert_eq!(field.configuration().cursor, Cursor::new(1, 3));
    insta::assert_snapshot!(drain(&log), @r"
    selectionChange(1..3)
    click
    changeState
    touch
    ");
}

#[test]
fn test_click_adopts_internal_selection() {
    let input = SharedInput::default();
    let mut field = InputField::new(FieldProperties {
        value: Some(Value::from("hello")),
        ..FieldProperties::default()
    });
    field.attach_surface(Box::new(NativeSurface::new(input.clone())));
    field.after_render();

    *input.0.borrow_mut() = Some((4, 2));
    field.handle_click();
    assert_eq!(field.configuration().cursor, Cursor::new(2, 4));
    assert_eq!(field.adapter().state.cursor, Some(Cursor::new(2, 4)));
}

#[test]
fn test_key_up_adjusts_for_pending_character() {
    let input = SharedInput::default();
    let mut field = InputField::new(FieldProperties {
        value: Some(Value::from("abc")),
        ..FieldProperties::default()
    });
    field.attach_surface(Box::new(NativeSurface::new(input.clone())));
    field.after_render();

    *input.0.borrow_mut() = Some((1, 1));
    field.handle_key_up(KeyInfo::new("x", 88));
    assert_eq!(field.configuration().cursor, Cursor::collapsed(2));
}

#[test]
fn test_write_back_waits_for_ready_editor() {
    struct LateEditor {
        ready: Rc<RefCell<bool>>,
        written: Rc<RefCell<Option<Cursor>>>,
    }

    impl SelectionSurface for LateEditor {
        fn kind(&self) -> SurfaceKind {
            SurfaceKind::Code
        }

        fn is_ready(&self) -> bool {
            *self.ready.borrow()
        }

        fn read_selection(&self, _representation: &str, _key: Option<&str>) -> Option<Cursor> {
            None
        }

        fn write_selection(
            &mut self,
            cursor: Cursor,
            _representation: &str,
        ) -> Result<(), SurfaceError> {
            *self.written.borrow_mut() = Some(cursor);
            Ok(())
        }
    }

    let ready = Rc::new(RefCell::new(false));
    let written = Rc::new(RefCell::new(None));
    let mut field = InputField::new(FieldProperties {
        value: Some(Value::from("let x = 1;")),
        editor: Some(EditorKind::Code(None)),
        cursor: Some(CursorProperties::from(Cursor::collapsed(4))),
        ..FieldProperties::default()
    });
    field.attach_surface(Box::new(LateEditor {
        ready: ready.clone(),
        written: written.clone(),
    }));

    field.after_render();
    assert!(field.selection_is_unstable());
    assert_eq!(*written.borrow(), None);

    *ready.borrow_mut() = true;
    field.on_surface_ready(SurfaceKind::Code);
    assert!(!field.selection_is_unstable());
    assert_eq!(*written.borrow(), Some(Cursor::collapsed(4)));
}

#[test]
fn test_editor_toggle() {
    let log = Log::default();
    let mut field = InputField::new(FieldProperties {
        editor: Some(EditorKind::Code(None)),
        selectable_editor: Some(true),
        callbacks: recording(&log),
        ..FieldProperties::default()
    });
    assert!(!field.configuration().editor_is_active);
    assert_eq!(field.render_plan().editor_toggle, Some("code"));

    field.toggle_editor();
    assert!(field.configuration().editor_is_active);
    assert!(field.selection_is_unstable());
    assert_eq!(field.render_plan().editor_toggle, Some("subject"));
    insta::assert_snapshot!(drain(&log), @"changeEditorIsActive(true)");

    // Nothing attached: the write stays pending.
    field.after_render();
    assert!(field.selection_is_unstable());
}

#[test]
fn test_declaration_and_password_toggles() {
    let log = Log::default();
    let mut field = InputField::new(FieldProperties {
        name: Some("password_confirm".into()),
        declaration: Some("At least twelve characters".into()),
        trailing_icon: Some(IconDescriptor::Named(IconDescriptor::PASSWORD_PRESET.into())),
        callbacks: recording(&log),
        ..FieldProperties::default()
    });
    assert!(field.configuration().hidden);

    field.toggle_declaration();
    assert_eq!(
        field.render_plan().help,
        Some(HelpText::Declaration("At least twelve characters".into()))
    );
    insta::assert_snapshot!(drain(&log), @"changeShowDeclaration(true)");

    field.toggle_hidden();
    assert!(!field.configuration().hidden);
    let icon = field.render_plan().trailing_icon.unwrap();
    assert_eq!(icon.icon.as_str(), "lock");
    assert_eq!(field.adapter().state.hidden, Some(false));
}

#[test]
fn test_clear_resets_to_default() {
    let log = Log::default();
    let mut field = InputField::new(FieldProperties {
        default: Some(Value::from("start")),
        icon: Some(IconDescriptor::Named(IconDescriptor::CLEAR_PRESET.into())),
        callbacks: listening(&log),
        ..FieldProperties::default()
    });
    assert!(!field.render_plan().icon.unwrap().visible);

    field.handle_change_value("other");
    assert!(field.render_plan().icon.unwrap().visible);
    drain(&log);

    field.clear();
    assert_eq!(field.configuration().value(), &Value::from("start"));
    assert_eq!(field.configuration().representation, "start");
    insta::assert_snapshot!(drain(&log), @r"
    change
    changeValue(start)
    ");
}

#[test]
fn test_disabled_field_ignores_input() {
    let log = Log::default();
    let mut field = InputField::new(FieldProperties {
        disabled: Some(true),
        callbacks: listening(&log),
        ..FieldProperties::default()
    });
    field.handle_change_value("typed");
    assert!(log.borrow().is_empty());
    assert_eq!(field.configuration().value(), &Value::Null);
}

#[test]
fn test_adapter_hides_caller_owned_parts() {
    let log = Log::default();
    let field = InputField::new(FieldProperties {
        value: Some(Value::from("mine")),
        representation: Some("mine".into()),
        editor_is_active: Some(false),
        callbacks: listening(&log),
        ..FieldProperties::default()
    });
    let state = field.adapter().state;
    assert_eq!(state.value, None);
    assert_eq!(state.representation, None);
    assert_eq!(state.editor_is_active, None);
    assert_eq!(state.cursor, Some(Cursor::default()));
    assert!(state.model_state.pristine);

    let uncontrolled = InputField::new(FieldProperties {
        value: Some(Value::from("yours")),
        ..FieldProperties::default()
    });
    let state = uncontrolled.adapter().state;
    assert_eq!(state.value, Some(Value::from("yours")));
    assert_eq!(state.representation.as_deref(), Some("yours"));
}

#[test]
fn test_caller_owned_model_state_is_not_retained() {
    let mut field = InputField::new(FieldProperties {
        model: Some(crate::properties::ModelProperties {
            state: Some(ModelState::default()),
            ..Default::default()
        }),
        ..FieldProperties::default()
    });
    field.handle_change_value("typed");
    assert!(field.configuration().model.state.pristine);
    assert_eq!(field.configuration().value(), &Value::from("typed"));
}
