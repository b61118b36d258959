//! Value transform registry.
//!
//! Every declared field type owns a [`Transformer`]: a parser from raw input
//! to a typed [`Value`], a final formatter (used on blur and for the initial
//! representation), an optional intermediate formatter (used while the user
//! is typing) and an optional commit step run on blur.
//!
//! Parsing is total. Malformed input produces a best-effort value (`NaN`, or
//! the original text) and validation reports the problem.
//!
//! Callers can override parts of one type's transformer per field; whatever
//! they leave out falls back to the registered entry. See
//! [`TransformRegistry::pipeline`].

mod numeric;
mod scalar;
mod temporal;


use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::configuration::Model;
use crate::error::FieldError;
use crate::locale::{Locale, NumberFormatOptions, NumberLocale};
use crate::value::Value;

pub use temporal::{FAR_FUTURE, FAR_PAST};

// === Type tags ===

/// Declared type of a field's model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Integer,
    Float,
    Currency,
    Boolean,
    Date,
    #[serde(alias = "datetime-local")]
    DateTime,
    Time,
}

impl FieldType {
    pub const ALL: [FieldType; 9] = [
        FieldType::String,
        FieldType::Number,
        FieldType::Integer,
        FieldType::Float,
        FieldType::Currency,
        FieldType::Boolean,
        FieldType::Date,
        FieldType::DateTime,
        FieldType::Time,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Currency => "currency",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Time => "time",
        }
    }

    /// Sign-corrected numeric types.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Number | FieldType::Integer | FieldType::Float | FieldType::Currency
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::DateTime | FieldType::Time)
    }
}

impl FromStr for FieldType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "datetime-local" => Ok(FieldType::DateTime),
            _ => FieldType::ALL
                .into_iter()
                .find(|ty| ty.as_str() == s)
                .ok_or_else(|| FieldError::UnknownType(s.to_string())),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `type` attribute of the native input element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeType {
    #[default]
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "password")]
    Password,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "datetime-local")]
    DateTimeLocal,
    #[serde(rename = "time")]
    Time,
}

impl NativeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NativeType::Text => "text",
            NativeType::Password => "password",
            NativeType::Number => "number",
            NativeType::Date => "date",
            NativeType::DateTimeLocal => "datetime-local",
            NativeType::Time => "time",
        }
    }

    /// Surfaces whose content can drift from the value's plain string while
    /// the user is typing.
    pub fn is_textual(&self) -> bool {
        matches!(self, NativeType::Text | NativeType::Password)
    }
}

// === Transformers ===

pub type ParseFn = Rc<dyn Fn(&Value, &TransformContext<'_>) -> Value>;
pub type FormatFn = Rc<dyn Fn(&Value, &TransformContext<'_>) -> String>;
pub type CommitFn = Rc<dyn Fn(&Value, &TransformContext<'_>) -> Value>;

/// Everything a transform may consult besides its input.
pub struct TransformContext<'a> {
    /// Model of the field being transformed. Bounds live here.
    pub model: &'a Model,
    /// The registry, so one type can delegate to another.
    pub registry: &'a TransformRegistry,
    pub locale: &'a dyn NumberLocale,
    pub options: &'a NumberFormatOptions,
    pub field_type: FieldType,
}

/// The parse/format/commit set of one type.
///
/// Every part is optional so that the same struct serves as a per-field
/// override. Missing parts of a resolved transformer fall back to the plain
/// string cast (formatting) or identity (parse and commit).
#[derive(Clone, Default)]
pub struct Transformer {
    pub parse: Option<ParseFn>,
    pub format_final: Option<FormatFn>,
    pub format_intermediate: Option<FormatFn>,
    pub commit: Option<CommitFn>,
    pub native_type: Option<NativeType>,
    pub options: Option<NumberFormatOptions>,
}

impl Transformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parse(
        mut self,
        f: impl Fn(&Value, &TransformContext<'_>) -> Value + 'static,
    ) -> Self {
        self.parse = Some(Rc::new(f));
        self
    }

    pub fn with_final_format(
        mut self,
        f: impl Fn(&Value, &TransformContext<'_>) -> String + 'static,
    ) -> Self {
        self.format_final = Some(Rc::new(f));
        self
    }

    pub fn with_intermediate_format(
        mut self,
        f: impl Fn(&Value, &TransformContext<'_>) -> String + 'static,
    ) -> Self {
        self.format_intermediate = Some(Rc::new(f));
        self
    }

    pub fn with_commit(
        mut self,
        f: impl Fn(&Value, &TransformContext<'_>) -> Value + 'static,
    ) -> Self {
        self.commit = Some(Rc::new(f));
        self
    }

    pub fn with_native_type(mut self, native_type: NativeType) -> Self {
        self.native_type = Some(native_type);
        self
    }

    pub fn with_options(mut self, options: NumberFormatOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Parts set on `over` win, everything else comes from `self`.
    pub fn overlay(&self, over: &Transformer) -> Transformer {
        Transformer {
            parse: over.parse.clone().or_else(|| self.parse.clone()),
            format_final: over.format_final.clone().or_else(|| self.format_final.clone()),
            format_intermediate: over
                .format_intermediate
                .clone()
                .or_else(|| self.format_intermediate.clone()),
            commit: over.commit.clone().or_else(|| self.commit.clone()),
            native_type: over.native_type.or(self.native_type),
            options: over.options.clone().or_else(|| self.options.clone()),
        }
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer")
            .field("parse", &self.parse.is_some())
            .field("format_final", &self.format_final.is_some())
            .field("format_intermediate", &self.format_intermediate.is_some())
            .field("commit", &self.commit.is_some())
            .field("native_type", &self.native_type)
            .field("options", &self.options)
            .finish()
    }
}

// === Registry ===

/// Transformers keyed by type tag, plus the locale they format with.
#[derive(Clone)]
pub struct TransformRegistry {
    entries: HashMap<FieldType, Transformer>,
    locale: Rc<dyn NumberLocale>,
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::with_locale(Locale::en_us())
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("types", &self.entries.len())
            .field("locale", &self.locale.tag())
            .finish()
    }
}

impl TransformRegistry {
    /// Built-in transformers formatting with `locale`.
    pub fn with_locale(locale: impl NumberLocale + 'static) -> Self {
        let mut entries = HashMap::new();
        entries.insert(FieldType::String, scalar::string());
        entries.insert(FieldType::Boolean, scalar::boolean());
        entries.insert(FieldType::Number, numeric::number());
        entries.insert(FieldType::Integer, numeric::integer());
        entries.insert(FieldType::Float, numeric::float());
        entries.insert(FieldType::Currency, numeric::currency());
        entries.insert(FieldType::Date, temporal::date());
        entries.insert(FieldType::DateTime, temporal::datetime());
        entries.insert(FieldType::Time, temporal::time());
        Self {
            entries,
            locale: Rc::new(locale),
        }
    }

    pub fn locale(&self) -> &dyn NumberLocale {
        self.locale.as_ref()
    }

    pub fn get(&self, field_type: FieldType) -> Option<&Transformer> {
        self.entries.get(&field_type)
    }

    /// Replace the transformer of a type, returning the previous one.
    pub fn register(
        &mut self,
        field_type: FieldType,
        transformer: Transformer,
    ) -> Option<Transformer> {
        self.entries.insert(field_type, transformer)
    }

    /// Registered entry merged with a per-field override.
    pub fn resolve(&self, field_type: FieldType, over: Option<&Transformer>) -> Transformer {
        let base = self.entries.get(&field_type).cloned().unwrap_or_default();
        match over {
            Some(over) => base.overlay(over),
            None => base,
        }
    }

    pub fn pipeline(&self, field_type: FieldType, over: Option<&Transformer>) -> Pipeline<'_> {
        Pipeline {
            registry: self,
            field_type,
            transformer: self.resolve(field_type, over),
        }
    }
}

/// A resolved transformer bound to its registry.
pub struct Pipeline<'r> {
    registry: &'r TransformRegistry,
    field_type: FieldType,
    transformer: Transformer,
}

impl<'r> Pipeline<'r> {
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    pub fn native_type(&self) -> NativeType {
        self.transformer.native_type.unwrap_or_default()
    }

    /// Native input type for the text-field surface. Hidden strings render
    /// as password inputs.
    pub fn surface_type(&self, hidden: bool) -> NativeType {
        match self.field_type {
            FieldType::String if hidden => NativeType::Password,
            _ => self.native_type(),
        }
    }

    pub fn options(&self) -> NumberFormatOptions {
        self.transformer.options.clone().unwrap_or_default()
    }

    /// Raw input to typed value. Empty input of non-string types is null.
    pub fn parse(&self, raw: &Value, model: &Model) -> Value {
        if self.field_type != FieldType::String && raw.is_empty() {
            return Value::Null;
        }
        match &self.transformer.parse {
            Some(parse) => {
                let options = self.options();
                parse(raw, &self.context(model, &options))
            }
            None => raw.clone(),
        }
    }

    /// Typed value to representation. `final_form` picks the canonical
    /// rendering over the live-typing one. Null always formats as `""`.
    pub fn format(&self, value: &Value, model: &Model, final_form: bool) -> String {
        if value.is_null() {
            return String::new();
        }
        let formatter = if final_form {
            &self.transformer.format_final
        } else {
            &self.transformer.format_intermediate
        };
        match formatter {
            Some(format) => {
                let options = self.options();
                format(value, &self.context(model, &options))
            }
            None => value.to_plain_string(),
        }
    }

    /// Commit transform run on blur. Identity when none is set.
    pub fn commit(&self, value: &Value, model: &Model) -> Value {
        match &self.transformer.commit {
            Some(commit) => {
                let options = self.options();
                commit(value, &self.context(model, &options))
            }
            None => value.clone(),
        }
    }

    fn context<'a>(
        &'a self,
        model: &'a Model,
        options: &'a NumberFormatOptions,
    ) -> TransformContext<'a> {
        TransformContext {
            model,
            registry: self.registry,
            locale: self.registry.locale(),
            options,
            field_type: self.field_type,
        }
    }
}
