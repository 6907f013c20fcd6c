//! Form state with per-field validation rules.
//!
//! # Design
//! Values are JSON values keyed by field name, so one `Form` type serves any
//! form. Each field has a list of [`Rule`]s; a rule checks, in order,
//! required → min length → max length → pattern and stops at the first
//! failure, and a field stops at its first failing rule. The error message is
//! the rule's own message when it has one, otherwise a default naming the
//! field.
//!
//! Length checks apply to strings (in characters) and arrays; pattern checks
//! apply to strings, numbers and booleans. Other values skip those checks.

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::Value;

use crate::signal::Signal;

pub type Fields = BTreeMap<String, Value>;
pub type Errors = BTreeMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct Rule {
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Regex>,
    message: Option<String>,
}

impl Rule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn check(&self, field: &str, value: &Value) -> Result<(), String> {
        let fail = |default: String| -> Result<(), String> {
            Err(self.message.clone().unwrap_or(default))
        };

        if self.required && is_falsy(value) {
            return fail(format!("{field} es requerido"));
        }
        let length = length_of(value);
        if let (Some(min), Some(length)) = (self.min_length, length) {
            if length < min {
                return fail(format!("{field} debe tener al menos {min} caracteres"));
            }
        }
        if let (Some(max), Some(length)) = (self.max_length, length) {
            if length > max {
                return fail(format!("{field} debe tener máximo {max} caracteres"));
            }
        }
        if let (Some(pattern), Some(text)) = (&self.pattern, text_of(value)) {
            if !pattern.is_match(&text) {
                return fail(format!("{field} no tiene un formato válido"));
            }
        }
        Ok(())
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub struct Form {
    initial: Fields,
    rules: BTreeMap<String, Vec<Rule>>,
    values: Signal<Fields>,
    errors: Signal<Errors>,
    submitting: Signal<bool>,
}

impl Form {
    pub fn new<I, K, V>(initial: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let initial: Fields = initial
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            values: Signal::new(initial.clone()),
            initial,
            rules: BTreeMap::new(),
            errors: Signal::default(),
            submitting: Signal::new(false),
        }
    }

    /// Declare the rules for `field`.
    pub fn rule(mut self, field: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.rules.insert(field.into(), rules);
        self
    }

    pub fn values(&self) -> Fields {
        self.values.get()
    }

    pub fn values_signal(&self) -> &Signal<Fields> {
        &self.values
    }

    /// Current value of `field`; `Null` when it was never set.
    pub fn value(&self, field: &str) -> Value {
        self.values
            .with(|values| values.get(field).cloned())
            .unwrap_or(Value::Null)
    }

    pub fn set(&self, field: impl Into<String>, value: impl Into<Value>) {
        let (field, value) = (field.into(), value.into());
        self.values.update(|values| {
            values.insert(field, value);
        });
    }

    /// Copy `values` into the form, skipping keys the form was not created
    /// with.
    pub fn set_values(&self, values: Fields) {
        self.values.update(|current| {
            for (key, value) in values {
                if let Some(slot) = current.get_mut(&key) {
                    *slot = value;
                }
            }
        });
    }

    pub fn errors(&self) -> Errors {
        self.errors.get()
    }

    pub fn errors_signal(&self) -> &Signal<Errors> {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<String> {
        self.errors.with(|errors| errors.get(field).cloned())
    }

    /// Validate one field, recording or clearing its error. Fields without
    /// rules are always valid.
    pub fn validate_field(&self, field: &str) -> bool {
        let Some(rules) = self.rules.get(field) else {
            return true;
        };
        let value = self.value(field);
        let failure = rules.iter().find_map(|rule| rule.check(field, &value).err());
        match failure {
            Some(message) => {
                self.errors.update(|errors| {
                    errors.insert(field.to_string(), message);
                });
                false
            }
            None => {
                self.errors.update(|errors| {
                    errors.remove(field);
                });
                true
            }
        }
    }

    /// Validate every field that has rules; all of them are checked even
    /// after the first failure so every error is shown.
    pub fn validate(&self) -> bool {
        self.rules
            .keys()
            .fold(true, |valid, field| self.validate_field(field) && valid)
    }

    /// Restore the initial values and clear all errors.
    pub fn reset(&self) {
        self.values.set(self.initial.clone());
        self.errors.set(Errors::new());
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.get()
    }

    pub fn submitting_signal(&self) -> &Signal<bool> {
        &self.submitting
    }

    /// Validate, then run `submit` with the values while the submitting flag
    /// is raised. Returns `None` without calling `submit` when invalid.
    pub fn submit<R>(&self, submit: impl FnOnce(&Fields) -> R) -> Option<R> {
        if !self.validate() {
            return None;
        }
        struct Lower<'a>(&'a Signal<bool>);
        impl Drop for Lower<'_> {
            fn drop(&mut self) {
                self.0.set(false);
            }
        }

        self.submitting.set(true);
        let _lower = Lower(&self.submitting);
        Some(submit(&self.values()))
    }
}

/// Preset rules shared by the application's forms.
pub mod rules {
    use std::sync::LazyLock;

    use regex::Regex;

    use super::Rule;

    static EMAIL: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());
    static USERNAME: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").ok());
    static PHONE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").ok());

    fn with_pattern(rule: Rule, pattern: &LazyLock<Option<Regex>>) -> Rule {
        match pattern.as_ref() {
            Some(regex) => rule.pattern(regex.clone()),
            None => rule,
        }
    }

    pub(crate) fn email_pattern() -> Option<&'static Regex> {
        EMAIL.as_ref()
    }

    pub fn required(message: impl Into<String>) -> Rule {
        Rule::required().message(message)
    }

    pub fn email() -> Rule {
        with_pattern(Rule::new(), &EMAIL).message("Por favor ingrese un email válido")
    }

    pub fn password() -> Rule {
        Rule::new()
            .min_length(6)
            .message("La contraseña debe tener al menos 6 caracteres")
    }

    pub fn username() -> Rule {
        with_pattern(Rule::new().min_length(3).max_length(20), &USERNAME)
            .message("El usuario solo puede contener letras, números y guión bajo")
    }

    pub fn phone() -> Rule {
        with_pattern(Rule::new(), &PHONE).message("Por favor ingrese un teléfono válido de 10 dígitos")
    }
}
