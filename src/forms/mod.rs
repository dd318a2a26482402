//! Reactive form model shared by every resource form.
//!
//! A [`FormSchema`] maps field names to a default value and a list of
//! validators. A [`FormGroup`] holds the live values for one schema and is
//! what controllers patch on load and read on submit.

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::errors::FormError;

/// Supported data kinds for form fields; drives text input parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
    Choice(Vec<&'static str>),
}

impl FieldKind {
    fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (FieldKind::Text | FieldKind::Choice(_), Value::String(_)) => true,
            (FieldKind::Integer, Value::Number(number)) => number.is_i64(),
            (FieldKind::Boolean, Value::Bool(_)) => true,
            _ => false,
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::Choice(_) => "a string",
            FieldKind::Integer => "a whole number",
            FieldKind::Boolean => "true or false",
        }
    }
}

/// Built-in validation rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validator {
    /// Rejects null and empty strings. `false` is a present value.
    Required,
    /// Minimum string length; empty values are left to [`Validator::Required`].
    MinLength(usize),
    OneOf(Vec<&'static str>),
}

impl Validator {
    fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Validator::Required => {
                if is_empty(value) {
                    Err("is required".into())
                } else {
                    Ok(())
                }
            }
            Validator::MinLength(min) => match value {
                Value::String(text) if !text.is_empty() && text.chars().count() < *min => {
                    Err(format!("must have at least {min} characters"))
                }
                _ => Ok(()),
            },
            Validator::OneOf(options) => match value {
                Value::String(text) if !options.contains(&text.as_str()) => {
                    Err(format!("must be one of: {}", options.join(", ")))
                }
                _ => Ok(()),
            },
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Declarative description of a single form field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub kind: FieldKind,
    pub default: Value,
    pub validators: Vec<Validator>,
}

impl FieldDescriptor {
    pub fn new(key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            kind,
            default: Value::Null,
            validators: Vec::new(),
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn with_validators(mut self, validators: Vec<Validator>) -> Self {
        self.validators = validators;
        self
    }

    pub fn is_required(&self) -> bool {
        self.validators.contains(&Validator::Required)
    }

    /// Converts raw text typed by a user into the JSON value stored in the form.
    /// Blank input clears the field.
    pub fn parse_input(&self, raw: &str) -> Result<Value, FormError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Value::Null);
        }
        let invalid = |message: &str| FormError::InvalidInput {
            field: self.key.to_string(),
            message: message.to_string(),
        };
        match &self.kind {
            FieldKind::Text => Ok(Value::String(trimmed.to_string())),
            FieldKind::Integer => trimmed
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| invalid("enter a whole number")),
            FieldKind::Boolean => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "y" | "sim" | "s" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "n" | "nao" | "não" | "0" => Ok(Value::Bool(false)),
                _ => Err(invalid("enter yes or no")),
            },
            FieldKind::Choice(options) => options
                .iter()
                .find(|option| option.eq_ignore_ascii_case(trimmed))
                .map(|option| Value::String((*option).to_string()))
                .ok_or_else(|| invalid(&format!("choose one of: {}", options.join(", ")))),
        }
    }
}

/// Ordered field set for one resource form.
#[derive(Debug, Clone)]
pub struct FormSchema {
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl FormSchema {
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }

    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.key == key)
    }
}

/// Live values of a form built from a [`FormSchema`].
#[derive(Debug, Clone)]
pub struct FormGroup {
    schema: FormSchema,
    values: Map<String, Value>,
}

impl FormGroup {
    /// Builds a form with every field set to its default.
    pub fn new(schema: FormSchema) -> Self {
        let values = schema
            .fields
            .iter()
            .map(|field| (field.key.to_string(), field.default.clone()))
            .collect();
        Self { schema, values }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Stores `value`, which must be null or of the field's JSON type.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), FormError> {
        let field = self
            .schema
            .field(key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))?;
        if !field.kind.accepts(&value) {
            return Err(FormError::InvalidInput {
                field: key.to_string(),
                message: format!("expected {}, got {}", field.kind.expected(), value),
            });
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Parses `raw` according to the field kind and stores it.
    pub fn set_input(&mut self, key: &str, raw: &str) -> Result<(), FormError> {
        let field = self
            .schema
            .field(key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))?;
        let value = field.parse_input(raw)?;
        self.set(key, value)
    }

    /// Copies every key of `record` that the schema declares. Other keys, and
    /// fields the record lacks, are left alone.
    pub fn patch_value(&mut self, record: &Value) {
        let Value::Object(incoming) = record else {
            return;
        };
        for (key, value) in incoming {
            if let Some(slot) = self.values.get_mut(key) {
                *slot = value.clone();
            }
        }
    }

    /// Serializes `record` and patches it into the form.
    pub fn patch_from<T: Serialize>(&mut self, record: &T) -> Result<(), FormError> {
        let value = serde_json::to_value(record)?;
        self.patch_value(&value);
        Ok(())
    }

    /// Runs every validator, returning all failures in schema order.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let errors: Vec<FieldError> = self
            .schema
            .fields
            .iter()
            .flat_map(|field| {
                let value = self.values.get(field.key).unwrap_or(&Value::Null);
                field.validators.iter().filter_map(move |validator| {
                    validator.check(value).err().map(|message| FieldError {
                        field: field.key,
                        message,
                    })
                })
            })
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Snapshot of all field values as a JSON object.
    pub fn value(&self) -> Value {
        Value::Object(self.values.clone())
    }

    /// Builds a record by overlaying the form values onto `R::default()`.
    /// Record fields the form does not declare keep their default.
    pub fn overlay<R>(&self) -> Result<R, FormError>
    where
        R: Default + Serialize + DeserializeOwned,
    {
        let mut base = match serde_json::to_value(R::default())? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in &self.values {
            base.insert(key.clone(), value.clone());
        }
        Ok(serde_json::from_value(Value::Object(base))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn schema() -> FormSchema {
        FormSchema::new(
            "sample",
            vec![
                FieldDescriptor::new("id", FieldKind::Integer),
                FieldDescriptor::new("name", FieldKind::Text)
                    .with_validators(vec![Validator::Required, Validator::MinLength(2)]),
                FieldDescriptor::new("paid", FieldKind::Boolean)
                    .with_default(true)
                    .with_validators(vec![Validator::Required]),
            ],
        )
    }

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct Sample {
        id: Option<i64>,
        name: String,
        paid: bool,
        #[serde(default)]
        extra: Option<String>,
    }

    #[test]
    fn new_form_uses_defaults() {
        let form = FormGroup::new(schema());
        assert_eq!(form.value(), json!({ "id": null, "name": null, "paid": true }));
    }

    #[test]
    fn required_and_min_length_report_errors() {
        let mut form = FormGroup::new(schema());
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");

        form.set("name", json!("a")).unwrap();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].message, "must have at least 2 characters");

        form.set("name", json!("ab")).unwrap();
        assert!(form.is_valid());
    }

    #[test]
    fn false_satisfies_required() {
        let mut form = FormGroup::new(schema());
        form.set("name", json!("Gas")).unwrap();
        form.set("paid", json!(false)).unwrap();
        assert!(form.is_valid());
    }

    #[test]
    fn patch_ignores_unknown_keys_and_keeps_missing_fields() {
        let mut form = FormGroup::new(schema());
        form.patch_value(&json!({ "id": 3, "name": "Lazer", "unknown": 1 }));
        assert_eq!(form.get("id"), Some(&json!(3)));
        assert_eq!(form.get("name"), Some(&json!("Lazer")));
        assert_eq!(form.get("paid"), Some(&json!(true)));
        assert_eq!(form.get("unknown"), None);
    }

    #[test]
    fn overlay_drops_undeclared_fields() {
        let mut form = FormGroup::new(schema());
        form.set("name", json!("Salário")).unwrap();
        let sample: Sample = form.overlay().unwrap();
        assert_eq!(
            sample,
            Sample {
                id: None,
                name: "Salário".into(),
                paid: true,
                extra: None,
            }
        );
    }

    #[test]
    fn set_input_parses_by_kind() {
        let mut form = FormGroup::new(schema());
        form.set_input("id", "12").unwrap();
        form.set_input("paid", "não").unwrap();
        assert_eq!(form.get("id"), Some(&json!(12)));
        assert_eq!(form.get("paid"), Some(&json!(false)));
        assert!(matches!(
            form.set_input("id", "twelve"),
            Err(FormError::InvalidInput { .. })
        ));
        assert!(matches!(
            form.set_input("missing", "x"),
            Err(FormError::UnknownField(_))
        ));
    }

    #[test]
    fn set_rejects_values_of_the_wrong_type() {
        let mut form = FormGroup::new(schema());
        assert!(matches!(
            form.set("id", json!("12")),
            Err(FormError::InvalidInput { .. })
        ));
        assert!(matches!(
            form.set("paid", json!("yes")),
            Err(FormError::InvalidInput { .. })
        ));
        assert_eq!(form.get("paid"), Some(&json!(true)));
        form.set("id", json!(12)).unwrap();
        form.set("id", Value::Null).unwrap();
    }
}
