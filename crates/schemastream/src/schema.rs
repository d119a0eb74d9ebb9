//! A declarative, builder-style description of an object's fields, the
//! defaulter that produces a streaming-relaxed copy of it, and the
//! validator that a defaulted schema drives.
//!
//! There is no derive macro or reflection here — callers build a [`Schema`]
//! by hand and hand it to [`crate::StreamingParser::new`].

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{ModelBuildError, ValidationError};

/// The declared type of a field, mirroring the kinds the defaulter and
/// validator must distinguish: string/number/bool/null/sequence/mapping
/// /nested-schema/union.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// A JSON string.
    String,
    /// A JSON number.
    Number,
    /// A JSON boolean.
    Bool,
    /// The JSON literal `null`.
    Null,
    /// A homogeneous array of the given element kind.
    Sequence(Box<FieldKind>),
    /// An object with arbitrary keys and a homogeneous value kind.
    Mapping(Box<FieldKind>),
    /// A nested, named sub-schema.
    Nested(Box<Schema>),
    /// One of several kinds; validated against each member in order.
    Union(Vec<FieldKind>),
}

/// A default value produced on demand rather than once and shared.
///
/// Produces a freshly built value on each call rather than cloning a single
/// shared instance.
#[derive(Clone)]
pub struct DefaultFactory(Arc<dyn Fn() -> Value + Send + Sync>);

impl DefaultFactory {
    /// Wrap a closure as a default factory.
    pub fn new(f: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    fn call(&self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for DefaultFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DefaultFactory(..)")
    }
}

/// One field of a [`Schema`].
#[derive(Debug, Clone)]
pub struct Field {
    /// The field's name / JSON object key.
    pub name: String,
    /// The field's declared kind.
    pub kind: FieldKind,
    /// Whether an explicit JSON `null` is a legal value for this field.
    pub nullable: bool,
    /// An explicit default value, highest precedence.
    pub default: Option<Value>,
    /// An explicit default factory, second precedence.
    pub default_factory: Option<DefaultFactory>,
    /// The streaming-relaxed default, used only absent the two above.
    pub stream_default: Option<Value>,
}

impl Field {
    /// A required, non-nullable field with no defaults configured yet.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            default: None,
            default_factory: None,
            stream_default: None,
        }
    }

    /// Mark the field nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Attach an explicit default value.
    #[must_use]
    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Attach an explicit default factory.
    #[must_use]
    pub fn default_factory(mut self, factory: DefaultFactory) -> Self {
        self.default_factory = Some(factory);
        self
    }

    /// Attach a stream-mode default, used only while no explicit
    /// default/factory is present.
    #[must_use]
    pub fn stream_default(mut self, value: Value) -> Self {
        self.stream_default = Some(value);
        self
    }

    fn resolved(&self, path: &str) -> Result<Field, ModelBuildError> {
        let kind = defaulted_kind(&self.kind, path)?;
        let default = Some(resolve_default_value(self, path, &kind)?);
        Ok(Field {
            name: self.name.clone(),
            kind,
            nullable: self.nullable,
            default,
            default_factory: None,
            stream_default: self.stream_default.clone(),
        })
    }
}

/// A declarative description of an object's fields.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Fields, in declaration order.
    pub fields: Vec<Field>,
}

impl Schema {
    /// An empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Produce a streaming-relaxed copy of this schema: every field is
    /// given a usable default, or construction fails with a
    /// [`ModelBuildError`] naming the offending field path.
    pub fn with_stream_defaults(&self) -> Result<Schema, ModelBuildError> {
        let fields = self
            .fields
            .iter()
            .map(|f| f.resolved(&f.name))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Schema { fields })
    }

    /// Validate `value` (expected to be a JSON object) against this
    /// (defaulted) schema, filling in any missing field from its resolved
    /// default.
    pub fn validate(&self, value: &Value, path: &str) -> Result<Value, ValidationError> {
        let obj = value
            .as_object()
            .ok_or_else(|| mismatch(path, "expected an object"))?;
        let mut out = Map::new();
        for field in &self.fields {
            let child_path = join(path, &field.name);
            let validated = match obj.get(&field.name) {
                Some(v) => validate_value(&field.kind, field.nullable, v, &child_path)?,
                None => field.default.clone().ok_or_else(|| {
                    mismatch(&child_path, "missing required field with no default")
                })?,
            };
            out.insert(field.name.clone(), validated);
        }
        Ok(Value::Object(out))
    }
}

fn defaulted_kind(kind: &FieldKind, path: &str) -> Result<FieldKind, ModelBuildError> {
    Ok(match kind {
        FieldKind::String | FieldKind::Number | FieldKind::Bool | FieldKind::Null => kind.clone(),
        FieldKind::Sequence(inner) => {
            FieldKind::Sequence(Box::new(defaulted_kind(inner, path)?))
        }
        FieldKind::Mapping(inner) => FieldKind::Mapping(Box::new(defaulted_kind(inner, path)?)),
        FieldKind::Union(members) => FieldKind::Union(
            members
                .iter()
                .map(|m| defaulted_kind(m, path))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        FieldKind::Nested(schema) => FieldKind::Nested(Box::new(schema.with_stream_defaults()?)),
    })
}

fn resolve_default_value(
    field: &Field,
    path: &str,
    kind: &FieldKind,
) -> Result<Value, ModelBuildError> {
    if let Some(default) = &field.default {
        return Ok(default.clone());
    }
    if let Some(factory) = &field.default_factory {
        return Ok(factory.call());
    }
    if let Some(stream_default) = &field.stream_default {
        return Ok(stream_default.clone());
    }
    if field.nullable {
        return Ok(Value::Null);
    }
    match kind {
        FieldKind::Null => Ok(Value::Null),
        FieldKind::String => Ok(Value::String(String::new())),
        FieldKind::Sequence(_) => Ok(Value::Array(Vec::new())),
        FieldKind::Mapping(_) => Ok(Value::Object(Map::new())),
        FieldKind::Nested(schema) => Ok(build_default_object(schema)),
        FieldKind::Number | FieldKind::Bool | FieldKind::Union(_) => Err(ModelBuildError::new(
            path,
            "required field has no explicit default, factory, or stream default, \
             and its kind cannot be automatically defaulted",
        )),
    }
}

fn build_default_object(schema: &Schema) -> Value {
    let mut map = Map::new();
    for field in &schema.fields {
        map.insert(
            field.name.clone(),
            field.default.clone().unwrap_or(Value::Null),
        );
    }
    Value::Object(map)
}

fn validate_value(
    kind: &FieldKind,
    nullable: bool,
    value: &Value,
    path: &str,
) -> Result<Value, ValidationError> {
    if value.is_null() {
        return if nullable || matches!(kind, FieldKind::Null) {
            Ok(Value::Null)
        } else {
            Err(mismatch(path, "null is not allowed for a non-nullable field"))
        };
    }

    match kind {
        FieldKind::String => value_of(value.is_string(), value, path, "expected a string"),
        FieldKind::Number => value_of(value.is_number(), value, path, "expected a number"),
        FieldKind::Bool => value_of(value.is_boolean(), value, path, "expected a boolean"),
        FieldKind::Null => Err(mismatch(path, "expected null")),
        FieldKind::Sequence(inner) => {
            let arr = value
                .as_array()
                .ok_or_else(|| mismatch(path, "expected an array"))?;
            let mut out = Vec::with_capacity(arr.len());
            for (i, item) in arr.iter().enumerate() {
                out.push(validate_value(inner, false, item, &format!("{path}[{i}]"))?);
            }
            Ok(Value::Array(out))
        }
        FieldKind::Mapping(inner) => {
            let map = value
                .as_object()
                .ok_or_else(|| mismatch(path, "expected an object"))?;
            let mut out = Map::new();
            for (key, v) in map {
                out.insert(key.clone(), validate_value(inner, false, v, &format!("{path}.{key}"))?);
            }
            Ok(Value::Object(out))
        }
        FieldKind::Nested(schema) => schema.validate(value, path),
        FieldKind::Union(members) => members
            .iter()
            .find_map(|member| validate_value(member, false, value, path).ok())
            .ok_or_else(|| mismatch(path, "value does not match any union member")),
    }
}

fn value_of(
    ok: bool,
    value: &Value,
    path: &str,
    reason: &str,
) -> Result<Value, ValidationError> {
    if ok {
        Ok(value.clone())
    } else {
        Err(mismatch(path, reason))
    }
}

fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}.{name}")
    }
}

fn mismatch(path: &str, reason: &str) -> ValidationError {
    ValidationError::SchemaMismatch {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_default_wins_over_everything() {
        let schema = Schema::new().field(
            Field::new("n", FieldKind::Number)
                .default(Value::from(7))
                .stream_default(Value::from(0)),
        );
        let defaulted = schema.with_stream_defaults().unwrap();
        assert_eq!(defaulted.fields[0].default, Some(Value::from(7)));
    }

    #[test]
    fn stream_default_used_absent_explicit_default() {
        let schema =
            Schema::new().field(Field::new("n", FieldKind::Number).stream_default(Value::from(5)));
        let defaulted = schema.with_stream_defaults().unwrap();
        assert_eq!(defaulted.fields[0].default, Some(Value::from(5)));
    }

    #[test]
    fn nullable_field_defaults_to_null() {
        let schema = Schema::new().field(Field::new("n", FieldKind::Number).nullable());
        let defaulted = schema.with_stream_defaults().unwrap();
        assert_eq!(defaulted.fields[0].default, Some(Value::Null));
    }

    #[test]
    fn required_string_auto_defaults_to_empty() {
        let schema = Schema::new().field(Field::new("s", FieldKind::String));
        let defaulted = schema.with_stream_defaults().unwrap();
        assert_eq!(defaulted.fields[0].default, Some(Value::String(String::new())));
    }

    #[test]
    fn required_sequence_auto_defaults_to_empty_array() {
        let schema =
            Schema::new().field(Field::new("l", FieldKind::Sequence(Box::new(FieldKind::Number))));
        let defaulted = schema.with_stream_defaults().unwrap();
        assert_eq!(defaulted.fields[0].default, Some(Value::Array(vec![])));
    }

    #[test]
    fn required_number_with_no_default_fails() {
        let schema = Schema::new().field(Field::new("n", FieldKind::Number));
        assert!(schema.with_stream_defaults().is_err());
    }

    #[test]
    fn union_without_field_level_default_fails() {
        let schema = Schema::new().field(Field::new(
            "u",
            FieldKind::Union(vec![FieldKind::Sequence(Box::new(FieldKind::Number)), FieldKind::String]),
        ));
        assert!(schema.with_stream_defaults().is_err());
    }

    #[test]
    fn nested_schema_recursively_defaults() {
        let inner = Schema::new().field(Field::new("city", FieldKind::String));
        let schema = Schema::new().field(Field::new("address", FieldKind::Nested(Box::new(inner))));
        let defaulted = schema.with_stream_defaults().unwrap();
        assert_eq!(
            defaulted.fields[0].default,
            Some(serde_json::json!({"city": ""}))
        );
    }

    #[test]
    fn validate_fills_missing_field_from_default() {
        let schema = Schema::new()
            .field(Field::new("s", FieldKind::String))
            .with_stream_defaults()
            .unwrap();
        let result = schema.validate(&serde_json::json!({}), "").unwrap();
        assert_eq!(result, serde_json::json!({"s": ""}));
    }

    #[test]
    fn validate_rejects_type_mismatch() {
        let schema = Schema::new()
            .field(Field::new("n", FieldKind::Number).stream_default(Value::from(0)))
            .with_stream_defaults()
            .unwrap();
        assert!(schema.validate(&serde_json::json!({"n": "not a number"}), "").is_err());
    }
}
