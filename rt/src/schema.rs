//! Structural schema descriptors
//!
//! A [`Schema`] describes the shape of a JSON document: object properties
//! and their required-ness, arrays, string enums and numeric bounds. One
//! descriptor is rendered three ways:
//!
//! - [`Schema::to_gemini`] for Gemini's `responseSchema` (OpenAPI subset)
//! - [`Schema::to_json_schema`] for JSON Schema consumers and inline prompts
//! - [`Schema::validate`] to check a parsed document against the same shape

use serde_json::{Map, Value, json};

/// Shape of a single JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Object { properties: Vec<Property> },
    Array { items: Box<Schema> },
    String { allowed: Vec<String> },
    Number { minimum: Option<f64>, maximum: Option<f64> },
    Integer { minimum: Option<i64>, maximum: Option<i64> },
    Boolean,
}

/// Named member of an object schema
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub schema: Schema,
    pub required: bool,
}

/// A schema node with an optional human description
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub kind: SchemaKind,
    pub description: Option<String>,
}

/// First place a document departs from its schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Field path such as `days[0].segments`; `$` for the document root
    pub path: String,
    pub reason: String,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Path of a member field under `parent`
pub fn field_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

/// Path of an array element under `parent`
pub fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

fn display_path(path: &str) -> String {
    if path.is_empty() { "$".to_string() } else { path.to_string() }
}

impl Schema {
    fn new(kind: SchemaKind) -> Self {
        Self { kind, description: None }
    }

    pub fn object() -> Self {
        Self::new(SchemaKind::Object { properties: Vec::new() })
    }

    pub fn array(items: Schema) -> Self {
        Self::new(SchemaKind::Array { items: Box::new(items) })
    }

    pub fn string() -> Self {
        Self::new(SchemaKind::String { allowed: Vec::new() })
    }

    pub fn string_enum<S: AsRef<str>>(allowed: &[S]) -> Self {
        Self::new(SchemaKind::String {
            allowed: allowed.iter().map(|s| s.as_ref().to_string()).collect(),
        })
    }

    pub fn number() -> Self {
        Self::new(SchemaKind::Number {
            minimum: None,
            maximum: None,
        })
    }

    pub fn integer() -> Self {
        Self::new(SchemaKind::Integer {
            minimum: None,
            maximum: None,
        })
    }

    pub fn boolean() -> Self {
        Self::new(SchemaKind::Boolean)
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Inclusive numeric range; ignored for non-numeric kinds
    pub fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        match &mut self.kind {
            SchemaKind::Number { minimum, maximum } => {
                *minimum = min;
                *maximum = max;
            }
            SchemaKind::Integer { minimum, maximum } => {
                *minimum = min.map(|v| v as i64);
                *maximum = max.map(|v| v as i64);
            }
            _ => {}
        }
        self
    }

    /// Add a required property; ignored for non-object kinds
    pub fn required(self, name: &str, schema: Schema) -> Self {
        self.with_property(name, schema, true)
    }

    /// Add an optional property; ignored for non-object kinds
    pub fn optional(self, name: &str, schema: Schema) -> Self {
        self.with_property(name, schema, false)
    }

    fn with_property(mut self, name: &str, schema: Schema, required: bool) -> Self {
        if let SchemaKind::Object { properties } = &mut self.kind {
            properties.push(Property {
                name: name.to_string(),
                schema,
                required,
            });
        }
        self
    }

    /// Look up a property schema by name
    pub fn property(&self, name: &str) -> Option<&Property> {
        match &self.kind {
            SchemaKind::Object { properties } => properties.iter().find(|p| p.name == name),
            _ => None,
        }
    }

    /// Names of required properties, in declaration order
    pub fn required_names(&self) -> Vec<&str> {
        match &self.kind {
            SchemaKind::Object { properties } => properties
                .iter()
                .filter(|p| p.required)
                .map(|p| p.name.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Render as a Gemini `responseSchema`
    pub fn to_gemini(&self) -> Value {
        self.render(true)
    }

    /// Render as JSON Schema
    pub fn to_json_schema(&self) -> Value {
        self.render(false)
    }

    fn render(&self, gemini: bool) -> Value {
        let type_name = |name: &str| {
            if gemini {
                name.to_uppercase()
            } else {
                name.to_string()
            }
        };

        let mut out = Map::new();
        match &self.kind {
            SchemaKind::Object { properties } => {
                out.insert("type".into(), json!(type_name("object")));
                let mut props = Map::new();
                for p in properties {
                    props.insert(p.name.clone(), p.schema.render(gemini));
                }
                out.insert("properties".into(), Value::Object(props));
                out.insert("required".into(), json!(self.required_names()));
                if gemini {
                    let order: Vec<&str> = properties.iter().map(|p| p.name.as_str()).collect();
                    out.insert("propertyOrdering".into(), json!(order));
                }
            }
            SchemaKind::Array { items } => {
                out.insert("type".into(), json!(type_name("array")));
                out.insert("items".into(), items.render(gemini));
            }
            SchemaKind::String { allowed } => {
                out.insert("type".into(), json!(type_name("string")));
                if !allowed.is_empty() {
                    out.insert("enum".into(), json!(allowed));
                }
            }
            SchemaKind::Number { minimum, maximum } => {
                out.insert("type".into(), json!(type_name("number")));
                if let Some(min) = minimum {
                    out.insert("minimum".into(), json!(min));
                }
                if let Some(max) = maximum {
                    out.insert("maximum".into(), json!(max));
                }
            }
            SchemaKind::Integer { minimum, maximum } => {
                out.insert("type".into(), json!(type_name("integer")));
                if let Some(min) = minimum {
                    out.insert("minimum".into(), json!(min));
                }
                if let Some(max) = maximum {
                    out.insert("maximum".into(), json!(max));
                }
            }
            SchemaKind::Boolean => {
                out.insert("type".into(), json!(type_name("boolean")));
            }
        }
        if let Some(description) = &self.description {
            out.insert("description".into(), json!(description));
        }
        Value::Object(out)
    }

    /// Check `value` against this schema, reporting the first violation
    ///
    /// Properties are visited in declaration order and array items in index
    /// order, so the reported path is deterministic. Unknown properties are
    /// allowed.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.validate_at(value, "")
    }

    /// Same as [`Schema::validate`] for a value located at `path`
    pub fn validate_at(&self, value: &Value, path: &str) -> Result<(), SchemaViolation> {
        let violation = |reason: String| SchemaViolation {
            path: display_path(path),
            reason,
        };

        match &self.kind {
            SchemaKind::Object { properties } => {
                let object = value
                    .as_object()
                    .ok_or_else(|| violation(format!("expected object, found {}", json_type(value))))?;
                for p in properties {
                    let child_path = field_path(path, &p.name);
                    match object.get(&p.name) {
                        None | Some(Value::Null) if p.required => {
                            return Err(SchemaViolation {
                                path: child_path,
                                reason: "missing required field".to_string(),
                            });
                        }
                        None | Some(Value::Null) => {}
                        Some(child) => p.schema.validate_at(child, &child_path)?,
                    }
                }
                Ok(())
            }
            SchemaKind::Array { items } => {
                let array = value
                    .as_array()
                    .ok_or_else(|| violation(format!("expected array, found {}", json_type(value))))?;
                for (i, item) in array.iter().enumerate() {
                    items.validate_at(item, &index_path(path, i))?;
                }
                Ok(())
            }
            SchemaKind::String { allowed } => {
                let s = value
                    .as_str()
                    .ok_or_else(|| violation(format!("expected string, found {}", json_type(value))))?;
                if !allowed.is_empty() && !allowed.iter().any(|a| a == s) {
                    return Err(violation(format!("'{}' is not one of {}", s, allowed.join(", "))));
                }
                Ok(())
            }
            SchemaKind::Number { minimum, maximum } => {
                let n = value
                    .as_f64()
                    .ok_or_else(|| violation(format!("expected number, found {}", json_type(value))))?;
                check_range(n, *minimum, *maximum).map_err(violation)
            }
            SchemaKind::Integer { minimum, maximum } => {
                let n = value
                    .as_i64()
                    .ok_or_else(|| violation(format!("expected integer, found {}", json_type(value))))?;
                check_range(n as f64, minimum.map(|m| m as f64), maximum.map(|m| m as f64)).map_err(violation)
            }
            SchemaKind::Boolean => {
                if value.is_boolean() {
                    Ok(())
                } else {
                    Err(violation(format!("expected boolean, found {}", json_type(value))))
                }
            }
        }
    }
}

fn check_range(n: f64, minimum: Option<f64>, maximum: Option<f64>) -> Result<(), String> {
    if let Some(min) = minimum
        && n < min
    {
        return Err(format!("{} is below the minimum {}", n, min));
    }
    if let Some(max) = maximum
        && n > max
    {
        return Err(format!("{} is above the maximum {}", n, max));
    }
    Ok(())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> Schema {
        Schema::object()
            .required("lat", Schema::number().range(Some(-90.0), Some(90.0)))
            .optional("label", Schema::string())
    }

    #[test]
    fn test_gemini_rendering_uses_uppercase_types() {
        let schema = Schema::object()
            .required("kind", Schema::string_enum(&["A", "B"]).describe("Kind"))
            .optional("count", Schema::integer());

        let rendered = schema.to_gemini();
        assert_eq!(rendered["type"], "OBJECT");
        assert_eq!(rendered["properties"]["kind"]["type"], "STRING");
        assert_eq!(rendered["properties"]["kind"]["enum"], json!(["A", "B"]));
        assert_eq!(rendered["properties"]["kind"]["description"], "Kind");
        assert_eq!(rendered["properties"]["count"]["type"], "INTEGER");
        assert_eq!(rendered["required"], json!(["kind"]));
        assert_eq!(rendered["propertyOrdering"], json!(["kind", "count"]));
    }

    #[test]
    fn test_json_schema_rendering() {
        let rendered = Schema::array(point()).to_json_schema();
        assert_eq!(rendered["type"], "array");
        assert_eq!(rendered["items"]["type"], "object");
        assert_eq!(rendered["items"]["properties"]["lat"]["minimum"], -90.0);
        assert!(rendered["items"].get("propertyOrdering").is_none());
    }

    #[test]
    fn test_validate_accepts_conforming_value() {
        let value = json!({"lat": 45.0, "label": "x", "extra": true});
        assert!(point().validate(&value).is_ok());
    }

    #[test]
    fn test_validate_reports_missing_field_path() {
        let schema = Schema::object().required("points", Schema::array(point()));
        let value = json!({"points": [{"lat": 1.0}, {"label": "no lat"}]});

        let err = schema.validate(&value).unwrap_err();
        assert_eq!(err.path, "points[1].lat");
        assert_eq!(err.reason, "missing required field");
    }

    #[test]
    fn test_null_counts_as_missing() {
        let err = point().validate(&json!({"lat": null})).unwrap_err();
        assert_eq!(err.path, "lat");
    }

    #[test]
    fn test_validate_type_and_range() {
        let err = point().validate(&json!({"lat": "north"})).unwrap_err();
        assert!(err.reason.contains("expected number"));

        let err = point().validate(&json!({"lat": 91.0})).unwrap_err();
        assert!(err.reason.contains("above the maximum"));
    }

    #[test]
    fn test_validate_enum_and_integer() {
        let schema = Schema::object()
            .required("kind", Schema::string_enum(&["A"]))
            .required("n", Schema::integer().range(Some(1.0), None));

        let err = schema.validate(&json!({"kind": "Z", "n": 1})).unwrap_err();
        assert_eq!(err.path, "kind");

        let err = schema.validate(&json!({"kind": "A", "n": 1.5})).unwrap_err();
        assert_eq!(err.path, "n");

        let err = schema.validate(&json!({"kind": "A", "n": 0})).unwrap_err();
        assert!(err.reason.contains("below the minimum"));
    }

    #[test]
    fn test_root_violation_path() {
        let err = point().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err.path, "$");
        assert_eq!(err.to_string(), "$: expected object, found array");
    }
}
