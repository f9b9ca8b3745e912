//! Schema inference engine for JSON example values
//!
//! Derives a Draft-4 style JSON schema from one concrete response body. The
//! result asserts shape (types, required keys) rather than content; literal
//! values are only pinned through `enum` when the caller asks for it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

use crate::errors::{Error, Result};

/// Default expansion depth for [`InferenceOptions`]
pub const DEFAULT_DEPTH_LIMIT: usize = 10;

/// Depth used when a response schema is printed for debugging
pub const DEBUG_DEPTH_LIMIT: usize = 4;

/// JSON schema primitive type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl SchemaType {
    /// Classify a JSON value. Integers and floats stay distinct.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => SchemaType::Null,
            Value::Bool(_) => SchemaType::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => SchemaType::Integer,
            Value::Number(_) => SchemaType::Number,
            Value::String(_) => SchemaType::String,
            Value::Array(_) => SchemaType::Array,
            Value::Object(_) => SchemaType::Object,
        }
    }
}

/// Which scalar fields get their literal value pinned as a single-element `enum`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EnumMode {
    /// Types only
    #[default]
    Off,
    /// Every scalar, including array items and the root value
    AllScalars,
    /// Scalars stored under one of these property names, at any depth
    Fields(HashSet<String>),
}

impl EnumMode {
    /// Pin the named fields
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EnumMode::Fields(names.into_iter().map(Into::into).collect())
    }

    fn pins(&self, field: Option<&str>) -> bool {
        match self {
            EnumMode::Off => false,
            EnumMode::AllScalars => true,
            EnumMode::Fields(names) => field.is_some_and(|f| names.contains(f)),
        }
    }
}

/// Options recognised by [`SchemaInferencer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceOptions {
    /// Deepest nesting level whose `properties` / `items` are still expanded
    pub depth_limit: usize,
    /// Literal pinning mode
    pub enum_mode: EnumMode,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self { depth_limit: DEFAULT_DEPTH_LIMIT, enum_mode: EnumMode::Off }
    }
}

impl InferenceOptions {
    /// Options with a custom depth limit
    pub fn with_depth(depth_limit: usize) -> Self {
        Self { depth_limit, ..Self::default() }
    }

    /// Set the enum mode
    pub fn enum_mode(mut self, enum_mode: EnumMode) -> Self {
        self.enum_mode = enum_mode;
        self
    }
}

/// Inferred schema node
///
/// A node for `null` carries no `type` at all: a null sample says nothing
/// reliable about what the field holds in other responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    /// Object members in document order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaNode>>,

    /// Always equal to the keys of `properties`, same order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    /// Schema of the first array element
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
}

impl SchemaNode {
    /// Node that only states a type
    pub fn typed(schema_type: SchemaType) -> Self {
        Self { schema_type: Some(schema_type), ..Self::default() }
    }

    /// Look up a direct property
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.as_ref().and_then(|props| props.get(name))
    }

    /// Pin a direct property to literal values. Missing properties are ignored.
    ///
    /// Array values are taken as the full enum list; any other value is
    /// wrapped into a single-element list.
    pub fn apply_enum_overrides<'a, I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (&'a str, &'a Value)>,
    {
        let Some(props) = self.properties.as_mut() else {
            return;
        };
        for (field, value) in overrides {
            if let Some(node) = props.get_mut(field) {
                node.enum_values = Some(super::overrides::enum_list(value));
            }
        }
    }

    /// Convert to a JSON schema document
    pub fn to_json_schema(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| Error::serialization(e, "schema node to JSON"))
    }

    /// Pretty-printed JSON schema, four-space indented
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut ser).map_err(|e| Error::serialization(e, "pretty schema"))?;
        String::from_utf8(out).map_err(|e| Error::validation(format!("schema not UTF-8: {e}")))
    }
}

/// Schema inferencer over decoded JSON values
#[derive(Debug, Clone, Default)]
pub struct SchemaInferencer {
    options: InferenceOptions,
}

impl SchemaInferencer {
    /// Create an inferencer with default options (depth 10, no enums)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an inferencer with explicit options
    pub fn with_options(options: InferenceOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    pub fn options(&self) -> &InferenceOptions {
        &self.options
    }

    /// Infer the schema of a whole document (level 0, no field name)
    pub fn infer(&self, value: &Value) -> SchemaNode {
        self.infer_at(None, value, 0)
    }

    /// Parse a JSON document and infer its schema
    pub fn infer_from_json(&self, json_str: &str) -> Result<SchemaNode> {
        let value: Value = serde_json::from_str(json_str)
            .map_err(|e| Error::validation(format!("Invalid JSON payload: {}", e)))?;
        let schema = self.infer(&value);
        debug!(depth_limit = self.options.depth_limit, "Inferred schema from JSON payload");
        Ok(schema)
    }

    /// Infer the schema of `value`, found under `field`, at nesting `level`
    pub fn infer_at(&self, field: Option<&str>, value: &Value, level: usize) -> SchemaNode {
        let schema_type = SchemaType::of(value);
        let next_level = level + 1;
        let expand = next_level <= self.options.depth_limit;

        match value {
            Value::Object(obj) => {
                let mut node = SchemaNode::typed(schema_type);
                if expand {
                    let mut properties = IndexMap::with_capacity(obj.len());
                    for (key, child) in obj {
                        properties.insert(key.clone(), self.infer_at(Some(key), child, next_level));
                    }
                    node.required = Some(properties.keys().cloned().collect());
                    node.properties = Some(properties);
                }
                node
            }
            Value::Array(arr) => {
                let mut node = SchemaNode::typed(schema_type);
                if let (true, Some(first)) = (expand, arr.first()) {
                    node.items = Some(Box::new(self.infer_at(None, first, next_level)));
                }
                node
            }
            Value::Null => SchemaNode::default(),
            _ => {
                let mut node = SchemaNode::typed(schema_type);
                if self.options.enum_mode.pins(field) {
                    node.enum_values = Some(vec![value.clone()]);
                }
                node
            }
        }
    }
}

/// Infer a schema with the given options
pub fn infer(value: &Value, options: &InferenceOptions) -> SchemaNode {
    SchemaInferencer::with_options(options.clone()).infer(value)
}
