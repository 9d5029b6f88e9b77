//! Typed view over the parts of a JSON Schema document that matter for enum
//! extraction.

use serde_json::{Map, Value};

/// The shapes a schema node can take as far as enum extraction is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode<'a> {
    /// `"type": "object"` with its `properties` in the order they appear in
    /// the source document
    Object { properties: &'a Map<String, Value> },
    /// A non-object schema with a non-empty `enum` of strings
    Enum { members: Vec<&'a str> },
    /// Primitives, arrays and schemas with nothing to extract
    Other,
}

/// A schema that deviates from the shapes [`SchemaNode`] knows about.
///
/// Every variant carries the JSON pointer of the offending node inside its
/// document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("object schema at `{pointer}` has no `properties`")]
    MissingProperties { pointer: String },

    #[error("`properties` of the object schema at `{pointer}` must be an object, but found: {found}")]
    PropertiesNotObject { pointer: String, found: String },

    #[error("`enum` of the schema at `{pointer}` must be an array, but found: {found}")]
    EnumNotArray { pointer: String, found: String },

    #[error("`enum` member #{index} of the schema at `{pointer}` must be a string, but found: {found}")]
    NonStringEnumMember {
        pointer: String,
        index: usize,
        found: String,
    },
}

impl SchemaError {
    pub fn pointer(&self) -> &str {
        match self {
            Self::MissingProperties { pointer }
            | Self::PropertiesNotObject { pointer, .. }
            | Self::EnumNotArray { pointer, .. }
            | Self::NonStringEnumMember { pointer, .. } => pointer,
        }
    }
}

impl<'a> SchemaNode<'a> {
    /// `pointer` is only used for error reporting, it should point at `value`
    /// inside of its document.
    pub fn classify(value: &'a Value, pointer: &str) -> Result<Self, SchemaError> {
        let Value::Object(object) = value else {
            return Ok(Self::Other);
        };

        if object.get("type").and_then(Value::as_str) == Some("object") {
            let properties = match object.get("properties") {
                Some(Value::Object(properties)) => properties,
                None | Some(Value::Null) => {
                    return Err(SchemaError::MissingProperties {
                        pointer: pointer.to_owned(),
                    })
                }
                Some(other) => {
                    return Err(SchemaError::PropertiesNotObject {
                        pointer: pointer.to_owned(),
                        found: other.to_string(),
                    })
                }
            };
            return Ok(Self::Object { properties });
        }

        let members = match object.get("enum") {
            None | Some(Value::Null) => return Ok(Self::Other),
            Some(Value::Array(members)) => members,
            Some(other) => {
                return Err(SchemaError::EnumNotArray {
                    pointer: pointer.to_owned(),
                    found: other.to_string(),
                })
            }
        };

        if members.is_empty() {
            return Ok(Self::Other);
        }

        let members = members
            .iter()
            .enumerate()
            .map(|(index, member)| {
                member
                    .as_str()
                    .ok_or_else(|| SchemaError::NonStringEnumMember {
                        pointer: pointer.to_owned(),
                        index,
                        found: member.to_string(),
                    })
            })
            .collect::<Result<_, _>>()?;

        Ok(Self::Enum { members })
    }
}

/// Pointer to the root of a schema document, in URI fragment form
pub const ROOT_POINTER: &str = "#";

/// Pointer to the schema of `property` inside of the object schema at `parent`
pub fn property_pointer(parent: &str, property: &str) -> String {
    let escaped = property.replace('~', "~0").replace('/', "~1");
    format!("{parent}/properties/{escaped}")
}
