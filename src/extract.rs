//! Collects the enum declarations of a schema document.

use crate::schema::{self, SchemaError, SchemaNode};
use crate::{Path, PathBuf, SCHEMA_EXTENSION};
use serde_json::Value;
use tracing::debug;

/// A single enum found in a schema document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    /// Either the property that owns the enum, or the base name of the file
    /// when the enum is the document itself
    pub name: String,
    /// Members in the order they are listed in the schema
    pub members: Vec<String>,
    /// Schema file the enum was found in
    pub source: PathBuf,
}

/// Walks the schema tree rooted at `value` and returns every enum in it in
/// property order.
///
/// `name` is used if `value` is itself an enum. Nested enums are named after
/// the property they are defined by. Only `properties` of object schemas are
/// descended into, so enums inside of arrays, `allOf`/`oneOf`/`anyOf` or
/// behind a `$ref` are not found.
pub fn enums(value: &Value, name: &str, source: &Path) -> Result<Vec<EnumDecl>, SchemaError> {
    let mut decls = Vec::new();
    collect(value, name, schema::ROOT_POINTER, source, &mut decls)?;
    Ok(decls)
}

fn collect(
    value: &Value,
    name: &str,
    pointer: &str,
    source: &Path,
    decls: &mut Vec<EnumDecl>,
) -> Result<(), SchemaError> {
    match SchemaNode::classify(value, pointer)? {
        SchemaNode::Object { properties } => {
            for (property, child) in properties {
                let pointer = schema::property_pointer(pointer, property);
                collect(child, property, &pointer, source, decls)?;
            }
        }
        SchemaNode::Enum { members } => {
            debug!(enum_name = name, %source, pointer, members = members.len(), "Found enum");
            decls.push(EnumDecl {
                name: name.to_owned(),
                members: members.into_iter().map(str::to_owned).collect(),
                source: source.to_owned(),
            });
        }
        SchemaNode::Other => {}
    }

    Ok(())
}

/// Name given to an enum that is the whole content of a schema file: the file
/// name without its `.json` suffix.
pub fn file_stem_name(path: &Path) -> &str {
    let file_name = path.file_name().unwrap_or(path.as_str());
    match file_name.strip_suffix(SCHEMA_EXTENSION) {
        Some(stem) if !stem.is_empty() => stem,
        _ => file_name,
    }
}
