//! Generates TypeScript `enum` declarations from the `enum` clauses found in
//! a directory tree of JSON Schema files.
//!
//! The pipeline has three stages that run in sequence:
//!
//! 1. [`discovery`] finds every `*.json` file below a root directory.
//! 2. [`load`] parses each file and [`extract`] walks its schema tree,
//!    collecting [`EnumDecl`]s.
//! 3. [`render`] turns the declarations into text and [`codegen`] writes it
//!    to a single output file.

pub mod codegen;
pub mod discovery;
pub mod extract;
pub mod load;
pub mod render;
pub mod schema;

pub use camino::{Utf8Path as Path, Utf8PathBuf as PathBuf};
pub use codegen::{Codegen, CodegenError, DuplicateName, DuplicatePolicy, Outcome};
pub use discovery::{Discovery, DiscoveryError, DiscoveryPolicy};
pub use extract::EnumDecl;
pub use schema::{SchemaError, SchemaNode};

/// Name of the output file written when the caller doesn't pick one
pub const DEFAULT_FILE_NAME: &str = "types.ts";

/// Extension of the schema files picked up by [`discovery`]
pub const SCHEMA_EXTENSION: &str = ".json";
