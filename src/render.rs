//! Renders enum declarations as TypeScript source.

use crate::EnumDecl;
use itertools::Itertools as _;

/// Renders a single `export enum` where every member is keyed by its own
/// value:
///
/// ```text
/// export enum Color {
/// "RED" = "RED",
/// "GREEN" = "GREEN"
/// }
///
/// ```
///
/// Members are string literals quoted the way JSON quotes them, which is also
/// valid in TypeScript. The trailing blank line keeps concatenated
/// declarations readable.
///
/// `name` is emitted verbatim. Property and file names are not required to be
/// TypeScript identifiers, so a name such as `content-type` or `2fa` produces
/// a declaration that doesn't compile.
pub fn enum_decl<S: AsRef<str>>(name: &str, members: &[S]) -> String {
    let members = members
        .iter()
        .map(|member| {
            let literal = string_literal(member.as_ref());
            format!("{literal} = {literal}")
        })
        .join(",\n");

    format!("export enum {name} {{\n{members}\n}}\n\n")
}

/// Concatenation of [`enum_decl`] for every declaration, in order
pub fn enum_decls<'a>(decls: impl IntoIterator<Item = &'a EnumDecl>) -> String {
    decls
        .into_iter()
        .map(|decl| enum_decl(&decl.name, &decl.members))
        .collect()
}

fn string_literal(value: &str) -> String {
    // Serializing a `str` can't fail
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}
