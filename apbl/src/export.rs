//! JSON export of the analysis artifacts.

use crate::Compilation;
use apbl_parser::{Program, Token};
use serde::Serialize;

#[derive(Serialize)]
struct Document<'a> {
    tokens: &'a [Token],
    ast: &'a Program,
}

/// Serializes both artifacts as `{ "tokens": [...], "ast": {...} }`.
pub fn compilation_to_json(compilation: &Compilation) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Document {
        tokens: &compilation.tokens,
        ast: &compilation.program,
    })
}
