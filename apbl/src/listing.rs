//! Human readable listing of a token sequence.

use apbl_parser::Token;
use std::fmt::Write;

/// Renders one `Line N: KIND(value)` entry per token under a `LEXICAL ANALYSIS` heading.
pub fn token_listing(tokens: &[Token]) -> String {
    let mut out = String::from("LEXICAL ANALYSIS\n================\n\n");
    for token in tokens {
        // writing into a String cannot fail
        let _ = writeln!(out, "Line {}: {}", token.line, token);
    }
    out
}
