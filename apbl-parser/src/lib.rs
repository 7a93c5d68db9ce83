//! Lexer, AST definitions and parser for APBL, a small booking language.
//!
//! The front end is two strictly sequential passes:
//! - [`tokenize`] turns source text into [`Token`]s,
//! - [`parse`] turns the tokens into a [`Program`].
//!
//! Both passes stop at their first error.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod visitor;

pub use ast::{
    BinOp, Block, Expr, FunctionCall, FunctionDef, Literal, Parameter, Program, Stmt, TypeTag,
};
pub use error::{Error, LexicalError, LexicalErrorKind, SyntaxError};
pub use lexer::{tokenize, Token, TokenKind, TokenValue};
pub use parser::{parse, Parser};

/// Runs both passes over `source`.
pub fn parse_source(source: &str) -> Result<Program, Error> {
    let tokens = tokenize(source)?;
    Ok(parse(&tokens)?)
}
