//! Errors raised by the lexer and the parser.
//!
//! Both passes stop at the first error. Callers that want to present several problems at
//! once convert them into [`Diagnostic`]s and collect them in an
//! [`apbl_source::ErrorReporter`].

use crate::lexer::{Token, TokenKind, TokenValue};
use apbl_source::{Diagnostic, Phase};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Error)]
pub enum LexicalErrorKind {
    /// No token starts with this character.
    #[default]
    #[error("Invalid character")]
    InvalidCharacter,
    #[error("String must begin with a quote")]
    MissingOpeningQuote,
    #[error("String is missing closing quote")]
    MissingClosingQuote,
    #[error("Comment is missing closing delimiter")]
    UnterminatedComment,
    #[error("Integer literal out of range")]
    IntegerOutOfRange,
}

/// A malformed or unrecognized piece of source text.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at line {line}: '{value}'")]
pub struct LexicalError {
    pub kind: LexicalErrorKind,
    pub line: usize,
    pub column: usize,
    /// The offending source text.
    pub value: String,
}

impl LexicalError {
    pub fn new(kind: LexicalErrorKind, line: usize, column: usize, value: impl ToString) -> Self {
        Self {
            kind,
            line,
            column,
            value: value.to_string(),
        }
    }
}

/// A token the grammar does not accept at its position.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxError {
    #[error("Syntax error at line {line}, token={kind}, value={value}")]
    UnexpectedToken {
        line: usize,
        column: usize,
        kind: TokenKind,
        value: TokenValue,
    },
    /// The input ended in the middle of a construct.
    #[error("Syntax error at EOF")]
    UnexpectedEof { line: usize },
    /// Parentheses or blocks nested deeper than the parser accepts.
    #[error("Syntax error at line {line}, nesting deeper than {limit} levels")]
    TooDeep {
        line: usize,
        column: usize,
        limit: usize,
    },
}

impl SyntaxError {
    pub fn unexpected(token: &Token) -> Self {
        SyntaxError::UnexpectedToken {
            line: token.line,
            column: token.column,
            kind: token.kind,
            value: token.value.clone(),
        }
    }

    pub fn line(&self) -> usize {
        match self {
            SyntaxError::UnexpectedToken { line, .. }
            | SyntaxError::UnexpectedEof { line }
            | SyntaxError::TooDeep { line, .. } => *line,
        }
    }

    /// Kind of the offending token, `None` at end of input or when nesting is too deep.
    pub fn found_kind(&self) -> Option<TokenKind> {
        match self {
            SyntaxError::UnexpectedToken { kind, .. } => Some(*kind),
            SyntaxError::UnexpectedEof { .. } | SyntaxError::TooDeep { .. } => None,
        }
    }
}

/// Any error of the front end.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Lexical(#[from] LexicalError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl From<&LexicalError> for Diagnostic {
    fn from(error: &LexicalError) -> Self {
        Diagnostic::new(Phase::Lexical, error.kind, error.line)
            .with_column(error.column)
            .with_value(&error.value)
    }
}

impl From<&SyntaxError> for Diagnostic {
    fn from(error: &SyntaxError) -> Self {
        match error {
            SyntaxError::UnexpectedToken {
                line,
                column,
                kind,
                value,
            } => Diagnostic::new(Phase::Syntax, format!("Unexpected token {}", kind), *line)
                .with_column(*column)
                .with_value(value),
            SyntaxError::UnexpectedEof { line } => {
                Diagnostic::new(Phase::Syntax, "Unexpected end of input", *line)
            }
            SyntaxError::TooDeep {
                line,
                column,
                limit,
            } => Diagnostic::new(
                Phase::Syntax,
                format!("Nesting deeper than {} levels", limit),
                *line,
            )
            .with_column(*column),
        }
    }
}

impl From<&Error> for Diagnostic {
    fn from(error: &Error) -> Self {
        match error {
            Error::Lexical(error) => error.into(),
            Error::Syntax(error) => error.into(),
        }
    }
}
