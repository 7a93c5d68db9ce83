//! Source code representation and error management.

use std::{cell::RefCell, fmt};

/// Represents source code.
#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
    /// Display name of the source, usually a file path.
    pub name: &'a str,
    /// Original source code.
    pub content: &'a str,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `name` and `content`.
    pub fn new(name: &'a str, content: &'a str) -> Self {
        Self { name, content }
    }

    /// Returns the number of lines in the source. An empty source has one line.
    pub fn line_count(&self) -> usize {
        self.content.matches('\n').count() + 1
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new("<input>", content)
    }
}

/// The analysis pass that produced a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Lexical,
    Syntax,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lexical => write!(f, "Lexical"),
            Phase::Syntax => write!(f, "Syntax"),
        }
    }
}

/// A located compile time error, detached from the pass that raised it.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub phase: Phase,
    pub message: String,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, when known.
    pub column: Option<usize>,
    /// The offending source text, when known.
    pub value: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with the specified `phase`, `message` and `line`.
    pub fn new(phase: Phase, message: impl ToString, line: usize) -> Self {
        Self {
            phase,
            message: message.to_string(),
            line,
            column: None,
            value: None,
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_value(mut self, value: impl ToString) -> Self {
        self.value = Some(value.to_string());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}", self.message, self.line)?;
        if let Some(column) = self.column {
            write!(f, ", column {}", column)?;
        }
        if let Some(value) = &self.value {
            write!(f, ": '{}'", value)?;
        }
        Ok(())
    }
}

/// Collects diagnostics from several passes so they can be reported together.
pub struct ErrorReporter {
    errors: RefCell<Vec<Diagnostic>>,
}

impl ErrorReporter {
    /// Create an empty `ErrorReporter`.
    pub fn new() -> Self {
        Self {
            errors: RefCell::new(Vec::new()),
        }
    }

    /// Adds a diagnostic to the `ErrorReporter`.
    /// This method uses the interior mutability pattern. This does not require mutability for
    /// ergonomics.
    pub fn add_error(&self, error: Diagnostic) {
        // This should be the only place where self.errors is borrowed mutably.
        self.errors.borrow_mut().push(error);
    }

    /// Returns `true` if no diagnostic has been added.
    pub fn has_no_errors(&self) -> bool {
        self.errors.borrow().is_empty()
    }

    /// Returns the collected diagnostics ordered by line, lexical before syntax on the same line.
    pub fn sorted(&self) -> Vec<Diagnostic> {
        let mut errors = self.errors.borrow().clone();
        errors.sort_by_key(|e| (e.line, e.phase));
        errors
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_no_errors() {
            return Ok(());
        }

        let errors = self.sorted();
        for phase in [Phase::Lexical, Phase::Syntax] {
            let group: Vec<&Diagnostic> = errors.iter().filter(|e| e.phase == phase).collect();
            if group.is_empty() {
                continue;
            }
            writeln!(f, "{phase} Errors:")?;
            for (i, error) in group.iter().enumerate() {
                writeln!(f, "{}. {}", i + 1, error)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "Total Errors: {}", errors.len())
    }
}
