//! Driver for the APBL front end: runs both analysis passes over a source and renders or
//! persists what they produced.

pub mod export;
pub mod listing;
pub mod tree;

use apbl_parser::{parse, tokenize, Program, Token};
use apbl_source::{Diagnostic, ErrorReporter, Source};
use clap::ValueEnum;
use std::{fs, io, path::Path, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Analysis(#[from] apbl_parser::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// The artifacts of a successful analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub program: Program,
}

/// What to render after a successful analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Emit {
    /// Nothing, only report success.
    #[default]
    None,
    /// The token listing.
    Tokens,
    /// The AST as an indented tree.
    Ast,
    /// Tokens and AST as JSON.
    Json,
}

/// Tokenizes then parses `source`. Syntax analysis is skipped when lexing fails.
pub fn compile(source: &Source) -> Result<Compilation, apbl_parser::Error> {
    let _span = tracing::info_span!("compile", source = source.name).entered();
    tracing::debug!(lines = source.line_count(), "starting lexical analysis");

    let tokens = tokenize(source.content).map_err(|error| {
        tracing::warn!(%error, "lexical analysis failed");
        error
    })?;
    let program = parse(&tokens).map_err(|error| {
        tracing::warn!(%error, "syntax analysis failed");
        error
    })?;

    tracing::info!(
        tokens = tokens.len(),
        statements = program.statements.len(),
        "analysis succeeded"
    );
    Ok(Compilation { tokens, program })
}

/// Renders the requested artifact. Returns `None` for [`Emit::None`].
pub fn render(compilation: &Compilation, emit: Emit) -> Result<Option<String>, Error> {
    let artifact = match emit {
        Emit::None => return Ok(None),
        Emit::Tokens => listing::token_listing(&compilation.tokens),
        Emit::Ast => tree::syntax_tree(&compilation.program),
        Emit::Json => export::compilation_to_json(compilation)?,
    };
    Ok(Some(artifact))
}

/// Collects the error of a failed analysis into a reporter for display.
pub fn report(error: &apbl_parser::Error) -> ErrorReporter {
    let reporter = ErrorReporter::new();
    reporter.add_error(Diagnostic::from(error));
    reporter
}

/// Reads and analyses the file at `path`.
pub fn compile_file(path: &Path) -> Result<Compilation, Error> {
    let content = read_source(path)?;
    let name = path.display().to_string();
    Ok(compile(&Source::new(&name, &content))?)
}

fn read_source(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_artifact(path: &Path, artifact: &str) -> Result<(), Error> {
    tracing::debug!(path = %path.display(), bytes = artifact.len(), "writing artifact");
    fs::write(path, artifact).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}
