use anyhow::Result;
use apbl::{Emit, Error};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Lexical and syntax analysis of APBL booking programs.
#[derive(Parser, Debug)]
#[command(author, version, long_about = None)]
struct Args {
    /// Path to the source file
    path: PathBuf,

    /// Artifact to print once both passes succeed
    #[arg(short, long, value_enum, default_value_t = Emit::None)]
    emit: Emit,

    /// Write the artifact to this file instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Log the progress of each pass to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging, RUST_LOG takes precedence over --verbose
    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let compilation = match apbl::compile_file(&args.path) {
        Ok(compilation) => compilation,
        Err(Error::Analysis(error)) => {
            eprint!("{}", apbl::report(&error));
            eprintln!("Compilation failed");
            return Ok(ExitCode::FAILURE);
        }
        Err(error) => return Err(error.into()),
    };

    if let Some(artifact) = apbl::render(&compilation, args.emit)? {
        match &args.out {
            Some(out) => apbl::write_artifact(out, &artifact)?,
            None => print!("{}", artifact),
        }
    }
    eprintln!("Compilation succeeded");
    Ok(ExitCode::SUCCESS)
}
