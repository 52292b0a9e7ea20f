//! The TOPOS-Xi CLI.
//!
//! Provides the `toposc` command with two subcommands:
//!
//! - `toposc check <file>` - lex, parse, load the standard library, and
//!   semantically check a `.topology` source file
//! - `toposc run <file>` - check and then execute the program
//!
//! The standard library directory defaults to a `stdlib` directory next
//! to the source file when present; `--stdlib` overrides it. The
//! measurement random source is seedable with `--seed` so runs can be
//! reproduced.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use topos_common::span::LineIndex;
use topos_interp::Interpreter;
use topos_lexer::Lexer;
use topos_parser::ast::SpaceDef;
use topos_stdlib::StdLibLoader;

#[derive(Parser)]
#[command(name = "toposc", version, about = "The TOPOS-Xi toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lex, parse, and semantically check a source file
    Check {
        /// Path to the .topology source file
        file: PathBuf,

        /// Standard library directory (default: `stdlib` beside the file)
        #[arg(long)]
        stdlib: Option<PathBuf>,

        /// Dump a pipeline artifact as JSON instead of diagnostics
        #[arg(long, value_enum)]
        emit: Option<Emit>,
    },
    /// Check a source file and execute it
    Run {
        /// Path to the .topology source file
        file: PathBuf,

        /// Standard library directory (default: `stdlib` beside the file)
        #[arg(long)]
        stdlib: Option<PathBuf>,

        /// Seed for the measurement random source
        #[arg(long)]
        seed: Option<u64>,

        /// Entry mapping to invoke after initialization
        #[arg(long, default_value = "main")]
        entry: String,

        /// Recursion depth limit
        #[arg(long, default_value_t = 10)]
        max_depth: usize,
    },
}

/// Pipeline artifacts `check --emit` can dump.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    Tokens,
    Ast,
}

/// Execution options carried by the `run` verb.
struct RunOptions {
    seed: Option<u64>,
    entry: String,
    max_depth: usize,
}

fn main() {
    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Check { file, stdlib, emit } => {
            pipeline(&file, stdlib.as_deref(), emit, None)
        }
        Commands::Run {
            file,
            stdlib,
            seed,
            entry,
            max_depth,
        } => pipeline(
            &file,
            stdlib.as_deref(),
            None,
            Some(RunOptions {
                seed,
                entry,
                max_depth,
            }),
        ),
    };
    process::exit(code);
}

/// Drive the pipeline: lex, parse, load stdlib, check, and (for `run`)
/// interpret. Returns the process exit code.
fn pipeline(
    file: &Path,
    stdlib: Option<&Path>,
    emit: Option<Emit>,
    run: Option<RunOptions>,
) -> i32 {
    let source = match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", file.display());
            return 1;
        }
    };
    let index = LineIndex::new(&source);

    if emit.is_none() {
        println!("--- Processing {} ---", file.display());
    }

    // 1. Lexing
    let tokens = match Lexer::tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            let (line, column) = index.line_col(e.span.start);
            println!("Syntax Error during Lexing: {e} at line {line}, column {column}");
            return 1;
        }
    };
    if emit == Some(Emit::Tokens) {
        return emit_json(&tokens);
    }

    // 2. Parsing
    let program: Vec<SpaceDef> = match topos_parser::parse(tokens, &source) {
        Ok(program) => program,
        Err(e) => {
            let (line, column) = index.line_col(e.span.start);
            println!("Syntax Error during Parsing: {e} at line {line}, column {column}");
            return 1;
        }
    };
    if emit == Some(Emit::Ast) {
        return emit_json(&program);
    }

    // 3. Standard library
    let stdlib_dir = resolve_stdlib_dir(file, stdlib);
    let definitions = match StdLibLoader::new(&stdlib_dir).load() {
        Ok(definitions) => definitions,
        Err(e) => {
            println!("[FAILURE] StdLib Error: {e}");
            return 1;
        }
    };

    // 4. Semantic analysis
    let analysis = match topos_typeck::check(&program, definitions) {
        Ok(analysis) => analysis,
        Err(e) => {
            eprint!(
                "{}",
                topos_typeck::diagnostics::render_diagnostic(&e, &source)
            );
            println!("\n[FAILURE] {}: {e}", e.kind_label());
            return 1;
        }
    };
    for warning in &analysis.warnings {
        println!("[WARNING] {warning}");
    }
    println!("\n[SUCCESS] Semantic Analysis Complete.");

    // 5. Execution
    let Some(options) = run else {
        return 0;
    };
    let mut interpreter = match options.seed {
        Some(seed) => Interpreter::with_seed(analysis.symbols, seed),
        None => Interpreter::new(analysis.symbols),
    }
    .with_max_depth(options.max_depth);
    match interpreter.run(&program, &options.entry) {
        Ok(_) => 0,
        Err(e) => {
            println!("\n[FAILURE] Runtime Error: {e}");
            1
        }
    }
}

/// The stdlib directory: an explicit `--stdlib`, or `stdlib` beside the
/// source file (which may not exist; the loader treats a missing
/// directory as empty).
fn resolve_stdlib_dir(file: &Path, stdlib: Option<&Path>) -> PathBuf {
    match stdlib {
        Some(dir) => dir.to_path_buf(),
        None => file
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("stdlib"),
    }
}

fn emit_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(e) => {
            eprintln!("error: failed to serialize: {e}");
            1
        }
    }
}
