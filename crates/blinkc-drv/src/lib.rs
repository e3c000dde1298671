//! blinkc-drv - Compiler driver.
//!
//! Orchestrates the four-stage pipeline for one invocation of `cc`:
//!
//! ```text
//! source file ──lex (with include expansion)──▶ tokens
//!        tokens ──parse──▶ statements
//!    statements ──semantic analysis──▶ validated statements
//!    statements ──codegen──▶ LLVM module ──▶ textual IR on stdout
//! ```
//!
//! The pipeline is single-shot: the first error from any stage is rendered
//! as a diagnostic on stderr and the process exits with code 1.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use inkwell::context::Context;

use blinkc_gen::CodeGenerator;
use blinkc_lex::{tokenize_file, IncludeSet};
use blinkc_par::Parser;
use blinkc_sem::SemanticAnalyzer;
use blinkc_util::{Diagnostic, SourceMap, Span};

/// Name the produced module carries.
const MODULE_NAME: &str = "cc";

/// Configuration for one compiler invocation.
#[derive(Clone, Debug)]
pub struct Config {
    /// Root source file.
    pub input: PathBuf,
}

impl Config {
    /// Builds a config from the argument list (without the program name).
    /// Exactly one argument is accepted.
    pub fn from_args<I>(args: I) -> Option<Config>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let input = args.next()?;
        if args.next().is_some() {
            return None;
        }
        Some(Config {
            input: PathBuf::from(input),
        })
    }
}

/// Why a compilation did not produce a module.
#[derive(Debug)]
pub enum CompileFailure {
    /// Failure before the pipeline started (unreadable root file).
    Setup(anyhow::Error),
    /// A stage diagnostic plus the sources needed to render it.
    Diagnostic {
        diagnostic: Diagnostic,
        sources: SourceMap,
    },
}

/// Runs the whole pipeline and returns the module's textual IR.
pub fn compile_to_ir(path: &Path) -> Result<String, CompileFailure> {
    let mut sources = SourceMap::new();
    let mut includes = IncludeSet::new();

    if let Err(err) = check_readable(path) {
        return Err(CompileFailure::Setup(err));
    }

    let tokens = match tokenize_file(path, &mut sources, &mut includes, Span::DUMMY) {
        Ok(tokens) => tokens,
        Err(err) => {
            return Err(CompileFailure::Diagnostic {
                diagnostic: err.to_diagnostic(),
                sources,
            })
        }
    };

    let stmts = match Parser::new(tokens).parse() {
        Ok(stmts) => stmts,
        Err(err) => {
            return Err(CompileFailure::Diagnostic {
                diagnostic: err.to_diagnostic(),
                sources,
            })
        }
    };

    if let Err(err) = SemanticAnalyzer::new().analyze(&stmts) {
        return Err(CompileFailure::Diagnostic {
            diagnostic: err.to_diagnostic(),
            sources,
        });
    }

    let context = Context::create();
    let mut generator = CodeGenerator::new(&context, MODULE_NAME);
    if let Err(err) = generator.generate(&stmts) {
        return Err(CompileFailure::Diagnostic {
            diagnostic: err.to_diagnostic(),
            sources,
        });
    }

    let module = generator.finish();
    Ok(module.print_to_string().to_string())
}

/// Compiles the configured input, prints IR on stdout or a diagnostic on
/// stderr, and returns the process exit code.
pub fn run(config: &Config) -> i32 {
    match compile_to_ir(&config.input) {
        Ok(ir) => {
            println!("{ir}");
            0
        }
        Err(CompileFailure::Setup(err)) => {
            eprintln!("{err}");
            1
        }
        Err(CompileFailure::Diagnostic {
            diagnostic,
            sources,
        }) => {
            diagnostic.emit(&sources);
            1
        }
    }
}

fn check_readable(path: &Path) -> anyhow::Result<()> {
    let metadata = std::fs::metadata(path).context("Error opening file!")?;
    anyhow::ensure!(metadata.is_file(), "Error opening file!");
    Ok(())
}
