//! Terminal diagnostic rendering.
//!
//! Compilation is single-shot: the first error from any stage terminates
//! the run. Each stage surfaces a typed error that the driver converts into
//! a [`Diagnostic`] and renders on stderr as
//!
//! ```text
//! In file: <path>:<line>:
//! <subsystem>: <message>
//! ```

use std::fmt;

use crate::source_map::SourceMap;
use crate::span::Span;

/// Pipeline stage a diagnostic originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subsystem {
    Lexer,
    Parser,
    Semantic,
    Codegen,
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Subsystem::Lexer => "lexer",
            Subsystem::Parser => "parser",
            Subsystem::Semantic => "semantic",
            Subsystem::Codegen => "codegen",
        };
        f.write_str(name)
    }
}

/// A fatal diagnostic ready for rendering.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub subsystem: Subsystem,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(subsystem: Subsystem, message: impl Into<String>, span: Span) -> Self {
        Self {
            subsystem,
            message: message.into(),
            span,
        }
    }

    /// Renders the two-line diagnostic format against `sources`.
    pub fn render(&self, sources: &SourceMap) -> String {
        format!(
            "In file: {}:{}:\n{}: {}",
            sources.path(self.span.file).display(),
            self.span.line,
            self.subsystem,
            self.message
        )
    }

    /// Prints the diagnostic on stderr.
    pub fn emit(&self, sources: &SourceMap) {
        eprintln!("{}", self.render(sources));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::FileId;
    use std::path::PathBuf;

    #[test]
    fn test_subsystem_names() {
        assert_eq!(Subsystem::Lexer.to_string(), "lexer");
        assert_eq!(Subsystem::Parser.to_string(), "parser");
        assert_eq!(Subsystem::Semantic.to_string(), "semantic");
        assert_eq!(Subsystem::Codegen.to_string(), "codegen");
    }

    #[test]
    fn test_render_format() {
        let mut sources = SourceMap::new();
        let file = sources.add_file(PathBuf::from("main.bl"), String::new());
        let diag = Diagnostic::new(
            Subsystem::Semantic,
            "Variable 'x' does not exist",
            Span::new(3, 5, file),
        );
        assert_eq!(
            diag.render(&sources),
            "In file: main.bl:3:\nsemantic: Variable 'x' does not exist"
        );
    }

    #[test]
    fn test_render_unknown_file() {
        let sources = SourceMap::new();
        let diag = Diagnostic::new(Subsystem::Lexer, "boom", Span::new(1, 1, FileId(7)));
        assert!(diag.render(&sources).starts_with("In file: <unknown>:1:"));
    }
}
