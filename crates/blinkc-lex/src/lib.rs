//! blinkc-lex - Lexical analyzer for the Blink language.
//!
//! Transforms source text into a flat token stream. Besides the usual
//! scanning work (keywords, literals, longest-match operators, comment
//! skipping) the lexer owns the `$include <name>` preprocessor: when a
//! directive is reached, the named file (with the `.bl` extension appended,
//! resolved relative to the including file) is lexed depth-first and its
//! tokens are spliced into the stream in place of the directive. A
//! per-invocation set of canonical paths makes re-inclusion a no-op, which
//! defeats both cycles and transitive duplicates.
//!
//! Entry points: [`tokenize_file`] for on-disk sources (root file and
//! includes alike) and [`Lexer`] for text that is already in memory.

pub mod cursor;
pub mod error;
pub mod token;

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;

use blinkc_util::{FileId, SourceMap, Span};

pub use cursor::Cursor;
pub use error::LexError;
pub use token::{Token, TokenKind};

/// Canonical paths already expanded during this compiler invocation.
///
/// Threaded through the lexer rather than held in a global so that one
/// process can run independent compilations.
#[derive(Debug, Default)]
pub struct IncludeSet {
    paths: FxHashSet<PathBuf>,
}

impl IncludeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `path`; returns `false` if it was already present.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.paths.insert(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Lexes the file at `path`, expanding its includes transitively.
///
/// The file's canonical path is recorded in `includes` first; if it was
/// already recorded the file has been expanded before and an empty token
/// stream is returned, keeping inclusion idempotent. `origin` is the span
/// of the directive that requested the file (or [`Span::DUMMY`] for the
/// root source) and anchors file-open failures.
pub fn tokenize_file(
    path: &Path,
    sources: &mut SourceMap,
    includes: &mut IncludeSet,
    origin: Span,
) -> Result<Vec<Token>, LexError> {
    let canonical = path.canonicalize().map_err(|_| LexError::IncludeNotFound {
        path: path.display().to_string(),
        span: origin,
    })?;
    if !includes.insert(canonical) {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path).map_err(|_| LexError::IncludeNotFound {
        path: path.display().to_string(),
        span: origin,
    })?;
    let file = sources.add_file(path.to_path_buf(), content.clone());

    let mut lexer = Lexer::new(&content, file, path.to_path_buf());
    lexer.tokenize(sources, includes)
}

/// Lexer for one source file.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    file: FileId,
    /// Path of the file being lexed; includes resolve relative to its
    /// parent directory.
    path: PathBuf,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file: FileId, path: PathBuf) -> Self {
        Self {
            cursor: Cursor::new(source),
            file,
            path,
        }
    }

    /// Scans the whole input into a token vector, expanding includes.
    pub fn tokenize(
        &mut self,
        sources: &mut SourceMap,
        includes: &mut IncludeSet,
    ) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while !self.cursor.is_at_end() {
            let c = self.cursor.current_char();
            if c == ' ' || c == '\n' || c == '\t' || c == '\r' {
                self.cursor.advance();
            } else if c == '/' && self.cursor.peek(1) == '/' {
                self.skip_line_comment();
            } else if c == '/' && self.cursor.peek(1) == '*' {
                self.skip_block_comment()?;
            } else if c.is_ascii_digit() {
                tokens.push(self.lex_number()?);
            } else if c == '"' {
                tokens.push(self.lex_string()?);
            } else if c == '\'' {
                tokens.push(self.lex_char()?);
            } else if c.is_ascii_alphabetic() || c == '_' {
                tokens.push(self.lex_word());
            } else if c == '$' {
                self.lex_directive(&mut tokens, sources, includes)?;
            } else {
                tokens.push(self.lex_operator()?);
            }
        }

        Ok(tokens)
    }

    /// Span at the cursor's current position.
    fn span_here(&self) -> Span {
        Span::new(self.cursor.line(), self.cursor.column(), self.file)
    }

    fn skip_line_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let span = self.span_here();
        self.cursor.advance();
        self.cursor.advance();
        loop {
            if self.cursor.is_at_end() {
                return Err(LexError::UnexpectedEof { span });
            }
            if self.cursor.current_char() == '*' && self.cursor.peek(1) == '/' {
                self.cursor.advance();
                self.cursor.advance();
                return Ok(());
            }
            self.cursor.advance();
        }
    }

    /// Digits with at most one dot: `I32_LIT` or `F64_LIT`.
    fn lex_number(&mut self) -> Result<Token, LexError> {
        let span = self.span_here();
        let mut value = String::new();
        let mut has_dot = false;

        while self.cursor.current_char().is_ascii_digit() || self.cursor.current_char() == '.' {
            if self.cursor.current_char() == '.' {
                if has_dot {
                    return Err(LexError::InvalidNumber { span });
                }
                has_dot = true;
            }
            value.push(self.cursor.advance());
        }

        let kind = if has_dot {
            TokenKind::F64Lit
        } else {
            TokenKind::I32Lit
        };
        Ok(Token::new(kind, value, span))
    }

    /// Resolves one `\x` escape; the backslash is already consumed.
    fn lex_escape(&mut self) -> Result<char, LexError> {
        let span = self.span_here();
        let ch = self.cursor.advance();
        let resolved = match ch {
            'n' => '\n',
            't' => '\t',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'r' => '\r',
            'f' => '\u{0C}',
            'v' => '\u{0B}',
            _ => return Err(LexError::UnsupportedEscape { ch, span }),
        };
        Ok(resolved)
    }

    /// `"..."` with escapes resolved into the stored lexeme.
    fn lex_string(&mut self) -> Result<Token, LexError> {
        let span = self.span_here();
        self.cursor.advance();

        let mut value = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(LexError::UnterminatedString { span });
            }
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    break;
                }
                '\\' => {
                    self.cursor.advance();
                    value.push(self.lex_escape()?);
                }
                _ => value.push(self.cursor.advance()),
            }
        }

        Ok(Token::new(TokenKind::StringLit, value, span))
    }

    /// `'c'` char literal, lexed as `I8_LIT`.
    fn lex_char(&mut self) -> Result<Token, LexError> {
        let span = self.span_here();
        self.cursor.advance();

        if self.cursor.is_at_end() {
            return Err(LexError::UnterminatedChar { span });
        }
        let ch = if self.cursor.current_char() == '\\' {
            self.cursor.advance();
            self.lex_escape()?
        } else {
            self.cursor.advance()
        };
        if !self.cursor.eat('\'') {
            return Err(LexError::UnterminatedChar { span });
        }

        Ok(Token::new(TokenKind::I8Lit, ch.to_string(), span))
    }

    /// Identifier, keyword, or `true`/`false` boolean literal.
    fn lex_word(&mut self) -> Token {
        let span = self.span_here();
        let mut value = String::new();
        while self.cursor.current_char().is_ascii_alphanumeric()
            || self.cursor.current_char() == '_'
        {
            value.push(self.cursor.advance());
        }

        let kind = TokenKind::from_keyword(&value).unwrap_or(TokenKind::Id);
        Token::new(kind, value, span)
    }

    /// Operators and punctuation, preferring the longest match.
    fn lex_operator(&mut self) -> Result<Token, LexError> {
        let span = self.span_here();
        let c = self.cursor.advance();

        let (kind, value) = match c {
            '(' => (TokenKind::LParen, "("),
            ')' => (TokenKind::RParen, ")"),
            '[' => (TokenKind::LBracket, "["),
            ']' => (TokenKind::RBracket, "]"),
            '{' => (TokenKind::LBrace, "{"),
            '}' => (TokenKind::RBrace, "}"),
            ';' => (TokenKind::Semicolon, ";"),
            ':' => (TokenKind::Colon, ":"),
            ',' => (TokenKind::Comma, ","),
            '.' => (TokenKind::Dot, "."),
            '?' => (TokenKind::Question, "?"),
            '~' => (TokenKind::BNot, "~"),
            '^' => (TokenKind::BXor, "^"),
            '+' => {
                if self.cursor.eat('=') {
                    (TokenKind::PlusEq, "+=")
                } else {
                    (TokenKind::Plus, "+")
                }
            }
            '-' => {
                if self.cursor.eat('=') {
                    (TokenKind::MinusEq, "-=")
                } else {
                    (TokenKind::Minus, "-")
                }
            }
            '*' => {
                if self.cursor.eat('=') {
                    (TokenKind::MultEq, "*=")
                } else {
                    (TokenKind::Mult, "*")
                }
            }
            '/' => {
                if self.cursor.eat('=') {
                    (TokenKind::DivEq, "/=")
                } else {
                    (TokenKind::Div, "/")
                }
            }
            '%' => {
                if self.cursor.eat('=') {
                    (TokenKind::ModuloEq, "%=")
                } else {
                    (TokenKind::Modulo, "%")
                }
            }
            '=' => {
                if self.cursor.eat('=') {
                    (TokenKind::EqEq, "==")
                } else {
                    (TokenKind::Eq, "=")
                }
            }
            '!' => {
                if self.cursor.eat('=') {
                    (TokenKind::NotEq, "!=")
                } else {
                    (TokenKind::LNot, "!")
                }
            }
            '>' => {
                if self.cursor.eat('=') {
                    (TokenKind::GtEq, ">=")
                } else if self.cursor.eat('>') {
                    (TokenKind::RShift, ">>")
                } else {
                    (TokenKind::Gt, ">")
                }
            }
            '<' => {
                if self.cursor.eat('=') {
                    (TokenKind::LsEq, "<=")
                } else if self.cursor.eat('<') {
                    (TokenKind::LShift, "<<")
                } else {
                    (TokenKind::Ls, "<")
                }
            }
            '&' => {
                if self.cursor.eat('&') {
                    (TokenKind::LAnd, "&&")
                } else {
                    (TokenKind::BAnd, "&")
                }
            }
            '|' => {
                if self.cursor.eat('|') {
                    (TokenKind::LOr, "||")
                } else {
                    (TokenKind::BOr, "|")
                }
            }
            _ => return Err(LexError::UnsupportedOperator { ch: c, span }),
        };

        Ok(Token::new(kind, value, span))
    }

    /// `$include <name>` preprocessing. Other directives are fatal.
    fn lex_directive(
        &mut self,
        tokens: &mut Vec<Token>,
        sources: &mut SourceMap,
        includes: &mut IncludeSet,
    ) -> Result<(), LexError> {
        let span = self.span_here();
        self.cursor.advance();

        self.skip_inline_whitespace();
        let mut name = String::new();
        while self.cursor.current_char().is_ascii_alphanumeric()
            || self.cursor.current_char() == '_'
        {
            name.push(self.cursor.advance());
        }
        if name != "include" {
            return Err(LexError::UnsupportedDirective { name, span });
        }

        self.skip_inline_whitespace();
        if !self.cursor.eat('<') {
            return Err(LexError::MalformedInclude { span });
        }
        let mut target = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(LexError::MalformedInclude { span });
            }
            if self.cursor.eat('>') {
                break;
            }
            target.push(self.cursor.advance());
        }
        if target.is_empty() {
            return Err(LexError::MalformedInclude { span });
        }

        let resolved = self
            .path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!("{}.bl", target));
        tokens.extend(tokenize_file(&resolved, sources, includes, span)?);
        Ok(())
    }

    fn skip_inline_whitespace(&mut self) {
        while self.cursor.current_char() == ' ' || self.cursor.current_char() == '\t' {
            self.cursor.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        let mut sources = SourceMap::new();
        let file = sources.add_file(PathBuf::from("test.bl"), source.to_string());
        let mut includes = IncludeSet::new();
        Lexer::new(source, file, PathBuf::from("test.bl"))
            .tokenize(&mut sources, &mut includes)
            .expect("lexing failed")
    }

    fn lex_err(source: &str) -> LexError {
        let mut sources = SourceMap::new();
        let file = sources.add_file(PathBuf::from("test.bl"), source.to_string());
        let mut includes = IncludeSet::new();
        Lexer::new(source, file, PathBuf::from("test.bl"))
            .tokenize(&mut sources, &mut includes)
            .expect_err("lexing should fail")
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_var_decl_tokens() {
        let tokens = lex("var x: i32 = 42;");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Var,
                TokenKind::Id,
                TokenKind::Colon,
                TokenKind::I32,
                TokenKind::Eq,
                TokenKind::I32Lit,
                TokenKind::Semicolon,
            ]
        );
        assert_eq!(tokens[1].value, "x");
        assert_eq!(tokens[5].value, "42");
    }

    #[test]
    fn test_positions() {
        let tokens = lex("var x;\n  y");
        assert_eq!((tokens[0].span.line, tokens[0].span.column), (1, 1));
        assert_eq!((tokens[1].span.line, tokens[1].span.column), (1, 5));
        assert_eq!((tokens[3].span.line, tokens[3].span.column), (2, 3));
    }

    #[test]
    fn test_longest_match_operators() {
        let tokens = lex("== = >= >> > && & || | += <<");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::EqEq,
                TokenKind::Eq,
                TokenKind::GtEq,
                TokenKind::RShift,
                TokenKind::Gt,
                TokenKind::LAnd,
                TokenKind::BAnd,
                TokenKind::LOr,
                TokenKind::BOr,
                TokenKind::PlusEq,
                TokenKind::LShift,
            ]
        );
    }

    #[test]
    fn test_float_and_int_literals() {
        let tokens = lex("1 2.5 300");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::I32Lit, TokenKind::F64Lit, TokenKind::I32Lit]
        );
        assert_eq!(tokens[1].value, "2.5");
    }

    #[test]
    fn test_two_dots_is_fatal() {
        assert!(matches!(
            lex_err("1.2.3"),
            LexError::InvalidNumber { span } if span.line == 1
        ));
    }

    #[test]
    fn test_bool_literals_and_identifiers() {
        let tokens = lex("true false truthy");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::BoolLit, TokenKind::BoolLit, TokenKind::Id]
        );
        assert_eq!(tokens[0].value, "true");
        assert_eq!(tokens[2].value, "truthy");
    }

    #[test]
    fn test_string_escapes_resolved() {
        let tokens = lex(r#""a\n\t\"b\\""#);
        assert_eq!(tokens[0].kind, TokenKind::StringLit);
        assert_eq!(tokens[0].value, "a\n\t\"b\\");
    }

    #[test]
    fn test_char_literal() {
        let tokens = lex(r"'x' '\n'");
        assert_eq!(kinds(&tokens), vec![TokenKind::I8Lit, TokenKind::I8Lit]);
        assert_eq!(tokens[0].value, "x");
        assert_eq!(tokens[1].value, "\n");
    }

    #[test]
    fn test_unsupported_escape_is_fatal() {
        assert!(matches!(
            lex_err(r#""\q""#),
            LexError::UnsupportedEscape { ch: 'q', .. }
        ));
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = lex("var // trailing\n/* block\nspanning */ x");
        assert_eq!(kinds(&tokens), vec![TokenKind::Var, TokenKind::Id]);
        // the block comment's newline still advances the line counter
        assert_eq!(tokens[1].span.line, 3);
    }

    #[test]
    fn test_unterminated_block_comment() {
        assert!(matches!(lex_err("/* open"), LexError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_unsupported_operator() {
        assert!(matches!(
            lex_err("var @"),
            LexError::UnsupportedOperator { ch: '@', .. }
        ));
    }

    #[test]
    fn test_unknown_directive_is_fatal() {
        assert!(matches!(
            lex_err("$define <x>"),
            LexError::UnsupportedDirective { name, .. } if name == "define"
        ));
    }

    #[test]
    fn test_malformed_include() {
        assert!(matches!(
            lex_err("$include lib"),
            LexError::MalformedInclude { .. }
        ));
    }

    mod include_tests {
        use super::*;
        use std::fs;

        fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
            let path = dir.join(name);
            fs::write(&path, content).expect("writing fixture");
            path
        }

        fn tokenize_root(root: &Path) -> (Vec<Token>, SourceMap) {
            let mut sources = SourceMap::new();
            let mut includes = IncludeSet::new();
            let tokens = tokenize_file(root, &mut sources, &mut includes, Span::DUMMY)
                .expect("tokenizing fixture");
            (tokens, sources)
        }

        #[test]
        fn test_include_splices_tokens_in_place() {
            let dir = tempfile::tempdir().expect("tempdir");
            write(dir.path(), "lib.bl", "const K: i32 = 1;");
            let root = write(dir.path(), "main.bl", "$include <lib>\nvar x: i32;");

            let (tokens, _) = tokenize_root(&root);
            // lib tokens come first, in place of the directive
            assert_eq!(tokens[0].kind, TokenKind::Const);
            assert_eq!(tokens[1].value, "K");
            assert_eq!(tokens[7].kind, TokenKind::Var);
        }

        #[test]
        fn test_included_tokens_keep_their_file() {
            let dir = tempfile::tempdir().expect("tempdir");
            write(dir.path(), "lib.bl", "const K: i32 = 1;");
            let root = write(dir.path(), "main.bl", "$include <lib>\nvar x: i32;");

            let (tokens, sources) = tokenize_root(&root);
            let lib_file = tokens[0].span.file;
            let main_file = tokens[7].span.file;
            assert_ne!(lib_file, main_file);
            assert!(sources.path(lib_file).ends_with("lib.bl"));
            assert!(sources.path(main_file).ends_with("main.bl"));
        }

        #[test]
        fn test_duplicate_include_expands_once() {
            let dir = tempfile::tempdir().expect("tempdir");
            write(dir.path(), "lib.bl", "const K: i32 = 1;");
            let root = write(dir.path(), "main.bl", "$include <lib>\n$include <lib>");

            let (tokens, _) = tokenize_root(&root);
            let k_count = tokens.iter().filter(|t| t.value == "K").count();
            assert_eq!(k_count, 1);
        }

        #[test]
        fn test_cyclic_include_terminates() {
            let dir = tempfile::tempdir().expect("tempdir");
            write(dir.path(), "a.bl", "$include <b>");
            write(dir.path(), "b.bl", "$include <a>\nconst K: i32 = 1;");
            let root = dir.path().join("a.bl");

            let (tokens, _) = tokenize_root(&root);
            let k_count = tokens.iter().filter(|t| t.value == "K").count();
            assert_eq!(k_count, 1);
        }

        #[test]
        fn test_missing_include_is_fatal() {
            let dir = tempfile::tempdir().expect("tempdir");
            let root = write(dir.path(), "main.bl", "$include <ghost>");

            let mut sources = SourceMap::new();
            let mut includes = IncludeSet::new();
            let err = tokenize_file(&root, &mut sources, &mut includes, Span::DUMMY)
                .expect_err("include should be missing");
            assert!(matches!(err, LexError::IncludeNotFound { .. }));
        }
    }
}
