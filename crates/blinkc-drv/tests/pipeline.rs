//! Library-level pipeline tests: source text in, IR (or a diagnostic) out.

use std::fs;
use std::path::{Path, PathBuf};

use blinkc_drv::{compile_to_ir, CompileFailure};
use blinkc_util::Subsystem;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("writing fixture");
    path
}

fn compile_source(source: &str) -> Result<String, CompileFailure> {
    let dir = TempDir::new().expect("tempdir");
    let path = write(dir.path(), "main.bl", source);
    compile_to_ir(&path)
}

fn ir_of(source: &str) -> String {
    compile_source(source).expect("compilation should succeed")
}

fn diagnostic_of(source: &str) -> (Subsystem, String) {
    match compile_source(source).expect_err("compilation should fail") {
        CompileFailure::Diagnostic { diagnostic, .. } => (diagnostic.subsystem, diagnostic.message),
        CompileFailure::Setup(err) => panic!("expected a diagnostic, got setup error: {err}"),
    }
}

#[test]
fn test_minimal_program() {
    let ir = ir_of("func main(): i32 { return 0; }");
    assert!(ir.contains("declare i32 @printf(i8*, ...)"), "ir:\n{ir}");
    assert!(ir.contains("define i32 @main()"), "ir:\n{ir}");
    assert!(ir.contains("ret i32 0"), "ir:\n{ir}");
}

#[test]
fn test_scoped_shadow() {
    let ir = ir_of("var x: i32 = 1;\nfunc main(): i32 {\n  var x: i32 = 2;\n  return x;\n}");
    assert!(ir.contains("@x = global i32 1"), "ir:\n{ir}");
    assert!(ir.contains("%x = alloca i32"), "ir:\n{ir}");
    assert!(ir.contains("%x.load = load i32, i32* %x"), "ir:\n{ir}");
}

#[test]
fn test_type_promotion() {
    let ir = ir_of("func main(): f64 {\n  var a: i32 = 3;\n  var b: f64 = 1.5;\n  return a + b;\n}");
    assert!(ir.contains("define double @main()"), "ir:\n{ir}");
    assert!(ir.contains("sitofp i32"), "ir:\n{ir}");
    assert!(ir.contains("fadd double"), "ir:\n{ir}");
}

#[test]
fn test_compound_assignment_matches_plain_form() {
    let compound = ir_of("func main(): i32 {\n  var x: i32 = 1;\n  x += 1;\n  return x;\n}");
    let plain = ir_of("func main(): i32 {\n  var x: i32 = 1;\n  x = x + 1;\n  return x;\n}");
    assert_eq!(compound, plain);
}

#[test]
fn test_cyclic_include_terminates_and_declares_once() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "a.bl", "$include <b>\nfunc main(): i32 { return K; }");
    write(dir.path(), "b.bl", "$include <a>\nconst K: i32 = 1;");

    let ir = compile_to_ir(&dir.path().join("a.bl")).expect("cyclic include should compile");
    assert_eq!(ir.matches("@K = constant i32 1").count(), 1, "ir:\n{ir}");
}

#[test]
fn test_include_through_two_paths_expands_once() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "shared.bl", "const K: i32 = 1;");
    write(dir.path(), "a.bl", "$include <shared>");
    write(dir.path(), "b.bl", "$include <shared>");
    write(
        dir.path(),
        "main.bl",
        "$include <a>\n$include <b>\nfunc main(): i32 { return K; }",
    );

    let ir = compile_to_ir(&dir.path().join("main.bl")).expect("diamond include should compile");
    assert_eq!(ir.matches("@K = constant i32 1").count(), 1, "ir:\n{ir}");
}

#[test]
fn test_lexer_diagnostic() {
    let (subsystem, message) = diagnostic_of("var x: i32 = 1.2.3;");
    assert_eq!(subsystem, Subsystem::Lexer);
    assert_eq!(message, "Invalid number literal (twice dot)");
}

#[test]
fn test_parser_diagnostic() {
    let (subsystem, message) = diagnostic_of("class Point {}");
    assert_eq!(subsystem, Subsystem::Parser);
    assert_eq!(message, "Unsupported token 'class'");
}

#[test]
fn test_semantic_diagnostic() {
    let (subsystem, message) = diagnostic_of("func main(): i32 { break; return 0; }");
    assert_eq!(subsystem, Subsystem::Semantic);
    assert_eq!(message, "`break` statement must be must be inside the loop");
}

#[test]
fn test_codegen_diagnostic() {
    let (subsystem, message) = diagnostic_of("var a: i32 = 1;\nvar b: i32 = a + 1;");
    assert_eq!(subsystem, Subsystem::Codegen);
    assert_eq!(
        message,
        "Global variable 'b' initializer must be a constant expression"
    );
}

#[test]
fn test_missing_root_file_is_setup_failure() {
    let err = compile_to_ir(Path::new("/nonexistent/ghost.bl")).expect_err("should fail");
    match err {
        CompileFailure::Setup(err) => assert_eq!(err.to_string(), "Error opening file!"),
        CompileFailure::Diagnostic { .. } => panic!("expected a setup failure"),
    }
}

#[test]
fn test_diagnostic_names_the_included_file() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "lib.bl", "func broken(): i32 { return y; }");
    write(
        dir.path(),
        "main.bl",
        "$include <lib>\nfunc main(): i32 { return 0; }",
    );

    let failure = compile_to_ir(&dir.path().join("main.bl")).expect_err("should fail");
    let CompileFailure::Diagnostic {
        diagnostic,
        sources,
    } = failure
    else {
        panic!("expected a diagnostic");
    };
    let rendered = diagnostic.render(&sources);
    assert!(rendered.contains("lib.bl:1:"), "rendered:\n{rendered}");
    assert!(
        rendered.contains("semantic: Variable 'y' does not exist"),
        "rendered:\n{rendered}"
    );
}
