use std::path::PathBuf;

use astgen_codegen::{generate_artifacts, write_artifacts, GenerateConfig, OutputTargets};
use astgen_schema::{parse_schema_content, parse_schema_file, Schema};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn fixture_schema() -> Schema {
    parse_schema_file(fixture_path("grammar.json")).expect("should parse grammar.json")
}

#[test]
fn test_fixture_grammar_generates_all_artifacts() {
    let schema = fixture_schema();
    let artifacts = generate_artifacts(&schema, &GenerateConfig::all()).unwrap();

    assert!(artifacts.ast.starts_with("// @generated"));
    assert!(artifacts.visitor.contains("pub trait Visitor"));
    assert!(artifacts.visitor_mut.contains("pub trait VisitorMut"));
}

#[test]
fn test_program_scenario() {
    // A minimal schema: the identity alias plus one product entry.
    let schema = parse_schema_content(
        r#"{
            "Identity": "IdentityType",
            "Program": {
                "statements": "Vec<Statement>",
                "children": ["statements"]
            }
        }"#,
    )
    .unwrap();
    let artifacts = generate_artifacts(&schema, &GenerateConfig::all()).unwrap();

    assert!(artifacts.ast.contains("pub struct Program"));
    assert!(artifacts.ast.contains("pub id: NodeId"));
    assert!(artifacts.ast.contains("pub statements: Vec<Statement>"));
    assert!(artifacts.ast.contains("Program(&'a Program)"));
    assert!(artifacts.ast.contains("for item in self.statements.iter()"));
    // Product without an explicit span: absence of the accessor is
    // expected, not an error.
    assert!(!artifacts.ast.contains("pub fn span"));
}

#[test]
fn test_expression_scenario() {
    let schema = parse_schema_content(
        r#"{
            "Expression": {
                "as": "Enum",
                "Literal": "Span",
                "Binary": {
                    "lhs": "Box<Expression>",
                    "op": "Token",
                    "rhs": "Box<Expression>"
                },
                "children": "self"
            }
        }"#,
    )
    .unwrap();
    let artifacts = generate_artifacts(&schema, &GenerateConfig::all()).unwrap();
    let ast = &artifacts.ast;

    // Binary yields dereferenced lhs then rhs; Literal yields nothing.
    let lhs = ast.find("children.push(Node::from(lhs.as_ref()))").unwrap();
    let rhs = ast.find("children.push(Node::from(rhs.as_ref()))").unwrap();
    assert!(lhs < rhs);
    assert!(!ast.contains("Node::from(op"), "tokens are not children");
    assert!(!ast.contains("Self::Literal(node)"));
}

#[test]
fn test_fixture_children_keep_declared_order() {
    let schema = fixture_schema();
    let artifacts = generate_artifacts(&schema, &GenerateConfig::all()).unwrap();
    let ast = &artifacts.ast;

    let parameters = ast.find("for item in self.parameters.iter()").unwrap();
    let return_type = ast
        .find("if let Some(item) = self.return_type.as_ref()")
        .unwrap();
    let body = ast.find("for item in self.body.iter()").unwrap();
    assert!(parameters < return_type && return_type < body);
}

#[test]
fn test_fixture_wrapper_membership() {
    let schema = fixture_schema();
    let artifacts = generate_artifacts(&schema, &GenerateConfig::all()).unwrap();
    let ast = &artifacts.ast;

    for case in [
        "Program(&'a Program)",
        "Statement(&'a Statement)",
        "StatementKind(&'a StatementKind)",
        "ExpressionKind(&'a ExpressionKind)",
        "Function(&'a Function)",
    ] {
        assert!(ast.contains(case), "missing wrapper case {case}");
    }
    assert!(!ast.contains("NodeId(&'a NodeId)"));
    assert!(!ast.contains("Comment(&'a Comment)"));
    assert!(!ast.contains("Block(&'a Block)"));
}

#[test]
fn test_fixture_visitor_entry_points() {
    let schema = fixture_schema();
    let artifacts = generate_artifacts(&schema, &GenerateConfig::all()).unwrap();

    let visitor = &artifacts.visitor;
    assert!(visitor.contains("fn visit_statement(&mut self, node: &Statement)"));
    assert!(visitor.contains("self.visit_statement_kind(&node.kind);"));
    assert!(visitor.contains("fn visit_expression_kind(&mut self, node: &ExpressionKind)"));
    assert!(visitor.contains("walk_expression_kind(self, node);"));

    let visitor_mut = &artifacts.visitor_mut;
    assert!(visitor_mut.contains("fn visit_program(&mut self, node: &mut Program)"));
    assert!(visitor_mut.contains("walk_program_mut(self, node);"));
}

#[test]
fn test_generation_is_idempotent() {
    let schema = fixture_schema();
    let config = GenerateConfig::all();

    let first = generate_artifacts(&schema, &config).unwrap();
    let second = generate_artifacts(&schema, &config).unwrap();
    assert_eq!(first, second, "artifacts must be byte-identical across runs");

    // Reloading the document must not change the output either.
    let reloaded = fixture_schema();
    let third = generate_artifacts(&reloaded, &config).unwrap();
    assert_eq!(first, third);
}

#[test]
fn test_disabled_visitors_produce_empty_artifacts() {
    let schema = fixture_schema();
    let config = GenerateConfig {
        visitors: false,
        ..GenerateConfig::all()
    };

    let artifacts = generate_artifacts(&schema, &config).unwrap();
    assert!(artifacts.visitor.is_empty());
    assert!(artifacts.visitor_mut.is_empty());
    assert!(!artifacts.ast.is_empty());
}

#[test]
fn test_write_artifacts_overwrites_targets() {
    let schema = fixture_schema();
    let artifacts = generate_artifacts(&schema, &GenerateConfig::all()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let targets = OutputTargets {
        ast: dir.path().join("generated/ast.rs"),
        visitor: dir.path().join("generated/visitor.rs"),
        visitor_mut: dir.path().join("generated/visitor_mut.rs"),
    };

    // Pre-existing content is overwritten unconditionally.
    std::fs::create_dir_all(dir.path().join("generated")).unwrap();
    std::fs::write(&targets.ast, "stale").unwrap();

    write_artifacts(&artifacts, &targets).unwrap();

    assert_eq!(std::fs::read_to_string(&targets.ast).unwrap(), artifacts.ast);
    assert_eq!(
        std::fs::read_to_string(&targets.visitor).unwrap(),
        artifacts.visitor
    );
    assert_eq!(
        std::fs::read_to_string(&targets.visitor_mut).unwrap(),
        artifacts.visitor_mut
    );
}

#[test]
fn test_custom_import_paths_are_honored() {
    let schema = fixture_schema();
    let config = GenerateConfig {
        shared_import: "crate::syntax::primitives".to_string(),
        ast_import: "crate::syntax::ast".to_string(),
        walk_import: "crate::syntax::walk".to_string(),
        ..GenerateConfig::all()
    };

    let artifacts = generate_artifacts(&schema, &config).unwrap();
    assert!(artifacts.ast.contains("use crate::syntax::primitives::"));
    assert!(artifacts.visitor.contains("use crate::syntax::ast::*;"));
    assert!(artifacts.visitor.contains("use crate::syntax::walk::*;"));
}
