//! CLACC: a source-to-source compiler translating a small, statically
//! restricted Python-like surface syntax into CLAC, a concatenative
//! stack-oriented target language.
//!
//! Source parsing is out of scope (§1): the external boundary is a JSON
//! document shaped like [`ast::Module`], produced by a collaborator parser.
//! This crate turns that AST into CLAC text via [`compile_source`] /
//! [`compile_ast`].

pub mod assembler;
pub mod ast;
pub mod builtins;
pub mod compile;
pub mod error;
pub mod ir;
pub mod module_driver;
pub mod opcode;
pub mod span;
pub mod value;

pub use error::{CompileError, CompileResult};

/// Parse a JSON-encoded AST (§11) into [`ast::Module`].
pub fn parse_ast(json: &str) -> Result<ast::Module, serde_json::Error> {
    serde_json::from_str(json)
}

/// Compile an already-parsed module straight to CLAC text.
pub fn compile_ast(module: &ast::Module) -> CompileResult<String> {
    let (functions, registry) = module_driver::compile_module(module)?;
    Ok(assembler::assemble(&functions, &registry))
}

/// Parse and compile a JSON AST document in one step.
pub fn compile_source(json: &str) -> CompileResult<String> {
    let module = parse_ast(json).map_err(|e| {
        CompileError::unsupported_node(format!("invalid AST document: {e}"), span::Span::synthetic())
    })?;
    compile_ast(&module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s2_add_two_integers_emits_expected_tokens() {
        let json = r#"
        {
          "body": [
            {
              "kind": "FunctionDef",
              "name": "add",
              "args": [
                {"name": "a", "annotation": "Int"},
                {"name": "b", "annotation": "Int"}
              ],
              "returns": "Int",
              "body": [
                {
                  "kind": "Return",
                  "value": {
                    "kind": "BinOp",
                    "left": {"kind": "Name", "id": "a", "ctx": "Load"},
                    "op": "Add",
                    "right": {"kind": "Name", "id": "b", "ctx": "Load"}
                  }
                }
              ]
            }
          ]
        }
        "#;
        let output = compile_source(json).unwrap();
        assert!(output.contains(": add"));
        assert!(output.contains("pick"));
        assert!(output.contains('+'));
        assert!(output.contains("swap drop"));
    }

    #[test]
    fn s5_branch_arity_mismatch_is_rejected() {
        let json = r#"
        {
          "body": [
            {
              "kind": "FunctionDef",
              "name": "bad",
              "args": [{"name": "x", "annotation": "Int"}],
              "returns": "Int",
              "body": [
                {
                  "kind": "If",
                  "test": {
                    "kind": "Compare",
                    "left": {"kind": "Name", "id": "x", "ctx": "Load"},
                    "ops": ["Lt"],
                    "comparators": [{"kind": "Constant", "value": 1}]
                  },
                  "body": [
                    {"kind": "Return", "value": {"kind": "Name", "id": "x", "ctx": "Load"}}
                  ],
                  "orelse": [
                    {"kind": "Return", "value": null}
                  ]
                }
              ]
            }
          ]
        }
        "#;
        let err = compile_source(json).unwrap_err();
        assert!(matches!(err, CompileError::ArityError { .. }));
    }

    #[test]
    fn s6_missing_annotation_is_rejected() {
        let json = r#"
        {
          "body": [
            {
              "kind": "FunctionDef",
              "name": "f",
              "args": [{"name": "a"}, {"name": "b"}],
              "returns": "Int",
              "body": [
                {
                  "kind": "Return",
                  "value": {
                    "kind": "BinOp",
                    "left": {"kind": "Name", "id": "a", "ctx": "Load"},
                    "op": "Add",
                    "right": {"kind": "Name", "id": "b", "ctx": "Load"}
                  }
                }
              ]
            }
          ]
        }
        "#;
        let err = compile_source(json).unwrap_err();
        assert!(matches!(err, CompileError::AnnotationError { .. }));
    }
}
