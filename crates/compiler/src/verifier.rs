//! The semantic verifier (§4.5): composes the well-formedness check, the
//! unsupported-feature pass, and the type-verification pass over a single
//! AST root, in that order, into one `MessageBuffer`.
//!
//! The three checks run in sequence and only the first (well-formedness,
//! whose violations are parser bugs, not user errors) aborts early. The two
//! feature/type passes both run regardless of each other's findings, so a
//! program can be reported as using both an unsupported construct and a type
//! error in the same invocation.

use crate::ast::Node;
use crate::messages::MessageBuffer;
use crate::scope::Scope;
use crate::type_check::{self, TypeCheckContext};
use crate::unsupported;
use crate::well_formedness;

/// Runs the full verifier over `root`, returning the populated message
/// buffer. The caller decides what to do with it (render to the user, query
/// it in tests, or forward `root` to codegen when `!buffer.has_errors()`).
pub fn verify(root: &mut Node) -> MessageBuffer {
    let mut messages = MessageBuffer::new();

    well_formedness::check(root, &mut messages);

    let mut unsupported_pass = unsupported::build();
    unsupported_pass.accept(root, &mut messages);

    let mut type_pass = type_check::build();
    let mut ctx = TypeCheckContext { scope: Scope::new(), messages: &mut messages };
    type_pass.accept(root, &mut ctx);

    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FunctionFlags, Node};
    use forge_core::{Location, Range};

    fn range_at(line: u32, column: u32, length: u32) -> Range {
        Range::new(Location::new(None, line, column, 0), length)
    }

    /// `fn f() -> bool { return true; }` — the end-to-end success scenario.
    #[test]
    fn well_formed_program_with_no_findings_succeeds() {
        let mut root = Node::DeclarationBlock {
            range: range_at(1, 1, 1),
            decls: vec![Node::DeclarationFunction {
                range: range_at(1, 1, 30),
                flags: FunctionFlags::default(),
                name: "f".to_string(),
                fn_type: Box::new(Node::TypeFunction {
                    range: range_at(1, 1, 1),
                    args: vec![],
                    variadic_positional: None,
                    variadic_keyword: None,
                    return_type: Some(Box::new(Node::TypeBool { range: range_at(1, 1, 1) })),
                }),
                body: Some(vec![Node::StatementReturn {
                    range: range_at(1, 20, 10),
                    value: Some(Box::new(Node::ValueBool { range: range_at(1, 27, 4), value: true })),
                }]),
            }],
        };

        let messages = verify(&mut root);
        assert!(!messages.has_errors());
    }

    /// `fn f() -> bool { return 0i32; }` — type mismatch is still reported
    /// even though nothing here is an unsupported construct.
    #[test]
    fn mismatched_return_type_surfaces_through_the_composed_verifier() {
        let value_range = range_at(2, 10, 4);
        let mut root = Node::DeclarationBlock {
            range: range_at(1, 1, 1),
            decls: vec![Node::DeclarationFunction {
                range: range_at(1, 1, 1),
                flags: FunctionFlags::default(),
                name: "f".to_string(),
                fn_type: Box::new(Node::TypeFunction {
                    range: range_at(1, 1, 1),
                    args: vec![],
                    variadic_positional: None,
                    variadic_keyword: None,
                    return_type: Some(Box::new(Node::TypeBool { range: range_at(1, 1, 1) })),
                }),
                body: Some(vec![Node::StatementReturn {
                    range: range_at(2, 5, 10),
                    value: Some(Box::new(Node::ValueInt {
                        range: value_range.clone(),
                        value_type: Box::new(Node::new_type_int(value_range, false, 32)),
                        value: 0,
                    })),
                }]),
            }],
        };

        let messages = verify(&mut root);
        assert_eq!(messages.error_count, 1);
        assert_eq!(messages.query_count(&crate::messages::Query::new().with_code("ET-5")), 1);
    }

    /// A character literal is well-formed and well-typed but still
    /// unsupported; the pass that gates it must run independently of the
    /// type-verification pass.
    #[test]
    fn character_literal_is_reported_unsupported() {
        let mut root = Node::ValueCharacter { range: range_at(1, 1, 3), value: 'x' };
        let messages = verify(&mut root);
        assert_eq!(messages.query_count(&crate::messages::Query::new().with_code("EFT-1")), 1);
    }
}
