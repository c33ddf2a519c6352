//! The well-formedness verifier pass (§4.5.1): invariants the parser
//! collaborator is expected to guarantee but that the `Node` type itself does
//! not enforce structurally.
//!
//! Almost every violation here represents a bug in whatever produced the
//! AST, not a user-facing condition — the reference implementation aborts
//! unconditionally rather than emitting a diagnostic, and this repository
//! preserves that via `assert!`. The single exception is a `type-symbol`
//! with a null/empty name, which the parser may legitimately produce during
//! error recovery after a lexical failure; that one case emits a recoverable
//! `IS-5` diagnostic instead of panicking.

use crate::ast::{FunctionArgumentFlags, FunctionFlags, InterfaceFlags, Node, PointerFlags, PropertyFlags};
use crate::messages::MessageBuffer;
use forge_core::{is_valid_identifier as is_valid_symbol_identifier, Severity};

fn check_range(node: &Node) {
    let range = node.range();
    assert!(range.start.line >= 1, "malformed AST: {} has a non-positive line number", node.kind());
    assert!(range.start.column >= 1, "malformed AST: {} has a non-positive column number", node.kind());
    assert!(range.length >= 1, "malformed AST: {} has a non-positive range length", node.kind());
}

pub fn check(node: &Node, messages: &mut MessageBuffer) {
    check_range(node);
    match node {
        Node::TypeInt { unsigned: _, bit_width, .. } => {
            assert!(
                matches!(bit_width, 8 | 16 | 32 | 64),
                "malformed AST: type-int has invalid bit width {bit_width}"
            );
        }
        Node::TypeFloat { bit_width, .. } => {
            assert!(matches!(bit_width, 32 | 64), "malformed AST: type-float has invalid bit width {bit_width}");
        }
        Node::TypeSymbol { name, range } => {
            if name.as_deref().is_none_or(str::is_empty) {
                messages.emit(Severity::Error, Some("IS-5"), Some(range.clone()), "type-symbol has a null or empty name");
                return;
            }
        }
        Node::TypePointer { flags, pointee, .. } => {
            assert!(flags.0 & !PointerFlags::ALL == 0, "malformed AST: type-pointer has flags outside the declared set");
            let Some(pointee) = pointee else {
                panic!("malformed AST: type-pointer has a null pointee");
            };
            check(pointee, messages);
        }
        Node::TypeArray { length, element, .. } => {
            check(length, messages);
            check(element, messages);
        }
        Node::TypeFunction { args, variadic_positional, variadic_keyword, return_type, .. } => {
            for arg in args {
                assert!(
                    matches!(arg, Node::DeclarationFunctionArgument { .. }),
                    "malformed AST: type-function argument list contains a non-function-argument node"
                );
                check(arg, messages);
            }
            if let Some(v) = variadic_positional {
                check(v, messages);
            }
            if let Some(v) = variadic_keyword {
                check(v, messages);
            }
            // A null return type is well-formed: it means void, the same as
            // `type_check.rs`'s treatment of `return_type: None` as an
            // unconstrained return. The bundled parser produces this for a
            // function declared with no `-> T` clause.
            if let Some(return_type) = return_type {
                check(return_type, messages);
            }
        }
        Node::DeclarationUnion { name, props, .. } => {
            assert_symbol(name);
            for prop in props {
                check(prop, messages);
            }
        }
        Node::DeclarationStructure { name, decls, .. } => {
            assert_symbol(name);
            for decl in decls {
                check(decl, messages);
            }
        }
        Node::DeclarationProperty { flags, name, property_type, .. } => {
            assert!(flags.0 & !PropertyFlags::ALL == 0, "malformed AST: declaration-property has flags outside the declared set");
            let optional = flags.0 & PropertyFlags::OPTIONAL != 0;
            let non_optional = flags.0 & PropertyFlags::NON_OPTIONAL != 0;
            assert!(optional ^ non_optional, "malformed AST: declaration-property must set exactly one of Optional/NonOptional");
            assert_symbol(name);
            if let Some(t) = property_type {
                check(t, messages);
            }
        }
        Node::DeclarationInterface { flags, name, extends, decls, .. } => {
            assert!(flags.0 & !InterfaceFlags::ALL == 0, "malformed AST: declaration-interface has flags outside the declared set");
            assert_symbol(name);
            for e in extends {
                check(e, messages);
            }
            for d in decls {
                check(d, messages);
            }
        }
        Node::DeclarationFunctionArgument { flags, property, default, .. } => {
            assert!(
                flags.0 & !FunctionArgumentFlags::ALL == 0,
                "malformed AST: declaration-function-argument has flags outside the declared set"
            );
            assert!(
                matches!(property.as_ref(), Node::DeclarationProperty { .. }),
                "malformed AST: declaration-function-argument's property is not a declaration-property"
            );
            check(property, messages);
            if let Some(d) = default {
                check(d, messages);
            }
        }
        Node::DeclarationFunction { flags, name, fn_type, body, .. } => {
            assert!(flags.0 & !FunctionFlags::ALL == 0, "malformed AST: declaration-function has flags outside the declared set");
            assert_symbol(name);
            assert!(
                matches!(fn_type.as_ref(), Node::TypeFunction { .. }),
                "malformed AST: declaration-function's fn_type is not a type-function"
            );
            check(fn_type, messages);
            if let Some(body) = body {
                for stmt in body {
                    check(stmt, messages);
                }
            }
        }
        Node::DeclarationAssignment { property, value, .. } => {
            check(property, messages);
            check(value, messages);
        }
        Node::DeclarationBlock { decls, .. } => {
            for decl in decls {
                check(decl, messages);
            }
        }
        Node::StatementReturn { value, .. } => {
            if let Some(v) = value {
                check(v, messages);
            }
        }
        Node::StatementIfConditionalClause { condition, body, .. } => {
            check(condition, messages);
            for stmt in body {
                check(stmt, messages);
            }
        }
        Node::StatementIf { clauses, else_body, .. } => {
            assert!(!clauses.is_empty(), "malformed AST: statement-if has no clauses");
            for clause in clauses {
                check(clause, messages);
            }
            if let Some(body) = else_body {
                for stmt in body {
                    check(stmt, messages);
                }
            }
        }
        Node::StatementWhile { condition, body, .. } => {
            check(condition, messages);
            for stmt in body {
                check(stmt, messages);
            }
        }
        Node::StatementBlock { stmts, .. } => {
            for stmt in stmts {
                check(stmt, messages);
            }
        }
        Node::ValueInt { value_type, .. } => {
            assert!(
                matches!(value_type.as_ref(), Node::TypeInt { .. }),
                "malformed AST: value-int's value_type is not a type-int"
            );
            check(value_type, messages);
        }
        Node::ValueFloat { bit_width, .. } => {
            assert!(matches!(bit_width, 32 | 64), "malformed AST: value-float has invalid bit width {bit_width}");
        }
        Node::ValueArray { elements, .. } => {
            for e in elements {
                check(e, messages);
            }
        }
        Node::ValueArrayRepeated { value, .. } => check(value, messages),
        Node::ValueStructure { fields, .. } => {
            for f in fields {
                check(f, messages);
            }
        }
        Node::ValueSymbol { name, .. } => assert_symbol(name),
        Node::ValueCallKeywordArgument { name, value, .. } => {
            assert_symbol(name);
            check(value, messages);
        }
        Node::ValueCall { callee, args, kw_args, .. } => {
            check(callee, messages);
            for a in args {
                check(a, messages);
            }
            for a in kw_args {
                check(a, messages);
            }
        }
        Node::ValueCast { value, cast_type, .. } => {
            check(value, messages);
            check(cast_type, messages);
        }
        Node::ValueUnary { operand, .. } => check(operand, messages),
        Node::ValueBinary { left, right, .. } => {
            check(left, messages);
            check(right, messages);
        }
        _ => {}
    }
}

fn assert_symbol(name: &str) {
    assert!(!name.is_empty(), "malformed AST: identifier is empty");
    assert!(is_valid_symbol_identifier(name), "malformed AST: '{name}' is not a valid identifier");
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::{Location, Range};

    fn range() -> Range {
        Range::new(Location::new(None, 1, 1, 0), 1)
    }

    #[test]
    fn well_formed_bool_literal_passes() {
        let mut messages = MessageBuffer::new();
        check(&Node::ValueBool { range: range(), value: true }, &mut messages);
        assert!(messages.is_empty());
    }

    #[test]
    #[should_panic(expected = "invalid bit width")]
    fn invalid_integer_bit_width_panics() {
        let mut messages = MessageBuffer::new();
        check(&Node::new_type_int(range(), false, 17), &mut messages);
    }

    #[test]
    fn null_type_symbol_name_emits_is5_instead_of_panicking() {
        let mut messages = MessageBuffer::new();
        check(&Node::TypeSymbol { range: range(), name: None }, &mut messages);
        assert_eq!(messages.error_count, 1);
        let found = messages.query_all(&crate::messages::Query::new().with_code("IS-5"));
        assert_eq!(found.len(), 1);
    }

    #[test]
    #[should_panic(expected = "not a valid identifier")]
    fn invalid_identifier_panics() {
        let mut messages = MessageBuffer::new();
        check(&Node::ValueSymbol { range: range(), name: "1abc".to_string() }, &mut messages);
    }

    #[test]
    #[should_panic(expected = "null pointee")]
    fn null_pointer_pointee_panics() {
        let mut messages = MessageBuffer::new();
        check(&Node::TypePointer { range: range(), flags: PointerFlags::default(), pointee: None }, &mut messages);
    }
}
