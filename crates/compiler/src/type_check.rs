//! The type-verification pass (§4.5.3): checks operand types against each
//! operator's constraint table and a `return` statement's value against its
//! enclosing function's declared return type.
//!
//! Handlers are registered for `statement-return` and for every unary and
//! binary operator kind named in §4.5.3's operand-constraint table —
//! arithmetic and comparison operators carry the same "numeric" constraint
//! as bitwise, shift, and logical operators, so all of them are checked
//! here, not just a subset. See DESIGN.md for the rationale.
//!
//! The rendered text is `Operator {symbol}'s {side} must be {expected}, but
//! is '{actual}'`, where `{actual}` is always wrapped in quotes by this one
//! template and `{expected}` is passed in pre-quoted when it names a
//! concrete type (`"'bool'"`, `"'u32'"`) and bare when it names a category
//! (`"integer"`, `"numeric"`) — matching scenario 3's `Operator !'s operand
//! must be 'bool', but is 'u8'` exactly.

use crate::ast::Node;
use crate::kind::NodeKind;
use crate::messages::MessageBuffer;
use crate::node_kind_info;
use crate::printer::format_print;
use crate::scope::Scope;
use crate::type_resolve::resolve_value_type;
use crate::visitor::{Parents, Visitor, VisitorStatus};
use forge_core::{Range, Severity};

/// Shared user-data for this pass: the scope threaded alongside a
/// `MessageBuffer` the caller owns for the lifetime of the whole verifier.
pub struct TypeCheckContext<'ast, 'msg> {
    pub scope: Scope<'ast>,
    pub messages: &'msg mut MessageBuffer,
}

fn is_numeric(node: &Node) -> bool {
    matches!(node, Node::TypeInt { .. } | Node::TypeFloat { .. })
}

fn is_integer(node: &Node) -> bool {
    matches!(node, Node::TypeInt { .. })
}

fn is_bool(node: &Node) -> bool {
    matches!(node, Node::TypeBool { .. })
}

fn is_u32(node: &Node) -> bool {
    matches!(node, Node::TypeInt { unsigned: true, bit_width: 32, .. })
}

fn emit_et6(messages: &mut MessageBuffer, range: Range, symbol: &str, side: &str, expected: &str, actual: &Node) {
    messages.emit(
        Severity::Error,
        Some("ET-6"),
        Some(range),
        format!("Operator {symbol}'s {side} must be {expected}, but is '{}'", format_print(actual)),
    );
}

fn check_operand(
    messages: &mut MessageBuffer,
    symbol: &str,
    side: &str,
    expected_label: &str,
    predicate: impl Fn(&Node) -> bool,
    operand_range: Range,
    resolved: Option<Node>,
) {
    let Some(resolved) = resolved else { return };
    if !predicate(&resolved) {
        emit_et6(messages, operand_range, symbol, side, expected_label, &resolved);
    }
}

fn symbol_of(kind: NodeKind) -> &'static str {
    node_kind_info::get(kind).operator_symbol.unwrap_or("?")
}

/// Builds the type-verification pass as a standalone `Visitor`.
pub fn build<'ast, 'msg>() -> Visitor<TypeCheckContext<'ast, 'msg>> {
    let mut visitor = Visitor::new();

    visitor.on_enter(NodeKind::DeclarationBlock, |node, _parents: &Parents, ctx| {
        ctx.scope.load_declaration_block(node);
        VisitorStatus::Ok
    });

    visitor.on_enter(NodeKind::DeclarationFunction, |node, _parents: &Parents, ctx| {
        ctx.scope.push_frame();
        ctx.scope.load_declaration_function_args(node);
        VisitorStatus::Ok
    });
    visitor.on_leave(NodeKind::DeclarationFunction, |_node, _parents: &Parents, ctx| {
        ctx.scope.pop_frame();
        VisitorStatus::Ok
    });

    visitor.on_enter(NodeKind::StatementReturn, |node, parents: &Parents, ctx| {
        let Node::StatementReturn { value, .. } = node else { unreachable!() };
        let Some(value) = value else { return VisitorStatus::Ok };

        let Some(Node::DeclarationFunction { fn_type, .. }) =
            parents.find(|n| matches!(n, Node::DeclarationFunction { .. }))
        else {
            return VisitorStatus::Ok;
        };
        let Node::TypeFunction { return_type: Some(expected), .. } = fn_type.as_ref() else {
            return VisitorStatus::Ok;
        };

        let Some(actual) = resolve_value_type(value, &ctx.scope, ctx.messages) else { return VisitorStatus::Ok };
        if &actual != expected.as_ref() {
            ctx.messages.emit(
                Severity::Error,
                Some("ET-5"),
                Some(value.range().clone()),
                format!(
                    "Cannot return value of type '{}' in function with return type '{}'",
                    format_print(&actual),
                    format_print(expected)
                ),
            );
        }
        VisitorStatus::Ok
    });

    register_unary(&mut visitor, NodeKind::ValueBitNot, "integer", is_integer);
    register_unary(&mut visitor, NodeKind::ValueLogicalNot, "'bool'", is_bool);
    register_unary(&mut visitor, NodeKind::ValueNegate, "numeric", is_numeric);

    register_binary(&mut visitor, NodeKind::ValueBitAnd, "integer", is_integer);
    register_binary(&mut visitor, NodeKind::ValueBitOr, "integer", is_integer);
    register_binary(&mut visitor, NodeKind::ValueBitXor, "integer", is_integer);
    register_binary(&mut visitor, NodeKind::ValueBitShiftLeft, "integer", is_integer);
    register_shift_right(&mut visitor);
    register_binary(&mut visitor, NodeKind::ValueLogicalAnd, "'bool'", is_bool);
    register_binary(&mut visitor, NodeKind::ValueLogicalOr, "'bool'", is_bool);

    for kind in [
        NodeKind::ValueAdd,
        NodeKind::ValueSubtract,
        NodeKind::ValueMultiply,
        NodeKind::ValueDivide,
        NodeKind::ValueDivideInt,
        NodeKind::ValueModulo,
        NodeKind::ValueExponentiate,
        NodeKind::ValueLessThan,
        NodeKind::ValueLessThanOrEqualTo,
        NodeKind::ValueGreaterThan,
        NodeKind::ValueGreaterThanOrEqualTo,
    ] {
        register_binary(&mut visitor, kind, "numeric", is_numeric);
    }

    visitor
}

fn register_unary<'ast, 'msg>(
    visitor: &mut Visitor<TypeCheckContext<'ast, 'msg>>,
    kind: NodeKind,
    expected_label: &'static str,
    predicate: impl Fn(&Node) -> bool + 'static,
) {
    visitor.on_enter(kind, move |node, _parents: &Parents, ctx| {
        let Node::ValueUnary { kind, operand, .. } = node else { unreachable!() };
        let symbol = symbol_of(*kind);
        let resolved = resolve_value_type(operand, &ctx.scope, ctx.messages);
        check_operand(ctx.messages, symbol, "operand", expected_label, &predicate, operand.range().clone(), resolved);
        VisitorStatus::Ok
    });
}

fn register_binary<'ast, 'msg>(
    visitor: &mut Visitor<TypeCheckContext<'ast, 'msg>>,
    kind: NodeKind,
    expected_label: &'static str,
    predicate: impl Fn(&Node) -> bool + 'static,
) {
    visitor.on_enter(kind, move |node, _parents: &Parents, ctx| {
        let Node::ValueBinary { kind, left, right, .. } = node else { unreachable!() };
        let symbol = symbol_of(*kind);
        let left_type = resolve_value_type(left, &ctx.scope, ctx.messages);
        check_operand(ctx.messages, symbol, "left-hand side", expected_label, &predicate, left.range().clone(), left_type);
        let right_type = resolve_value_type(right, &ctx.scope, ctx.messages);
        check_operand(ctx.messages, symbol, "right-hand side", expected_label, &predicate, right.range().clone(), right_type);
        VisitorStatus::Ok
    });
}

/// `>>`'s right-hand side is checked against exactly `u32`, not just
/// integer-ness — the reference's shift-count type is narrower than its
/// left-hand operand's.
fn register_shift_right<'ast, 'msg>(visitor: &mut Visitor<TypeCheckContext<'ast, 'msg>>) {
    visitor.on_enter(NodeKind::ValueBitShiftRight, |node, _parents: &Parents, ctx| {
        let Node::ValueBinary { kind, left, right, .. } = node else { unreachable!() };
        let symbol = symbol_of(*kind);
        let left_type = resolve_value_type(left, &ctx.scope, ctx.messages);
        check_operand(ctx.messages, symbol, "left-hand side", "integer", is_integer, left.range().clone(), left_type);
        let right_type = resolve_value_type(right, &ctx.scope, ctx.messages);
        check_operand(ctx.messages, symbol, "right-hand side", "'u32'", is_u32, right.range().clone(), right_type);
        VisitorStatus::Ok
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::FunctionFlags;
    use forge_core::Location;

    fn range_at(line: u32, column: u32, length: u32) -> Range {
        Range::new(Location::new(None, line, column, 0), length)
    }

    fn u8_value(range: Range, value: i128) -> Node {
        Node::ValueInt { range: range.clone(), value_type: Box::new(Node::new_type_int(range, true, 8)), value }
    }

    /// `fn f() -> bool { return !0u8; }` — the operand of `!` must be `bool`.
    #[test]
    fn logical_not_on_non_bool_emits_et6_with_spec_text() {
        let operand_range = range_at(2, 11, 3);
        let operand = u8_value(operand_range.clone(), 0);
        let mut not_expr = Node::ValueUnary { range: range_at(2, 10, 4), kind: NodeKind::ValueLogicalNot, operand: Box::new(operand) };

        let mut messages = MessageBuffer::new();
        let mut ctx = TypeCheckContext { scope: Scope::new(), messages: &mut messages };
        build().accept(&mut not_expr, &mut ctx);

        assert_eq!(messages.error_count, 1);
        let found = messages.query_all(&crate::messages::Query::new().with_code("ET-6"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "Operator !'s operand must be 'bool', but is 'u8'");
        assert_eq!(found[0].range, Some(operand_range));
    }

    /// `0u8 || 0u8` — both operands must be `bool`, so two ET-6s fire.
    #[test]
    fn logical_or_with_both_sides_wrong_emits_two_et6() {
        let left_range = range_at(2, 10, 3);
        let right_range = range_at(2, 17, 3);
        let mut or_expr = Node::ValueBinary {
            range: range_at(2, 10, 10),
            kind: NodeKind::ValueLogicalOr,
            left: Box::new(u8_value(left_range.clone(), 0)),
            right: Box::new(u8_value(right_range.clone(), 0)),
        };

        let mut messages = MessageBuffer::new();
        let mut ctx = TypeCheckContext { scope: Scope::new(), messages: &mut messages };
        build().accept(&mut or_expr, &mut ctx);

        assert_eq!(messages.error_count, 2);
        let found = messages.query_all(&crate::messages::Query::new().with_code("ET-6"));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].range, Some(left_range));
        assert_eq!(found[1].range, Some(right_range));
    }

    /// `fn f() -> bool { return 0i32; }` — ET-5 cites the returned value's range.
    #[test]
    fn mismatched_return_type_emits_et5() {
        let value_range = range_at(2, 10, 4);
        let value = Node::ValueInt {
            range: value_range.clone(),
            value_type: Box::new(Node::new_type_int(value_range.clone(), false, 32)),
            value: 0,
        };
        let mut f = Node::DeclarationFunction {
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
            body: Some(vec![Node::StatementReturn { range: range_at(2, 5, 10), value: Some(Box::new(value)) }]),
        };

        let mut messages = MessageBuffer::new();
        let mut ctx = TypeCheckContext { scope: Scope::new(), messages: &mut messages };
        build().accept(&mut f, &mut ctx);

        assert_eq!(messages.error_count, 1);
        let found = messages.query_all(&crate::messages::Query::new().with_code("ET-5"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].range, Some(value_range));
        assert_eq!(found[0].text, "Cannot return value of type 'i32' in function with return type 'bool'");
    }

    #[test]
    fn well_typed_return_passes_clean() {
        let mut f = Node::DeclarationFunction {
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
                value: Some(Box::new(Node::ValueBool { range: range_at(2, 12, 4), value: true })),
            }]),
        };

        let mut messages = MessageBuffer::new();
        let mut ctx = TypeCheckContext { scope: Scope::new(), messages: &mut messages };
        build().accept(&mut f, &mut ctx);

        assert!(messages.is_empty());
    }
}
