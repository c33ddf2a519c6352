//! Debug and formatted printing (§4.1, and the verbatim format of §6).
//!
//! Debug printing is a mechanically structured dump: a newline, then each
//! property at the current indent as `name = value`, recursing into child
//! nodes (shown as `name = [kind-tag]` followed by their own block) and list
//! elements (`name[i] = ...`). Primary types (`void`, `bool`, sized `int`,
//! sized `float`) never get a `[kind-tag]` block — they print only their
//! keyword inline, both standalone and as a child property's value.
//!
//! Formatted printing approximates the source language's surface syntax; it
//! is not asserted verbatim anywhere and exists as a human-readable
//! convenience for rendered diagnostics (e.g. "cannot return value of type
//! 'i32'").

use crate::ast::Node;
use crate::kind::NodeKind;
use crate::node_kind_info;

#[derive(Debug, Clone, Copy)]
pub struct DebugPrintOptions {
    pub max_depth: Option<usize>,
    pub max_list_length: Option<usize>,
}

impl Default for DebugPrintOptions {
    fn default() -> Self {
        DebugPrintOptions { max_depth: None, max_list_length: None }
    }
}

/// The keyword a primary type prints as, both standalone and inline.
fn primary_type_keyword(node: &Node) -> Option<String> {
    match node {
        Node::TypeVoid { .. } => Some("void".to_string()),
        Node::TypeBool { .. } => Some("bool".to_string()),
        Node::TypeInt { unsigned, bit_width, .. } => {
            Some(format!("{}{}", if *unsigned { "u" } else { "i" }, bit_width))
        }
        Node::TypeFloat { bit_width, .. } => Some(format!("f{bit_width}")),
        _ => None,
    }
}

pub fn debug_print(node: &Node) -> String {
    debug_print_with_options(node, &DebugPrintOptions::default())
}

pub fn debug_print_with_options(node: &Node, opts: &DebugPrintOptions) -> String {
    let mut out = String::new();
    if let Some(keyword) = primary_type_keyword(node) {
        out.push_str(&keyword);
        return out;
    }
    write_properties(node, &mut out, 1, opts);
    out
}

fn indent_str(indent: usize) -> String {
    "  ".repeat(indent)
}

/// Writes `name = <value>` for a child node property: inline keyword for
/// primary types, `[kind-tag]` + recursive block otherwise.
fn write_child_property(out: &mut String, indent: usize, name: &str, child: &Node, opts: &DebugPrintOptions) {
    out.push_str(&indent_str(indent));
    out.push_str(name);
    out.push_str(" = ");
    if let Some(keyword) = primary_type_keyword(child) {
        out.push_str(&keyword);
        out.push('\n');
        return;
    }
    out.push('[');
    out.push_str(node_kind_info::get(child.kind()).name);
    out.push(']');
    if opts.max_depth.is_some_and(|max| indent + 1 > max) {
        out.push_str(" …\n");
        return;
    }
    write_properties(child, out, indent + 1, opts);
}

fn write_child_opt(out: &mut String, indent: usize, name: &str, child: &Option<Box<Node>>, opts: &DebugPrintOptions) {
    out.push_str(&indent_str(indent));
    match child {
        Some(node) => {
            out.push_str(name);
            out.push_str(" = ");
            if let Some(keyword) = primary_type_keyword(node) {
                out.push_str(&keyword);
                out.push('\n');
                return;
            }
            out.push('[');
            out.push_str(node_kind_info::get(node.kind()).name);
            out.push(']');
            if opts.max_depth.is_some_and(|max| indent + 1 > max) {
                out.push_str(" …\n");
                return;
            }
            write_properties(node, out, indent + 1, opts);
        }
        None => {
            out.push_str(name);
            out.push_str(" = <null>\n");
        }
    }
}

fn write_scalar(out: &mut String, indent: usize, name: &str, value: impl std::fmt::Display) {
    out.push_str(&indent_str(indent));
    out.push_str(name);
    out.push_str(" = ");
    out.push_str(&value.to_string());
    out.push('\n');
}

fn write_string_scalar(out: &mut String, indent: usize, name: &str, value: &str) {
    write_scalar(out, indent, name, format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\"")));
}

fn write_opt_string_scalar(out: &mut String, indent: usize, name: &str, value: &Option<String>) {
    match value {
        Some(s) => write_string_scalar(out, indent, name, s),
        None => write_scalar(out, indent, name, "<null>"),
    }
}

fn write_list(out: &mut String, indent: usize, name: &str, list: &[Node], opts: &DebugPrintOptions) {
    let limit = opts.max_list_length.unwrap_or(list.len());
    for (i, item) in list.iter().enumerate().take(limit) {
        let label = format!("{name}[{i}]");
        write_child_property(out, indent, &label, item, opts);
    }
    if list.len() > limit {
        out.push_str(&indent_str(indent));
        out.push_str(&format!("{name}[...{} more]\n", list.len() - limit));
    }
}

fn write_opt_list(out: &mut String, indent: usize, name: &str, list: &Option<Vec<Node>>, opts: &DebugPrintOptions) {
    match list {
        Some(items) => write_list(out, indent, name, items, opts),
        None => write_scalar(out, indent, name, "<null>"),
    }
}

fn flag_names(bits: u8, names: &[(u8, &str)]) -> String {
    let active: Vec<&str> = names.iter().filter(|(bit, _)| bits & bit != 0).map(|(_, n)| *n).collect();
    if active.is_empty() { "none".to_string() } else { active.join("|") }
}

fn write_properties(node: &Node, out: &mut String, indent: usize, opts: &DebugPrintOptions) {
    use crate::ast::{FunctionArgumentFlags, FunctionFlags, InterfaceFlags, PointerFlags, PropertyFlags};

    out.push('\n');
    match node {
        Node::TypeVoid { .. } | Node::TypeBool { .. } | Node::TypeInt { .. } | Node::TypeFloat { .. } => {
            // unreachable: handled by primary_type_keyword before this is called
        }
        Node::TypeSymbol { name, .. } => write_opt_string_scalar(out, indent, "name", name),
        Node::TypePointer { flags, pointee, .. } => {
            let names = flag_names(
                flags.0,
                &[(PointerFlags::CONST, "const"), (PointerFlags::IMPLICIT_DEREF, "implicit_deref")],
            );
            write_scalar(out, indent, "flags", names);
            write_child_opt(out, indent, "pointee", pointee, opts);
        }
        Node::TypeArray { length, element, .. } => {
            write_child_property(out, indent, "length", length, opts);
            write_child_property(out, indent, "element", element, opts);
        }
        Node::TypeFunction { args, variadic_positional, variadic_keyword, return_type, .. } => {
            write_list(out, indent, "args", args, opts);
            write_child_opt(out, indent, "variadic_positional", variadic_positional, opts);
            write_child_opt(out, indent, "variadic_keyword", variadic_keyword, opts);
            write_child_opt(out, indent, "return_type", return_type, opts);
        }

        Node::DeclarationUnion { name, props, .. } => {
            write_string_scalar(out, indent, "name", name);
            write_list(out, indent, "props", props, opts);
        }
        Node::DeclarationStructure { name, decls, .. } => {
            write_string_scalar(out, indent, "name", name);
            write_list(out, indent, "decls", decls, opts);
        }
        Node::DeclarationProperty { flags, name, property_type, .. } => {
            let names = flag_names(
                flags.0,
                &[
                    (PropertyFlags::OPTIONAL, "optional"),
                    (PropertyFlags::NON_OPTIONAL, "non_optional"),
                    (PropertyFlags::SPREAD, "spread"),
                ],
            );
            write_scalar(out, indent, "flags", names);
            write_string_scalar(out, indent, "name", name);
            write_child_opt(out, indent, "property_type", property_type, opts);
        }
        Node::DeclarationInterface { flags, name, extends, decls, .. } => {
            write_scalar(out, indent, "flags", flag_names(flags.0, &[(InterfaceFlags::ABSTRACT, "abstract")]));
            write_string_scalar(out, indent, "name", name);
            write_list(out, indent, "extends", extends, opts);
            write_list(out, indent, "decls", decls, opts);
        }
        Node::DeclarationFunctionArgument { flags, property, default, .. } => {
            write_scalar(out, indent, "flags", flag_names(flags.0, &[(FunctionArgumentFlags::KEYWORD, "keyword")]));
            write_child_property(out, indent, "property", property, opts);
            write_child_opt(out, indent, "default", default, opts);
        }
        Node::DeclarationFunction { flags, name, fn_type, body, .. } => {
            let names = flag_names(
                flags.0,
                &[(FunctionFlags::MUTABLE, "mutable"), (FunctionFlags::OVERRIDE, "override")],
            );
            write_scalar(out, indent, "flags", names);
            write_string_scalar(out, indent, "name", name);
            write_child_property(out, indent, "fn_type", fn_type, opts);
            write_opt_list(out, indent, "body", body, opts);
        }
        Node::DeclarationAssignment { property, value, .. } => {
            write_child_property(out, indent, "property", property, opts);
            write_child_property(out, indent, "value", value, opts);
        }
        Node::DeclarationBlock { decls, .. } => write_list(out, indent, "decls", decls, opts),

        Node::StatementReturn { value, .. } => write_child_opt(out, indent, "value", value, opts),
        Node::StatementIfConditionalClause { condition, body, .. } => {
            write_child_property(out, indent, "condition", condition, opts);
            write_list(out, indent, "body", body, opts);
        }
        Node::StatementIf { clauses, else_body, .. } => {
            write_list(out, indent, "clauses", clauses, opts);
            write_opt_list(out, indent, "else_body", else_body, opts);
        }
        Node::StatementWhile { condition, body, .. } => {
            write_child_property(out, indent, "condition", condition, opts);
            write_list(out, indent, "body", body, opts);
        }
        Node::StatementBlock { stmts, .. } => write_list(out, indent, "stmts", stmts, opts),

        Node::ValueBool { value, .. } => write_scalar(out, indent, "value", value),
        Node::ValueInt { value_type, value, .. } => {
            write_child_property(out, indent, "value_type", value_type, opts);
            write_scalar(out, indent, "value", value);
        }
        Node::ValueFloat { bit_width, value, .. } => {
            write_scalar(out, indent, "bit_width", bit_width);
            write_scalar(out, indent, "value", value);
        }
        Node::ValueCharacter { value, .. } => write_scalar(out, indent, "value", format!("'{value}'")),
        Node::ValueString { value, .. } => write_string_scalar(out, indent, "value", value),
        Node::ValueArray { elements, .. } => write_list(out, indent, "elements", elements, opts),
        Node::ValueArrayRepeated { value, length, .. } => {
            write_child_property(out, indent, "value", value, opts);
            write_scalar(out, indent, "length", length);
        }
        Node::ValueStructure { fields, .. } => write_list(out, indent, "fields", fields, opts),
        Node::ValueSymbol { name, .. } => write_string_scalar(out, indent, "name", name),
        Node::ValueCallKeywordArgument { name, value, .. } => {
            write_string_scalar(out, indent, "name", name);
            write_child_property(out, indent, "value", value, opts);
        }
        Node::ValueCall { callee, args, kw_args, .. } => {
            write_child_property(out, indent, "callee", callee, opts);
            write_list(out, indent, "args", args, opts);
            write_list(out, indent, "kw_args", kw_args, opts);
        }
        Node::ValueCast { value, cast_type, .. } => {
            write_child_property(out, indent, "value", value, opts);
            write_child_property(out, indent, "cast_type", cast_type, opts);
        }
        Node::ValueUnary { operand, .. } => write_child_property(out, indent, "operand", operand, opts),
        Node::ValueBinary { left, right, .. } => {
            write_child_property(out, indent, "left", left, opts);
            write_child_property(out, indent, "right", right, opts);
        }
    }
}

/// Approximates the source language's surface syntax. Not asserted verbatim
/// by any test; used for rendering types/values inside diagnostic text (e.g.
/// "Cannot return value of type 'i32' ...").
pub fn format_print(node: &Node) -> String {
    if let Some(keyword) = primary_type_keyword(node) {
        return keyword;
    }
    match node {
        Node::TypeSymbol { name, .. } => name.clone().unwrap_or_else(|| "<unnamed>".to_string()),
        Node::TypePointer { flags, pointee, .. } => {
            use crate::ast::PointerFlags;
            let pointee = pointee.as_deref().map(format_print).unwrap_or_else(|| "<null>".to_string());
            let const_kw = if flags.0 & PointerFlags::CONST != 0 { "const " } else { "" };
            format!("*{const_kw}{pointee}")
        }
        Node::TypeArray { length, element, .. } => {
            format!("[{}]{}", format_print(length), format_print(element))
        }
        Node::TypeFunction { args, return_type, .. } => {
            let args_str: Vec<String> = args.iter().map(format_print).collect();
            let ret = return_type.as_deref().map(format_print).unwrap_or_else(|| "void".to_string());
            format!("fn({}) -> {}", args_str.join(", "), ret)
        }
        Node::DeclarationFunctionArgument { property, .. } => format_print(property),
        Node::DeclarationProperty { name, property_type, .. } => match property_type {
            Some(t) => format!("{name}: {}", format_print(t)),
            None => name.clone(),
        },
        Node::DeclarationFunction { name, fn_type, .. } => format!("fn {name}{}", format_print(fn_type).trim_start_matches("fn")),
        Node::ValueBool { value, .. } => value.to_string(),
        Node::ValueInt { value, value_type, .. } => format!("{value}{}", format_print(value_type)),
        Node::ValueFloat { value, bit_width, .. } => format!("{value}f{bit_width}"),
        Node::ValueCharacter { value, .. } => format!("'{value}'"),
        Node::ValueString { value, .. } => format!("\"{value}\""),
        Node::ValueSymbol { name, .. } => name.clone(),
        Node::ValueCall { callee, args, .. } => {
            let args_str: Vec<String> = args.iter().map(format_print).collect();
            format!("{}({})", format_print(callee), args_str.join(", "))
        }
        Node::ValueCast { value, cast_type, .. } => format!("({} as {})", format_print(value), format_print(cast_type)),
        Node::ValueUnary { kind, operand, .. } => {
            let symbol = node_kind_info::get(*kind).operator_symbol.unwrap_or("?");
            format!("{symbol}{}", format_print(operand))
        }
        Node::ValueBinary { kind, left, right, .. } => {
            let symbol = node_kind_info::get(*kind).operator_symbol.unwrap_or("?");
            if *kind == NodeKind::ValueAccess {
                format!("{}.{}", format_print(left), format_print(right))
            } else {
                format!("{} {symbol} {}", format_print(left), format_print(right))
            }
        }
        _ => format!("<{}>", node_kind_info::get(node.kind()).name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::{Location, Range};

    fn range() -> Range {
        Range::new(Location::new(None, 1, 1, 0), 1)
    }

    #[test]
    fn debug_print_value_array_of_bools_matches_spec_scenario() {
        let tree = Node::ValueArray {
            range: range(),
            elements: vec![
                Node::ValueBool { range: range(), value: false },
                Node::ValueBool { range: range(), value: true },
            ],
        };
        let expected = "\n  elements[0] = [value-bool]\n    value = false\n  elements[1] = [value-bool]\n    value = true\n";
        assert_eq!(debug_print(&tree), expected);
    }

    #[test]
    fn primary_types_print_only_their_keyword() {
        assert_eq!(debug_print(&Node::TypeVoid { range: range() }), "void");
        assert_eq!(debug_print(&Node::new_type_int(range(), false, 32)), "i32");
        assert_eq!(debug_print(&Node::new_type_int(range(), true, 8)), "u8");
        assert_eq!(debug_print(&Node::new_type_float(range(), 64)), "f64");
    }

    #[test]
    fn format_print_binary_add_uses_operator_symbol() {
        let tree = Node::new_value_binary(
            range(),
            NodeKind::ValueAdd,
            Node::ValueInt { range: range(), value_type: Box::new(Node::new_type_int(range(), false, 32)), value: 1 },
            Node::ValueInt { range: range(), value_type: Box::new(Node::new_type_int(range(), false, 32)), value: 2 },
        );
        assert_eq!(format_print(&tree), "1i32 + 2i32");
    }
}
