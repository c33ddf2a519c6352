//! The unsupported-feature pass (§4.5.2): gates constructs the AST model
//! accepts but that the downstream codegen/linking pipeline in this
//! repository does not implement yet.
//!
//! Each handler below gates one construct this repository's downstream
//! pipeline does not implement yet, and is deliberately narrow where a
//! naive reading of the AST flags would over-reject:
//!
//! - `declaration-property` only gates `Optional` (truly optional fields)
//!   and `Spread`. A plain required property in this codebase always
//!   carries `NonOptional` (see `scope.rs`/`type_resolve.rs` tests) — there
//!   is no "flags unset" form in actual use — so `NonOptional` is treated as
//!   the ordinary, supported case. See DESIGN.md.
//! - User-defined operator overloads have no declaration variant in this
//!   AST model, so there is nothing to gate for them.

use crate::ast::{FunctionArgumentFlags, FunctionFlags, Node, PropertyFlags};
use crate::messages::MessageBuffer;
use crate::visitor::{Parents, Visitor, VisitorStatus};
use forge_core::{Range, Severity};

fn unsupported(messages: &mut MessageBuffer, range: Range, feature: &str) {
    messages.emit(Severity::Error, Some("EFT-1"), Some(range), format!("{feature} are not yet supported"));
}

fn unsupported_subitem(messages: &mut MessageBuffer, range: Range, category: &str, feature: &str) {
    messages.emit(Severity::Error, Some("EFT-2"), Some(range), format!("{feature} are not yet supported ({category})"));
}

/// Builds the unsupported-feature pass as a standalone `Visitor`. Its user
/// data is just the `MessageBuffer` — this pass never needs the scope.
pub fn build() -> Visitor<MessageBuffer> {
    let mut visitor = Visitor::new();

    visitor.on_enter(crate::kind::NodeKind::DeclarationUnion, |node, _parents: &Parents, messages| {
        unsupported(messages, node.range().clone(), "Union declarations");
        VisitorStatus::Skip
    });

    visitor.on_enter(crate::kind::NodeKind::DeclarationInterface, |node, _parents: &Parents, messages| {
        unsupported(messages, node.range().clone(), "Interface declarations");
        VisitorStatus::Skip
    });

    visitor.on_enter(crate::kind::NodeKind::DeclarationProperty, |node, _parents: &Parents, messages| {
        let Node::DeclarationProperty { flags, property_type, .. } = node else { unreachable!() };
        if flags.0 & PropertyFlags::OPTIONAL != 0 {
            unsupported(messages, node.range().clone(), "Optionals");
            return VisitorStatus::Skip;
        }
        if flags.0 & PropertyFlags::SPREAD != 0 {
            unsupported(messages, node.range().clone(), "Spreads");
            return VisitorStatus::Skip;
        }
        if property_type.is_none() {
            unsupported(messages, node.range().clone(), "Dynamic objects");
            return VisitorStatus::Skip;
        }
        VisitorStatus::Ok
    });

    visitor.on_enter(crate::kind::NodeKind::TypeFunction, |node, _parents: &Parents, messages| {
        let Node::TypeFunction { variadic_positional, variadic_keyword, return_type, .. } = node else { unreachable!() };
        if variadic_positional.is_some() {
            unsupported_subitem(messages, node.range().clone(), "Function declarations", "Variable positional arguments");
            return VisitorStatus::Skip;
        }
        if variadic_keyword.is_some() {
            unsupported_subitem(messages, node.range().clone(), "Function declarations", "Variable keyword arguments");
            return VisitorStatus::Skip;
        }
        if return_type.is_none() {
            unsupported(messages, node.range().clone(), "Dynamic objects");
            return VisitorStatus::Skip;
        }
        VisitorStatus::Ok
    });

    visitor.on_enter(crate::kind::NodeKind::DeclarationFunctionArgument, |node, _parents: &Parents, messages| {
        let Node::DeclarationFunctionArgument { flags, default, .. } = node else { unreachable!() };
        if flags.0 & FunctionArgumentFlags::KEYWORD != 0 {
            unsupported_subitem(messages, node.range().clone(), "Function declarations", "Variadic keyword arguments");
            return VisitorStatus::Skip;
        }
        if default.is_some() {
            unsupported_subitem(messages, node.range().clone(), "Function declarations", "Default argument values");
            return VisitorStatus::Skip;
        }
        VisitorStatus::Ok
    });

    visitor.on_enter(crate::kind::NodeKind::DeclarationFunction, |node, _parents: &Parents, messages| {
        let Node::DeclarationFunction { flags, .. } = node else { unreachable!() };
        if flags.0 & (FunctionFlags::MUTABLE | FunctionFlags::OVERRIDE) != 0 {
            unsupported_subitem(messages, node.range().clone(), "Function declarations", "Overriding");
            return VisitorStatus::Skip;
        }
        VisitorStatus::Ok
    });

    visitor.on_enter(crate::kind::NodeKind::ValueCharacter, |node, _parents: &Parents, messages| {
        unsupported(messages, node.range().clone(), "Character literals");
        VisitorStatus::Skip
    });

    visitor.on_enter(crate::kind::NodeKind::ValueString, |node, _parents: &Parents, messages| {
        unsupported(messages, node.range().clone(), "String literals");
        VisitorStatus::Skip
    });

    visitor.on_enter(crate::kind::NodeKind::ValueCallKeywordArgument, |node, _parents: &Parents, messages| {
        unsupported_subitem(messages, node.range().clone(), "Function declarations", "Variadic keyword arguments");
        VisitorStatus::Skip
    });

    visitor.on_enter(crate::kind::NodeKind::ValueCall, |node, _parents: &Parents, messages| {
        let Node::ValueCall { kw_args, .. } = node else { unreachable!() };
        if !kw_args.is_empty() {
            unsupported_subitem(messages, node.range().clone(), "Function declarations", "Variadic keyword arguments");
            return VisitorStatus::Skip;
        }
        VisitorStatus::Ok
    });

    visitor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FunctionFlags, PropertyFlags};
    use forge_core::Location;

    fn range() -> Range {
        Range::new(Location::new(None, 1, 1, 0), 1)
    }

    #[test]
    fn union_declaration_is_rejected() {
        let mut tree = Node::DeclarationUnion { range: range(), name: "U".to_string(), props: vec![] };
        let mut messages = MessageBuffer::new();
        build().accept(&mut tree, &mut messages);
        assert_eq!(messages.query_count(&crate::messages::Query::new().with_code("EFT-1")), 1);
    }

    #[test]
    fn ordinary_non_optional_property_is_accepted() {
        let mut tree = Node::DeclarationProperty {
            range: range(),
            flags: PropertyFlags(PropertyFlags::NON_OPTIONAL),
            name: "x".to_string(),
            property_type: Some(Box::new(Node::TypeBool { range: range() })),
        };
        let mut messages = MessageBuffer::new();
        build().accept(&mut tree, &mut messages);
        assert!(messages.is_empty());
    }

    #[test]
    fn optional_property_is_rejected() {
        let mut tree = Node::DeclarationProperty {
            range: range(),
            flags: PropertyFlags(PropertyFlags::OPTIONAL),
            name: "x".to_string(),
            property_type: Some(Box::new(Node::TypeBool { range: range() })),
        };
        let mut messages = MessageBuffer::new();
        build().accept(&mut tree, &mut messages);
        assert_eq!(messages.error_count, 1);
    }

    #[test]
    fn property_without_declared_type_is_a_dynamic_object() {
        let mut tree = Node::DeclarationProperty {
            range: range(),
            flags: PropertyFlags(PropertyFlags::NON_OPTIONAL),
            name: "x".to_string(),
            property_type: None,
        };
        let mut messages = MessageBuffer::new();
        build().accept(&mut tree, &mut messages);
        assert_eq!(messages.query_count(&crate::messages::Query::new().with_code("EFT-1")), 1);
    }

    #[test]
    fn character_and_string_literals_are_rejected() {
        let mut messages = MessageBuffer::new();
        let mut c = Node::ValueCharacter { range: range(), value: 'x' };
        build().accept(&mut c, &mut messages);
        let mut s = Node::ValueString { range: range(), value: "hi".to_string() };
        build().accept(&mut s, &mut messages);
        assert_eq!(messages.error_count, 2);
    }

    #[test]
    fn overriding_function_is_rejected() {
        let mut tree = Node::DeclarationFunction {
            range: range(),
            flags: FunctionFlags(FunctionFlags::OVERRIDE),
            name: "f".to_string(),
            fn_type: Box::new(Node::TypeFunction {
                range: range(),
                args: vec![],
                variadic_positional: None,
                variadic_keyword: None,
                return_type: Some(Box::new(Node::TypeVoid { range: range() })),
            }),
            body: Some(vec![]),
        };
        let mut messages = MessageBuffer::new();
        build().accept(&mut tree, &mut messages);
        assert_eq!(messages.query_count(&crate::messages::Query::new().with_code("EFT-2")), 1);
    }

    #[test]
    fn well_formed_function_with_no_args_passes_clean() {
        let mut tree = Node::DeclarationFunction {
            range: range(),
            flags: FunctionFlags::default(),
            name: "f".to_string(),
            fn_type: Box::new(Node::TypeFunction {
                range: range(),
                args: vec![],
                variadic_positional: None,
                variadic_keyword: None,
                return_type: Some(Box::new(Node::TypeBool { range: range() })),
            }),
            body: Some(vec![Node::StatementReturn {
                range: range(),
                value: Some(Box::new(Node::ValueBool { range: range(), value: true })),
            }]),
        };
        let mut messages = MessageBuffer::new();
        build().accept(&mut tree, &mut messages);
        assert!(messages.is_empty());
    }
}
