//! The AST node type and its per-kind construction, cloning, and comparison.
//!
//! Destruction has no dedicated operation in this repository: `Node` owns its
//! children through `Box`/`Vec`/`Option`, so dropping a node recursively drops
//! its children via ordinary Rust `Drop` (see §4.1 of SPEC_FULL.md).

use crate::kind::NodeKind;
use forge_core::Range;

/// `Pointer` flags: a bitmask over `Const` and `ImplicitDeref`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerFlags(pub u8);
impl PointerFlags {
    pub const NONE: u8 = 0;
    pub const CONST: u8 = 1 << 0;
    pub const IMPLICIT_DEREF: u8 = 1 << 1;
    pub const ALL: u8 = Self::CONST | Self::IMPLICIT_DEREF;
}

/// `Property` flags: exactly one of `Optional`/`NonOptional` plus optionally `Spread`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertyFlags(pub u8);
impl PropertyFlags {
    pub const NONE: u8 = 0;
    pub const OPTIONAL: u8 = 1 << 0;
    pub const NON_OPTIONAL: u8 = 1 << 1;
    pub const SPREAD: u8 = 1 << 2;
    pub const ALL: u8 = Self::OPTIONAL | Self::NON_OPTIONAL | Self::SPREAD;
}

/// `Interface` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InterfaceFlags(pub u8);
impl InterfaceFlags {
    pub const NONE: u8 = 0;
    pub const ABSTRACT: u8 = 1 << 0;
    pub const ALL: u8 = Self::ABSTRACT;
}

/// `FunctionArgument` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FunctionArgumentFlags(pub u8);
impl FunctionArgumentFlags {
    pub const NONE: u8 = 0;
    pub const KEYWORD: u8 = 1 << 0;
    pub const ALL: u8 = Self::KEYWORD;
}

/// `Function` declaration flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FunctionFlags(pub u8);
impl FunctionFlags {
    pub const NONE: u8 = 0;
    pub const MUTABLE: u8 = 1 << 0;
    pub const OVERRIDE: u8 = 1 << 1;
    pub const ALL: u8 = Self::MUTABLE | Self::OVERRIDE;
}

#[derive(Debug, Clone)]
pub enum Node {
    TypeVoid {
        range: Range,
    },
    TypeBool {
        range: Range,
    },
    TypeInt {
        range: Range,
        unsigned: bool,
        bit_width: u8,
    },
    TypeFloat {
        range: Range,
        bit_width: u8,
    },
    TypeSymbol {
        range: Range,
        name: Option<String>,
    },
    TypePointer {
        range: Range,
        flags: PointerFlags,
        pointee: Option<Box<Node>>,
    },
    TypeArray {
        range: Range,
        length: Box<Node>,
        element: Box<Node>,
    },
    TypeFunction {
        range: Range,
        args: Vec<Node>,
        variadic_positional: Option<Box<Node>>,
        variadic_keyword: Option<Box<Node>>,
        return_type: Option<Box<Node>>,
    },

    DeclarationUnion {
        range: Range,
        name: String,
        props: Vec<Node>,
    },
    DeclarationStructure {
        range: Range,
        name: String,
        decls: Vec<Node>,
    },
    DeclarationProperty {
        range: Range,
        flags: PropertyFlags,
        name: String,
        property_type: Option<Box<Node>>,
    },
    DeclarationInterface {
        range: Range,
        flags: InterfaceFlags,
        name: String,
        extends: Vec<Node>,
        decls: Vec<Node>,
    },
    DeclarationFunctionArgument {
        range: Range,
        flags: FunctionArgumentFlags,
        property: Box<Node>,
        default: Option<Box<Node>>,
    },
    DeclarationFunction {
        range: Range,
        flags: FunctionFlags,
        name: String,
        fn_type: Box<Node>,
        body: Option<Vec<Node>>,
    },
    DeclarationAssignment {
        range: Range,
        property: Box<Node>,
        value: Box<Node>,
    },
    DeclarationBlock {
        range: Range,
        decls: Vec<Node>,
    },

    StatementReturn {
        range: Range,
        value: Option<Box<Node>>,
    },
    StatementIfConditionalClause {
        range: Range,
        condition: Box<Node>,
        body: Vec<Node>,
    },
    StatementIf {
        range: Range,
        clauses: Vec<Node>,
        else_body: Option<Vec<Node>>,
    },
    StatementWhile {
        range: Range,
        condition: Box<Node>,
        body: Vec<Node>,
    },
    StatementBlock {
        range: Range,
        stmts: Vec<Node>,
    },

    ValueBool {
        range: Range,
        value: bool,
    },
    ValueInt {
        range: Range,
        value_type: Box<Node>,
        value: i128,
    },
    ValueFloat {
        range: Range,
        bit_width: u8,
        value: f64,
    },
    ValueCharacter {
        range: Range,
        value: char,
    },
    ValueString {
        range: Range,
        value: String,
    },
    ValueArray {
        range: Range,
        elements: Vec<Node>,
    },
    ValueArrayRepeated {
        range: Range,
        value: Box<Node>,
        length: u64,
    },
    ValueStructure {
        range: Range,
        fields: Vec<Node>,
    },
    ValueSymbol {
        range: Range,
        name: String,
    },
    ValueCallKeywordArgument {
        range: Range,
        name: String,
        value: Box<Node>,
    },
    ValueCall {
        range: Range,
        callee: Box<Node>,
        args: Vec<Node>,
        kw_args: Vec<Node>,
    },
    ValueCast {
        range: Range,
        value: Box<Node>,
        cast_type: Box<Node>,
    },
    ValueUnary {
        range: Range,
        kind: NodeKind,
        operand: Box<Node>,
    },
    ValueBinary {
        range: Range,
        kind: NodeKind,
        left: Box<Node>,
        right: Box<Node>,
    },
}

macro_rules! eq_box_opt {
    ($a:expr, $b:expr) => {
        match ($a, $b) {
            (Some(a), Some(b)) => a == b,
            (None, None) => true,
            _ => false,
        }
    };
}

impl Node {
    pub fn range(&self) -> &Range {
        match self {
            Node::TypeVoid { range }
            | Node::TypeBool { range }
            | Node::TypeInt { range, .. }
            | Node::TypeFloat { range, .. }
            | Node::TypeSymbol { range, .. }
            | Node::TypePointer { range, .. }
            | Node::TypeArray { range, .. }
            | Node::TypeFunction { range, .. }
            | Node::DeclarationUnion { range, .. }
            | Node::DeclarationStructure { range, .. }
            | Node::DeclarationProperty { range, .. }
            | Node::DeclarationInterface { range, .. }
            | Node::DeclarationFunctionArgument { range, .. }
            | Node::DeclarationFunction { range, .. }
            | Node::DeclarationAssignment { range, .. }
            | Node::DeclarationBlock { range, .. }
            | Node::StatementReturn { range, .. }
            | Node::StatementIfConditionalClause { range, .. }
            | Node::StatementIf { range, .. }
            | Node::StatementWhile { range, .. }
            | Node::StatementBlock { range, .. }
            | Node::ValueBool { range, .. }
            | Node::ValueInt { range, .. }
            | Node::ValueFloat { range, .. }
            | Node::ValueCharacter { range, .. }
            | Node::ValueString { range, .. }
            | Node::ValueArray { range, .. }
            | Node::ValueArrayRepeated { range, .. }
            | Node::ValueStructure { range, .. }
            | Node::ValueSymbol { range, .. }
            | Node::ValueCallKeywordArgument { range, .. }
            | Node::ValueCall { range, .. }
            | Node::ValueCast { range, .. }
            | Node::ValueUnary { range, .. }
            | Node::ValueBinary { range, .. } => range,
        }
    }

    /// The node-kind discriminant. For `ValueUnary`/`ValueBinary`, this is the
    /// embedded operator kind, not a single catch-all tag.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::TypeVoid { .. } => NodeKind::TypeVoid,
            Node::TypeBool { .. } => NodeKind::TypeBool,
            Node::TypeInt { .. } => NodeKind::TypeInt,
            Node::TypeFloat { .. } => NodeKind::TypeFloat,
            Node::TypeSymbol { .. } => NodeKind::TypeSymbol,
            Node::TypePointer { .. } => NodeKind::TypePointer,
            Node::TypeArray { .. } => NodeKind::TypeArray,
            Node::TypeFunction { .. } => NodeKind::TypeFunction,
            Node::DeclarationUnion { .. } => NodeKind::DeclarationUnion,
            Node::DeclarationStructure { .. } => NodeKind::DeclarationStructure,
            Node::DeclarationProperty { .. } => NodeKind::DeclarationProperty,
            Node::DeclarationInterface { .. } => NodeKind::DeclarationInterface,
            Node::DeclarationFunctionArgument { .. } => NodeKind::DeclarationFunctionArgument,
            Node::DeclarationFunction { .. } => NodeKind::DeclarationFunction,
            Node::DeclarationAssignment { .. } => NodeKind::DeclarationAssignment,
            Node::DeclarationBlock { .. } => NodeKind::DeclarationBlock,
            Node::StatementReturn { .. } => NodeKind::StatementReturn,
            Node::StatementIfConditionalClause { .. } => NodeKind::StatementIfConditionalClause,
            Node::StatementIf { .. } => NodeKind::StatementIf,
            Node::StatementWhile { .. } => NodeKind::StatementWhile,
            Node::StatementBlock { .. } => NodeKind::StatementBlock,
            Node::ValueBool { .. } => NodeKind::ValueBool,
            Node::ValueInt { .. } => NodeKind::ValueInt,
            Node::ValueFloat { .. } => NodeKind::ValueFloat,
            Node::ValueCharacter { .. } => NodeKind::ValueCharacter,
            Node::ValueString { .. } => NodeKind::ValueString,
            Node::ValueArray { .. } => NodeKind::ValueArray,
            Node::ValueArrayRepeated { .. } => NodeKind::ValueArrayRepeated,
            Node::ValueStructure { .. } => NodeKind::ValueStructure,
            Node::ValueSymbol { .. } => NodeKind::ValueSymbol,
            Node::ValueCallKeywordArgument { .. } => NodeKind::ValueCallKeywordArgument,
            Node::ValueCall { .. } => NodeKind::ValueCall,
            Node::ValueCast { .. } => NodeKind::ValueCast,
            Node::ValueUnary { kind, .. } => *kind,
            Node::ValueBinary { kind, .. } => *kind,
        }
    }

    pub fn new_type_int(range: Range, unsigned: bool, bit_width: u8) -> Node {
        Node::TypeInt { range, unsigned, bit_width }
    }

    pub fn new_type_float(range: Range, bit_width: u8) -> Node {
        Node::TypeFloat { range, bit_width }
    }

    pub fn new_value_unary(range: Range, kind: NodeKind, operand: Node) -> Node {
        debug_assert!(kind.is_unary_operator());
        Node::ValueUnary { range, kind, operand: Box::new(operand) }
    }

    pub fn new_value_binary(range: Range, kind: NodeKind, left: Node, right: Node) -> Node {
        debug_assert!(kind.is_binary_operator());
        Node::ValueBinary { range, kind, left: Box::new(left), right: Box::new(right) }
    }

    /// The identifier a declaration node is keyed under in scope, or `None`
    /// if this node is not a declaration.
    pub fn declaration_name(&self) -> Option<&str> {
        match self {
            Node::DeclarationUnion { name, .. }
            | Node::DeclarationStructure { name, .. }
            | Node::DeclarationProperty { name, .. }
            | Node::DeclarationInterface { name, .. }
            | Node::DeclarationFunction { name, .. } => Some(name),
            Node::DeclarationFunctionArgument { property, .. } => property.declaration_name(),
            Node::DeclarationAssignment { property, .. } => property.declaration_name(),
            _ => None,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Node) -> bool {
        use Node::*;
        match (self, other) {
            (TypeVoid { .. }, TypeVoid { .. }) => true,
            (TypeBool { .. }, TypeBool { .. }) => true,
            (TypeInt { unsigned: u1, bit_width: w1, .. }, TypeInt { unsigned: u2, bit_width: w2, .. }) => {
                u1 == u2 && w1 == w2
            }
            (TypeFloat { bit_width: w1, .. }, TypeFloat { bit_width: w2, .. }) => w1 == w2,
            (TypeSymbol { name: n1, .. }, TypeSymbol { name: n2, .. }) => n1 == n2,
            (
                TypePointer { flags: f1, pointee: p1, .. },
                TypePointer { flags: f2, pointee: p2, .. },
            ) => f1 == f2 && eq_box_opt!(p1, p2),
            (
                TypeArray { length: l1, element: e1, .. },
                TypeArray { length: l2, element: e2, .. },
            ) => l1 == l2 && e1 == e2,
            (
                TypeFunction { args: a1, variadic_positional: vp1, variadic_keyword: vk1, return_type: r1, .. },
                TypeFunction { args: a2, variadic_positional: vp2, variadic_keyword: vk2, return_type: r2, .. },
            ) => a1 == a2 && eq_box_opt!(vp1, vp2) && eq_box_opt!(vk1, vk2) && eq_box_opt!(r1, r2),
            (
                DeclarationUnion { name: n1, props: p1, .. },
                DeclarationUnion { name: n2, props: p2, .. },
            ) => n1 == n2 && p1 == p2,
            (
                DeclarationStructure { name: n1, decls: d1, .. },
                DeclarationStructure { name: n2, decls: d2, .. },
            ) => n1 == n2 && d1 == d2,
            (
                DeclarationProperty { flags: f1, name: n1, property_type: t1, .. },
                DeclarationProperty { flags: f2, name: n2, property_type: t2, .. },
            ) => f1 == f2 && n1 == n2 && eq_box_opt!(t1, t2),
            (
                DeclarationInterface { flags: f1, name: n1, extends: e1, decls: d1, .. },
                DeclarationInterface { flags: f2, name: n2, extends: e2, decls: d2, .. },
            ) => f1 == f2 && n1 == n2 && e1 == e2 && d1 == d2,
            (
                DeclarationFunctionArgument { flags: f1, property: p1, default: d1, .. },
                DeclarationFunctionArgument { flags: f2, property: p2, default: d2, .. },
            ) => f1 == f2 && p1 == p2 && eq_box_opt!(d1, d2),
            (
                DeclarationFunction { flags: f1, name: n1, fn_type: t1, body: b1, .. },
                DeclarationFunction { flags: f2, name: n2, fn_type: t2, body: b2, .. },
            ) => f1 == f2 && n1 == n2 && t1 == t2 && b1 == b2,
            (
                DeclarationAssignment { property: p1, value: v1, .. },
                DeclarationAssignment { property: p2, value: v2, .. },
            ) => p1 == p2 && v1 == v2,
            (DeclarationBlock { decls: d1, .. }, DeclarationBlock { decls: d2, .. }) => d1 == d2,
            (StatementReturn { value: v1, .. }, StatementReturn { value: v2, .. }) => eq_box_opt!(v1, v2),
            (
                StatementIfConditionalClause { condition: c1, body: b1, .. },
                StatementIfConditionalClause { condition: c2, body: b2, .. },
            ) => c1 == c2 && b1 == b2,
            (
                StatementIf { clauses: c1, else_body: e1, .. },
                StatementIf { clauses: c2, else_body: e2, .. },
            ) => c1 == c2 && e1 == e2,
            (
                StatementWhile { condition: c1, body: b1, .. },
                StatementWhile { condition: c2, body: b2, .. },
            ) => c1 == c2 && b1 == b2,
            (StatementBlock { stmts: s1, .. }, StatementBlock { stmts: s2, .. }) => s1 == s2,
            (ValueBool { value: v1, .. }, ValueBool { value: v2, .. }) => v1 == v2,
            (
                ValueInt { value_type: t1, value: v1, .. },
                ValueInt { value_type: t2, value: v2, .. },
            ) => t1 == t2 && v1 == v2,
            (
                ValueFloat { bit_width: w1, value: v1, .. },
                ValueFloat { bit_width: w2, value: v2, .. },
            ) => w1 == w2 && v1 == v2,
            (ValueCharacter { value: v1, .. }, ValueCharacter { value: v2, .. }) => v1 == v2,
            (ValueString { value: v1, .. }, ValueString { value: v2, .. }) => v1 == v2,
            (ValueArray { elements: e1, .. }, ValueArray { elements: e2, .. }) => e1 == e2,
            (
                ValueArrayRepeated { value: v1, length: l1, .. },
                ValueArrayRepeated { value: v2, length: l2, .. },
            ) => v1 == v2 && l1 == l2,
            (ValueStructure { fields: f1, .. }, ValueStructure { fields: f2, .. }) => f1 == f2,
            (ValueSymbol { name: n1, .. }, ValueSymbol { name: n2, .. }) => n1 == n2,
            (
                ValueCallKeywordArgument { name: n1, value: v1, .. },
                ValueCallKeywordArgument { name: n2, value: v2, .. },
            ) => n1 == n2 && v1 == v2,
            (
                ValueCall { callee: c1, args: a1, kw_args: k1, .. },
                ValueCall { callee: c2, args: a2, kw_args: k2, .. },
            ) => c1 == c2 && a1 == a2 && k1 == k2,
            (
                ValueCast { value: v1, cast_type: t1, .. },
                ValueCast { value: v2, cast_type: t2, .. },
            ) => v1 == v2 && t1 == t2,
            (
                ValueUnary { kind: k1, operand: o1, .. },
                ValueUnary { kind: k2, operand: o2, .. },
            ) => k1 == k2 && o1 == o2,
            (
                ValueBinary { kind: k1, left: l1, right: r1, .. },
                ValueBinary { kind: k2, left: l2, right: r2, .. },
            ) => k1 == k2 && l1 == l2 && r1 == r2,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::Location;

    fn range_a() -> Range {
        Range::new(Location::new(None, 1, 1, 0), 3)
    }

    fn range_b() -> Range {
        Range::new(Location::new(None, 2, 5, 10), 7)
    }

    #[test]
    fn compare_ignores_source_range() {
        let a = Node::TypeInt { range: range_a(), unsigned: false, bit_width: 32 };
        let b = Node::TypeInt { range: range_b(), unsigned: false, bit_width: 32 };
        assert_eq!(a, b);
    }

    #[test]
    fn compare_distinguishes_kind_payload() {
        let a = Node::TypeInt { range: range_a(), unsigned: false, bit_width: 32 };
        let b = Node::TypeInt { range: range_a(), unsigned: true, bit_width: 32 };
        assert_ne!(a, b);
    }

    #[test]
    fn clone_produces_structurally_equal_disjoint_tree() {
        let original = Node::ValueArray {
            range: range_a(),
            elements: vec![
                Node::ValueBool { range: range_a(), value: false },
                Node::ValueBool { range: range_b(), value: true },
            ],
        };
        let cloned = original.clone();
        assert_eq!(original, cloned);
        // Disjoint allocations: dropping one doesn't affect the other.
        drop(original);
        assert_eq!(
            cloned,
            Node::ValueArray {
                range: range_a(),
                elements: vec![
                    Node::ValueBool { range: range_a(), value: false },
                    Node::ValueBool { range: range_b(), value: true },
                ],
            }
        );
    }

    #[test]
    fn declaration_name_forwards_through_function_argument_to_property() {
        let property = Node::DeclarationProperty {
            range: range_a(),
            flags: PropertyFlags(PropertyFlags::NON_OPTIONAL),
            name: "count".to_string(),
            property_type: None,
        };
        let arg = Node::DeclarationFunctionArgument {
            range: range_a(),
            flags: FunctionArgumentFlags::default(),
            property: Box::new(property),
            default: None,
        };
        assert_eq!(arg.declaration_name(), Some("count"));
    }

    #[test]
    fn kind_of_value_binary_is_embedded_operator_not_a_catch_all() {
        let node = Node::new_value_binary(
            range_a(),
            NodeKind::ValueAdd,
            Node::ValueBool { range: range_a(), value: true },
            Node::ValueBool { range: range_a(), value: false },
        );
        assert_eq!(node.kind(), NodeKind::ValueAdd);
    }
}
