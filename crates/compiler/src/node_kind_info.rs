//! The process-wide node-kind metadata table (§3, §9): for every [`NodeKind`],
//! a printable name, capability flags, and (for value kinds that are
//! operators) the operator's surface-syntax symbol.
//!
//! Per-kind *operations* — debug/formatted printing, type resolution — are
//! implemented as ordinary `match` dispatch in [`crate::printer`] and
//! [`crate::type_resolve`] rather than as function pointers stored in this
//! table: the bodies are ≤70-way matches already in one place, cheap to call,
//! and a table of closures would add indirection without adding anything a
//! reader could not get from following the match arm. This mirrors the
//! decision already recorded for clone/compare/declaration-name in
//! [`crate::ast`]. What the table *does* own — name, flags, operator symbol —
//! genuinely is per-kind static data, so those live here. The boolean
//! `has_debug_printer`/`has_type_resolver` fields exist purely so the §8
//! exhaustiveness tests have something to assert against without duplicating
//! the match arms of the printer/resolver modules.
//!
//! The visitor's "acceptor" is not listed here either: [`crate::visitor`]'s
//! `accept_children` is itself the per-kind dispatch table for traversal,
//! already indexed by `match` on `Node`, which plays the role the
//! specification assigns to a stored visitor-acceptor pointer.

use crate::kind::{NodeKind, NodeKindFlags};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy)]
pub struct NodeKindInfo {
    pub kind: NodeKind,
    pub name: &'static str,
    pub flags: NodeKindFlags,
    pub operator_symbol: Option<&'static str>,
    /// Every non-primary kind has one (§8); primaries print only their keyword.
    pub has_debug_printer: bool,
    /// Every declaration (except `declaration-block`, a container with no
    /// name or type of its own) and every value (except `value-structure`,
    /// which is contextually typed) has one.
    pub has_type_resolver: bool,
}

macro_rules! flags {
    ($($bit:ident)|*) => {
        NodeKindFlags::new(0 $(| NodeKindFlags::$bit)*)
    };
}

fn build_table() -> Vec<NodeKindInfo> {
    use NodeKind::*;

    let mut table = Vec::with_capacity(NodeKind::ALL.len());
    macro_rules! entry {
        ($kind:expr, $name:expr, $flags:expr) => {
            table.push(NodeKindInfo {
                kind: $kind,
                name: $name,
                flags: $flags,
                operator_symbol: None,
                has_debug_printer: !$flags.contains(NodeKindFlags::IS_TYPE_PRIMARY),
                has_type_resolver: false,
            });
        };
    }
    macro_rules! operator_entry {
        ($kind:expr, $name:expr, $symbol:expr, $flags:expr) => {
            table.push(NodeKindInfo {
                kind: $kind,
                name: $name,
                flags: $flags,
                operator_symbol: Some($symbol),
                has_debug_printer: true,
                has_type_resolver: true,
            });
        };
    }

    entry!(TypeVoid, "type-void", flags!(IS_TYPE | IS_TYPE_PRIMARY));
    entry!(TypeBool, "type-bool", flags!(IS_TYPE | IS_TYPE_PRIMARY));
    entry!(TypeInt, "type-int", flags!(IS_TYPE | IS_TYPE_PRIMARY));
    entry!(TypeFloat, "type-float", flags!(IS_TYPE | IS_TYPE_PRIMARY));
    entry!(TypeSymbol, "type-symbol", flags!(IS_TYPE));
    entry!(TypePointer, "type-pointer", flags!(IS_TYPE | HAS_CHILDREN));
    entry!(TypeArray, "type-array", flags!(IS_TYPE | HAS_CHILDREN));
    entry!(TypeFunction, "type-function", flags!(IS_TYPE | HAS_CHILDREN));

    entry!(DeclarationUnion, "declaration-union", flags!(IS_DECLARATION | HAS_CHILDREN));
    entry!(DeclarationStructure, "declaration-structure", flags!(IS_DECLARATION | HAS_CHILDREN));
    entry!(DeclarationProperty, "declaration-property", flags!(IS_DECLARATION | HAS_CHILDREN));
    entry!(DeclarationInterface, "declaration-interface", flags!(IS_DECLARATION | HAS_CHILDREN));
    entry!(
        DeclarationFunctionArgument,
        "declaration-function-argument",
        flags!(IS_DECLARATION | HAS_CHILDREN)
    );
    entry!(DeclarationFunction, "declaration-function", flags!(IS_DECLARATION | HAS_CHILDREN));
    entry!(DeclarationAssignment, "declaration-assignment", flags!(IS_DECLARATION | HAS_CHILDREN));
    entry!(DeclarationBlock, "declaration-block", flags!(IS_DECLARATION | HAS_CHILDREN));

    entry!(StatementReturn, "statement-return", flags!(IS_STATEMENT | HAS_CHILDREN));
    entry!(
        StatementIfConditionalClause,
        "statement-if-conditional-clause",
        flags!(IS_STATEMENT | HAS_CHILDREN)
    );
    entry!(StatementIf, "statement-if", flags!(IS_STATEMENT | HAS_CHILDREN));
    entry!(StatementWhile, "statement-while", flags!(IS_STATEMENT | HAS_CHILDREN));
    entry!(StatementBlock, "statement-block", flags!(IS_STATEMENT | HAS_CHILDREN));

    entry!(ValueBool, "value-bool", flags!(IS_VALUE));
    entry!(ValueInt, "value-int", flags!(IS_VALUE | HAS_CHILDREN));
    entry!(ValueFloat, "value-float", flags!(IS_VALUE));
    entry!(ValueCharacter, "value-character", flags!(IS_VALUE));
    entry!(ValueString, "value-string", flags!(IS_VALUE));
    entry!(ValueArray, "value-array", flags!(IS_VALUE | HAS_CHILDREN));
    entry!(ValueArrayRepeated, "value-array-repeated", flags!(IS_VALUE | HAS_CHILDREN));
    // value-structure: HAS_CHILDREN but deliberately has_type_resolver = false (§4.1).
    table.push(NodeKindInfo {
        kind: ValueStructure,
        name: "value-structure",
        flags: flags!(IS_VALUE | HAS_CHILDREN),
        operator_symbol: None,
        has_debug_printer: true,
        has_type_resolver: false,
    });
    entry!(ValueSymbol, "value-symbol", flags!(IS_VALUE));
    entry!(ValueCallKeywordArgument, "value-call-keyword-argument", flags!(IS_VALUE | HAS_CHILDREN));
    entry!(ValueCall, "value-call", flags!(IS_VALUE | HAS_CHILDREN));
    entry!(ValueCast, "value-cast", flags!(IS_VALUE | HAS_CHILDREN));

    let unary = flags!(IS_VALUE | IS_VALUE_UNARY | HAS_CHILDREN);
    operator_entry!(ValueNegate, "value-negate", "-", unary);
    operator_entry!(ValueBitNot, "value-bit-not", "~", unary);
    operator_entry!(ValueLogicalNot, "value-logical-not", "!", unary);
    operator_entry!(ValueDereference, "value-dereference", "*", unary);
    operator_entry!(ValueGetAddress, "value-get-address", "&", unary);
    operator_entry!(ValueIncrement, "value-increment", "++", unary);
    operator_entry!(ValueDecrement, "value-decrement", "--", unary);

    let binary = flags!(IS_VALUE | IS_VALUE_BINARY | HAS_CHILDREN);
    operator_entry!(ValueEquals, "value-equals", "==", binary);
    operator_entry!(ValueNotEquals, "value-not-equals", "!=", binary);
    operator_entry!(ValueLessThan, "value-less-than", "<", binary);
    operator_entry!(ValueLessThanOrEqualTo, "value-less-than-or-equal-to", "<=", binary);
    operator_entry!(ValueGreaterThan, "value-greater-than", ">", binary);
    operator_entry!(ValueGreaterThanOrEqualTo, "value-greater-than-or-equal-to", ">=", binary);

    operator_entry!(ValueAdd, "value-add", "+", binary);
    operator_entry!(ValueSubtract, "value-subtract", "-", binary);
    operator_entry!(ValueMultiply, "value-multiply", "*", binary);
    operator_entry!(ValueDivide, "value-divide", "/", binary);
    operator_entry!(ValueDivideInt, "value-divide-int", "//", binary);
    operator_entry!(ValueModulo, "value-modulo", "%", binary);
    operator_entry!(ValueExponentiate, "value-exponentiate", "**", binary);

    operator_entry!(ValueBitAnd, "value-bit-and", "&", binary);
    operator_entry!(ValueBitOr, "value-bit-or", "|", binary);
    operator_entry!(ValueBitXor, "value-bit-xor", "^", binary);
    operator_entry!(ValueBitShiftLeft, "value-bit-shift-left", "<<", binary);
    operator_entry!(ValueBitShiftRight, "value-bit-shift-right", ">>", binary);

    operator_entry!(ValueLogicalAnd, "value-logical-and", "&&", binary);
    operator_entry!(ValueLogicalOr, "value-logical-or", "||", binary);

    operator_entry!(ValueAccess, "value-access", ".", binary);

    operator_entry!(ValueAssign, "value-assign", "=", binary);
    operator_entry!(ValueAddAssign, "value-add-assign", "+=", binary);
    operator_entry!(ValueSubtractAssign, "value-subtract-assign", "-=", binary);
    operator_entry!(ValueMultiplyAssign, "value-multiply-assign", "*=", binary);
    operator_entry!(ValueDivideAssign, "value-divide-assign", "/=", binary);
    operator_entry!(ValueDivideIntAssign, "value-divide-int-assign", "//=", binary);
    operator_entry!(ValueModuloAssign, "value-modulo-assign", "%=", binary);
    operator_entry!(ValueExponentiateAssign, "value-exponentiate-assign", "**=", binary);
    operator_entry!(ValueBitAndAssign, "value-bit-and-assign", "&=", binary);
    operator_entry!(ValueBitOrAssign, "value-bit-or-assign", "|=", binary);
    operator_entry!(ValueBitXorAssign, "value-bit-xor-assign", "^=", binary);
    operator_entry!(ValueBitShiftLeftAssign, "value-bit-shift-left-assign", "<<=", binary);
    operator_entry!(ValueBitShiftRightAssign, "value-bit-shift-right-assign", ">>=", binary);
    operator_entry!(ValueLogicalAndAssign, "value-logical-and-assign", "&&=", binary);
    operator_entry!(ValueLogicalOrAssign, "value-logical-or-assign", "||=", binary);

    // value-call-keyword-argument, value-call, value-cast, value-bool,
    // value-int, value-float, value-character, value-string, value-array,
    // value-array-repeated, value-symbol all resolve; mark them now that the
    // Value entries above have been pushed with has_type_resolver = false
    // by default via `entry!`.
    for info in table.iter_mut() {
        if info.flags.contains(NodeKindFlags::IS_VALUE) && info.kind != ValueStructure {
            info.has_type_resolver = true;
        }
        if info.flags.contains(NodeKindFlags::IS_DECLARATION) && info.kind != DeclarationBlock {
            info.has_type_resolver = true;
        }
    }

    table
}

fn table() -> &'static [NodeKindInfo] {
    static TABLE: OnceLock<Vec<NodeKindInfo>> = OnceLock::new();
    TABLE.get_or_init(build_table)
}

/// Looks up the metadata entry for a kind. Panics if the table is malformed
/// (would indicate a bug in `build_table`, not a reachable runtime state).
pub fn get(kind: NodeKind) -> &'static NodeKindInfo {
    table()
        .iter()
        .find(|info| info.kind == kind)
        .unwrap_or_else(|| panic!("no metadata registered for node kind {kind:?}"))
}
