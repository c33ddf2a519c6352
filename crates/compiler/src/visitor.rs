//! Generic tree traversal with per-kind handler lists and in-place mutation.
//!
//! Traversal is pre-order on enter, post-order on leave. `Parents` is the
//! ancestor chain, innermost first. Ancestor nodes are only ever read, never
//! mutated, while a descendant is being visited, so `Parents` holds raw
//! pointers into the tree rather than forcing every caller to thread
//! `Rc<RefCell<_>>` through an otherwise strictly-owned AST (see §9,
//! "Ownership with back-pointers", and §5's note that the scope and verifier
//! hold transient borrows that never outlive the tree).

use crate::ast::Node;
use crate::kind::NodeKind;
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorStatus {
    Ok,
    Skip,
    Stop,
}

/// The ancestor chain of the node currently being visited, innermost first.
pub struct Parents<'a> {
    stack: Vec<*const Node>,
    _marker: PhantomData<&'a Node>,
}

impl<'a> Parents<'a> {
    fn new() -> Self {
        Parents { stack: Vec::new(), _marker: PhantomData }
    }

    fn push(&mut self, node: &Node) {
        self.stack.push(node as *const Node);
    }

    fn pop(&mut self) {
        self.stack.pop();
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// The nearest ancestor, or `None` at the root.
    pub fn innermost(&self) -> Option<&'a Node> {
        self.stack.last().map(|ptr| unsafe { &**ptr })
    }

    /// All ancestors, innermost first.
    pub fn iter(&self) -> impl Iterator<Item = &'a Node> + '_ {
        self.stack.iter().rev().map(|ptr| unsafe { &**ptr })
    }

    /// The nearest ancestor matching a predicate, e.g. the enclosing function
    /// declaration for a `return` statement.
    pub fn find<F: Fn(&Node) -> bool>(&self, predicate: F) -> Option<&'a Node> {
        self.iter().find(|node| predicate(node))
    }
}

type Handler<U> = Box<dyn FnMut(&mut Node, &Parents, &mut U) -> VisitorStatus>;

struct HandlerEntry<U> {
    on_enter: Option<Handler<U>>,
    on_leave: Option<Handler<U>>,
}

/// A visitor: an array indexed by node kind, each slot holding an ordered
/// list of handlers.
pub struct Visitor<U> {
    handlers: Vec<Vec<HandlerEntry<U>>>,
}

impl<U> Default for Visitor<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> Visitor<U> {
    pub fn new() -> Self {
        Visitor { handlers: (0..NodeKind::ALL.len()).map(|_| Vec::new()).collect() }
    }

    pub fn add_handler(
        &mut self,
        kind: NodeKind,
        on_enter: Option<Handler<U>>,
        on_leave: Option<Handler<U>>,
    ) {
        self.handlers[kind as usize].push(HandlerEntry { on_enter, on_leave });
    }

    pub fn on_enter<F>(&mut self, kind: NodeKind, f: F)
    where
        F: FnMut(&mut Node, &Parents, &mut U) -> VisitorStatus + 'static,
    {
        self.add_handler(kind, Some(Box::new(f)), None);
    }

    pub fn on_leave<F>(&mut self, kind: NodeKind, f: F)
    where
        F: FnMut(&mut Node, &Parents, &mut U) -> VisitorStatus + 'static,
    {
        self.add_handler(kind, None, Some(Box::new(f)));
    }

    fn handle_event(
        &mut self,
        node: &mut Node,
        parents: &Parents,
        user_data: &mut U,
        is_enter: bool,
    ) -> VisitorStatus {
        let original_kind = node.kind();
        let entries = &mut self.handlers[original_kind as usize];
        for entry in entries.iter_mut() {
            if node.kind() != original_kind {
                tracing::warn!(
                    from = %original_kind,
                    to = %node.kind(),
                    "visitor handler replaced node with a different kind; skipping remaining handlers for this event"
                );
                break;
            }
            let callback = if is_enter { entry.on_enter.as_mut() } else { entry.on_leave.as_mut() };
            if let Some(callback) = callback {
                let status = callback(node, parents, user_data);
                if status != VisitorStatus::Ok {
                    return status;
                }
            }
        }
        VisitorStatus::Ok
    }

    pub fn accept(&mut self, node: &mut Node, user_data: &mut U) -> VisitorStatus {
        let mut parents = Parents::new();
        self.accept_recursive(node, &mut parents, user_data)
    }

    fn accept_recursive(&mut self, node: &mut Node, parents: &mut Parents, user_data: &mut U) -> VisitorStatus {
        tracing::trace!(kind = %node.kind(), "entering node");

        let status = self.handle_event(node, parents, user_data, true);
        if status == VisitorStatus::Skip {
            return VisitorStatus::Ok;
        } else if status != VisitorStatus::Ok {
            return status;
        }

        parents.push(node);
        let status = accept_children(node, self, parents, user_data);
        parents.pop();

        if status == VisitorStatus::Skip {
            return VisitorStatus::Ok;
        } else if status != VisitorStatus::Ok {
            return status;
        }

        tracing::trace!(kind = %node.kind(), "leaving node");

        let status = self.handle_event(node, parents, user_data, false);
        if status == VisitorStatus::Stop {
            return status;
        }
        VisitorStatus::Ok
    }
}

fn accept_list<U>(
    visitor: &mut Visitor<U>,
    list: &mut [Node],
    parents: &mut Parents,
    user_data: &mut U,
) -> VisitorStatus {
    for item in list.iter_mut() {
        let status = visitor.accept_recursive(item, parents, user_data);
        if status != VisitorStatus::Ok {
            return status;
        }
    }
    VisitorStatus::Ok
}

fn accept_opt<U>(
    visitor: &mut Visitor<U>,
    opt: &mut Option<Box<Node>>,
    parents: &mut Parents,
    user_data: &mut U,
) -> VisitorStatus {
    match opt {
        Some(node) => visitor.accept_recursive(node, parents, user_data),
        None => VisitorStatus::Ok,
    }
}

fn accept_opt_list<U>(
    visitor: &mut Visitor<U>,
    opt: &mut Option<Vec<Node>>,
    parents: &mut Parents,
    user_data: &mut U,
) -> VisitorStatus {
    match opt {
        Some(list) => accept_list(visitor, list, parents, user_data),
        None => VisitorStatus::Ok,
    }
}

/// Dispatches to each child slot of `node`, threading the updated `parents`.
/// Shared across every `HasChildren` kind; nodes without children fall
/// through to the default arm and return `Ok` without descending.
fn accept_children<U>(
    node: &mut Node,
    visitor: &mut Visitor<U>,
    parents: &mut Parents,
    user_data: &mut U,
) -> VisitorStatus {
    match node {
        Node::TypeVoid { .. }
        | Node::TypeBool { .. }
        | Node::TypeInt { .. }
        | Node::TypeFloat { .. }
        | Node::TypeSymbol { .. }
        | Node::ValueBool { .. }
        | Node::ValueCharacter { .. }
        | Node::ValueString { .. }
        | Node::ValueSymbol { .. } => VisitorStatus::Ok,

        Node::TypePointer { pointee, .. } => accept_opt(visitor, pointee, parents, user_data),
        Node::TypeArray { length, element, .. } => {
            let status = visitor.accept_recursive(length, parents, user_data);
            if status != VisitorStatus::Ok {
                return status;
            }
            visitor.accept_recursive(element, parents, user_data)
        }
        Node::TypeFunction { args, variadic_positional, variadic_keyword, return_type, .. } => {
            let status = accept_list(visitor, args, parents, user_data);
            if status != VisitorStatus::Ok {
                return status;
            }
            let status = accept_opt(visitor, variadic_positional, parents, user_data);
            if status != VisitorStatus::Ok {
                return status;
            }
            let status = accept_opt(visitor, variadic_keyword, parents, user_data);
            if status != VisitorStatus::Ok {
                return status;
            }
            accept_opt(visitor, return_type, parents, user_data)
        }

        Node::DeclarationUnion { props, .. } => accept_list(visitor, props, parents, user_data),
        Node::DeclarationStructure { decls, .. } => accept_list(visitor, decls, parents, user_data),
        Node::DeclarationProperty { property_type, .. } => accept_opt(visitor, property_type, parents, user_data),
        Node::DeclarationInterface { extends, decls, .. } => {
            let status = accept_list(visitor, extends, parents, user_data);
            if status != VisitorStatus::Ok {
                return status;
            }
            accept_list(visitor, decls, parents, user_data)
        }
        Node::DeclarationFunctionArgument { property, default, .. } => {
            let status = visitor.accept_recursive(property, parents, user_data);
            if status != VisitorStatus::Ok {
                return status;
            }
            accept_opt(visitor, default, parents, user_data)
        }
        Node::DeclarationFunction { fn_type, body, .. } => {
            let status = visitor.accept_recursive(fn_type, parents, user_data);
            if status != VisitorStatus::Ok {
                return status;
            }
            accept_opt_list(visitor, body, parents, user_data)
        }
        Node::DeclarationAssignment { property, value, .. } => {
            let status = visitor.accept_recursive(property, parents, user_data);
            if status != VisitorStatus::Ok {
                return status;
            }
            visitor.accept_recursive(value, parents, user_data)
        }
        Node::DeclarationBlock { decls, .. } => accept_list(visitor, decls, parents, user_data),

        Node::StatementReturn { value, .. } => accept_opt(visitor, value, parents, user_data),
        Node::StatementIfConditionalClause { condition, body, .. } => {
            let status = visitor.accept_recursive(condition, parents, user_data);
            if status != VisitorStatus::Ok {
                return status;
            }
            accept_list(visitor, body, parents, user_data)
        }
        Node::StatementIf { clauses, else_body, .. } => {
            let status = accept_list(visitor, clauses, parents, user_data);
            if status != VisitorStatus::Ok {
                return status;
            }
            accept_opt_list(visitor, else_body, parents, user_data)
        }
        Node::StatementWhile { condition, body, .. } => {
            let status = visitor.accept_recursive(condition, parents, user_data);
            if status != VisitorStatus::Ok {
                return status;
            }
            accept_list(visitor, body, parents, user_data)
        }
        Node::StatementBlock { stmts, .. } => accept_list(visitor, stmts, parents, user_data),

        Node::ValueArray { elements, .. } => accept_list(visitor, elements, parents, user_data),
        Node::ValueArrayRepeated { value, .. } => visitor.accept_recursive(value, parents, user_data),
        Node::ValueStructure { fields, .. } => accept_list(visitor, fields, parents, user_data),
        Node::ValueCallKeywordArgument { value, .. } => visitor.accept_recursive(value, parents, user_data),
        Node::ValueCall { callee, args, kw_args, .. } => {
            let status = visitor.accept_recursive(callee, parents, user_data);
            if status != VisitorStatus::Ok {
                return status;
            }
            let status = accept_list(visitor, args, parents, user_data);
            if status != VisitorStatus::Ok {
                return status;
            }
            accept_list(visitor, kw_args, parents, user_data)
        }
        Node::ValueCast { value, cast_type, .. } => {
            let status = visitor.accept_recursive(value, parents, user_data);
            if status != VisitorStatus::Ok {
                return status;
            }
            visitor.accept_recursive(cast_type, parents, user_data)
        }
        Node::ValueInt { value_type, .. } => visitor.accept_recursive(value_type, parents, user_data),
        Node::ValueFloat { .. } => VisitorStatus::Ok,
        Node::ValueUnary { operand, .. } => visitor.accept_recursive(operand, parents, user_data),
        Node::ValueBinary { left, right, .. } => {
            let status = visitor.accept_recursive(left, parents, user_data);
            if status != VisitorStatus::Ok {
                return status;
            }
            visitor.accept_recursive(right, parents, user_data)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::{Location, Range};

    fn range() -> Range {
        Range::new(Location::new(None, 1, 1, 0), 1)
    }

    fn sample_tree() -> Node {
        Node::ValueArray {
            range: range(),
            elements: vec![
                Node::ValueBool { range: range(), value: false },
                Node::ValueBool { range: range(), value: true },
            ],
        }
    }

    #[test]
    fn empty_visitor_leaves_tree_unchanged() {
        let mut tree = sample_tree();
        let original = tree.clone();
        let mut visitor: Visitor<()> = Visitor::new();
        let status = visitor.accept(&mut tree, &mut ());
        assert_eq!(status, VisitorStatus::Ok);
        assert_eq!(tree, original);
    }

    #[test]
    fn replacing_a_leaf_with_a_different_kind_is_reflected_after_accept() {
        let mut tree = sample_tree();
        let mut visitor: Visitor<()> = Visitor::new();
        visitor.on_enter(NodeKind::ValueBool, |node, _parents, _| {
            if let Node::ValueBool { value: false, .. } = node {
                *node = Node::ValueString { range: range(), value: "was false".to_string() };
            }
            VisitorStatus::Ok
        });
        visitor.accept(&mut tree, &mut ());
        match &tree {
            Node::ValueArray { elements, .. } => {
                assert!(matches!(elements[0], Node::ValueString { .. }));
                assert!(matches!(elements[1], Node::ValueBool { value: true, .. }));
            }
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn skip_from_enter_prevents_children_and_leave() {
        let mut tree = sample_tree();
        let mut visitor: Visitor<Vec<&'static str>> = Visitor::new();
        visitor.on_enter(NodeKind::ValueArray, |_, _, log| {
            log.push("enter-array");
            VisitorStatus::Skip
        });
        visitor.on_leave(NodeKind::ValueArray, |_, _, log| {
            log.push("leave-array");
            VisitorStatus::Ok
        });
        visitor.on_enter(NodeKind::ValueBool, |_, _, log| {
            log.push("enter-bool");
            VisitorStatus::Ok
        });
        let mut log = Vec::new();
        visitor.accept(&mut tree, &mut log);
        assert_eq!(log, vec!["enter-array"]);
    }

    #[test]
    fn stop_aborts_remaining_traversal() {
        let mut tree = sample_tree();
        let mut visitor: Visitor<Vec<&'static str>> = Visitor::new();
        visitor.on_enter(NodeKind::ValueArray, |_, _, log| {
            log.push("enter-array");
            VisitorStatus::Ok
        });
        visitor.on_enter(NodeKind::ValueBool, |node, _, log| {
            log.push("enter-bool");
            if let Node::ValueBool { value: false, .. } = node {
                VisitorStatus::Stop
            } else {
                VisitorStatus::Ok
            }
        });
        let mut log = Vec::new();
        let status = visitor.accept(&mut tree, &mut log);
        assert_eq!(status, VisitorStatus::Stop);
        assert_eq!(log, vec!["enter-array", "enter-bool"]);
    }

    #[test]
    fn setting_node_to_null_like_placeholder_preserves_list_length() {
        // Rust's Node has no null variant; the closest analogue the type
        // system allows is replacing an element in place, which this test
        // exercises to confirm the list's length is never changed by a
        // handler (only element identity changes).
        let mut tree = sample_tree();
        let mut visitor: Visitor<()> = Visitor::new();
        visitor.on_enter(NodeKind::ValueBool, |node, _, _| {
            *node = Node::ValueBool { range: range(), value: false };
            VisitorStatus::Ok
        });
        visitor.accept(&mut tree, &mut ());
        match &tree {
            Node::ValueArray { elements, .. } => assert_eq!(elements.len(), 2),
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn parents_chain_is_innermost_first() {
        let mut tree = sample_tree();
        let mut visitor: Visitor<Vec<NodeKind>> = Visitor::new();
        visitor.on_enter(NodeKind::ValueBool, |_, parents, seen| {
            seen.push(parents.innermost().map(|n| n.kind()).unwrap());
            VisitorStatus::Ok
        });
        let mut seen = Vec::new();
        visitor.accept(&mut tree, &mut seen);
        assert_eq!(seen, vec![NodeKind::ValueArray, NodeKind::ValueArray]);
    }
}
