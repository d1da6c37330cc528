use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::stringifier;

pub mod nodes;

pub use nodes::{AtRuleData, CommentData, DeclarationData, NodeKind, Root, RuleData};

/// Shared pointer to a node in the stylesheet tree.
pub type NodeRef = Rc<RefCell<Node>>;

/// Weak pointer used for parent back-references so the tree has no cycles.
pub type WeakNodeRef = Weak<RefCell<Node>>;

/// Identity of a node, stable for as long as the node is alive.
///
/// Transforms that need per-node bookkeeping key their own tables by this
/// instead of storing state on the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
  pub fn of(node: &NodeRef) -> Self {
    NodeId(Rc::as_ptr(node) as *const () as usize)
  }
}

/// 1-based line and column of a node's first character in the parsed input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
  pub line: u32,
  pub column: u32,
}

impl Position {
  pub fn new(line: u32, column: u32) -> Self {
    Self { line, column }
  }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.line, self.column)
  }
}

/// Strongly-typed payload stored inside each [`Node`].
#[derive(Clone, Debug)]
pub enum NodeData {
  Root,
  AtRule(AtRuleData),
  Rule(RuleData),
  Declaration(DeclarationData),
  Comment(CommentData),
}

impl NodeData {
  pub fn is_container(&self) -> bool {
    matches!(
      self,
      NodeData::Root | NodeData::AtRule(_) | NodeData::Rule(_)
    )
  }
}

#[derive(Debug)]
pub struct Node {
  pub data: NodeData,
  pub parent: Option<WeakNodeRef>,
  pub source: Option<Position>,
  pub nodes: Vec<NodeRef>,
}

impl Node {
  pub fn new(data: NodeData) -> NodeRef {
    Rc::new(RefCell::new(Self {
      data,
      parent: None,
      source: None,
      nodes: Vec::new(),
    }))
  }

  pub fn kind(&self) -> NodeKind {
    match &self.data {
      NodeData::Root => NodeKind::Root,
      NodeData::AtRule(_) => NodeKind::AtRule,
      NodeData::Rule(_) => NodeKind::Rule,
      NodeData::Declaration(_) => NodeKind::Declaration,
      NodeData::Comment(_) => NodeKind::Comment,
    }
  }

  pub fn type_name(&self) -> &'static str {
    match &self.data {
      NodeData::Root => "root",
      NodeData::AtRule(_) => "atrule",
      NodeData::Rule(_) => "rule",
      NodeData::Declaration(_) => "decl",
      NodeData::Comment(_) => "comment",
    }
  }

  pub fn is_root(&self) -> bool {
    matches!(self.data, NodeData::Root)
  }

  pub fn as_at_rule(&self) -> Option<&AtRuleData> {
    match &self.data {
      NodeData::AtRule(data) => Some(data),
      _ => None,
    }
  }

  pub fn as_at_rule_mut(&mut self) -> Option<&mut AtRuleData> {
    match &mut self.data {
      NodeData::AtRule(data) => Some(data),
      _ => None,
    }
  }

  pub fn as_rule(&self) -> Option<&RuleData> {
    match &self.data {
      NodeData::Rule(data) => Some(data),
      _ => None,
    }
  }

  pub fn as_comment(&self) -> Option<&CommentData> {
    match &self.data {
      NodeData::Comment(data) => Some(data),
      _ => None,
    }
  }

  /// True for an at-rule with the given name (case-sensitive, like PostCSS).
  pub fn is_at_rule_named(&self, name: &str) -> bool {
    self.as_at_rule().is_some_and(|data| data.name == name)
  }

  pub fn parent(&self) -> Option<NodeRef> {
    self.parent.as_ref().and_then(Weak::upgrade)
  }

  pub fn parent_ref(node: &NodeRef) -> Option<NodeRef> {
    node.borrow().parent()
  }

  pub fn ptr_eq(a: &NodeRef, b: &NodeRef) -> bool {
    Rc::ptr_eq(a, b)
  }

  pub fn index_of(parent: &NodeRef, child: &NodeRef) -> Option<usize> {
    parent
      .borrow()
      .nodes
      .iter()
      .position(|node| Rc::ptr_eq(node, child))
  }

  fn parent_and_index(node: &NodeRef) -> Option<(NodeRef, usize)> {
    let parent = Node::parent_ref(node)?;
    let index = Node::index_of(&parent, node)?;
    Some((parent, index))
  }

  pub fn first_child(parent: &NodeRef) -> Option<NodeRef> {
    parent.borrow().nodes.first().cloned()
  }

  pub fn last_child(parent: &NodeRef) -> Option<NodeRef> {
    parent.borrow().nodes.last().cloned()
  }

  pub fn children(parent: &NodeRef) -> Vec<NodeRef> {
    parent.borrow().nodes.clone()
  }

  /// Detach `node` from its current parent, if any.
  pub fn remove_self(node: &NodeRef) {
    if let Some((parent, index)) = Node::parent_and_index(node) {
      Node::remove(&parent, index);
    }
  }

  /// Append `child` as the last child of `parent`, moving it out of any
  /// previous parent first.
  pub fn append(parent: &NodeRef, child: NodeRef) {
    Node::remove_self(&child);
    child.borrow_mut().parent = Some(Rc::downgrade(parent));
    let mut parent_mut = parent.borrow_mut();
    if let Some(at_rule) = parent_mut.as_at_rule_mut() {
      at_rule.has_block = true;
    }
    parent_mut.nodes.push(child);
  }

  pub fn insert(parent: &NodeRef, index: usize, child: NodeRef) {
    Node::remove_self(&child);
    child.borrow_mut().parent = Some(Rc::downgrade(parent));
    let mut parent_mut = parent.borrow_mut();
    let index = index.min(parent_mut.nodes.len());
    parent_mut.nodes.insert(index, child);
  }

  pub fn remove(parent: &NodeRef, index: usize) -> NodeRef {
    let child = parent.borrow_mut().nodes.remove(index);
    child.borrow_mut().parent = None;
    child
  }

  /// Take every child out of `parent`, returning them in order.
  pub fn remove_all(parent: &NodeRef) -> Vec<NodeRef> {
    let nodes = std::mem::take(&mut parent.borrow_mut().nodes);
    for child in &nodes {
      child.borrow_mut().parent = None;
    }
    nodes
  }

  /// Insert `new_nodes` in order right before `node` in its parent. Does
  /// nothing when `node` is detached.
  pub fn insert_before<I>(node: &NodeRef, new_nodes: I)
  where
    I: IntoIterator<Item = NodeRef>,
  {
    let Some(parent) = Node::parent_ref(node) else {
      return;
    };
    for child in new_nodes {
      Node::remove_self(&child);
      match Node::index_of(&parent, node) {
        Some(index) => Node::insert(&parent, index, child),
        None => return,
      }
    }
  }

  /// Replace `node` with its own children, keeping their order, and drop it.
  pub fn unwrap_children(node: &NodeRef) {
    if Node::parent_ref(node).is_none() {
      return;
    }
    let children = Node::remove_all(node);
    Node::insert_before(node, children);
    Node::remove_self(node);
  }

  /// Deep copy of `node` and its descendants. The copy is detached.
  pub fn clone_node(node: &NodeRef) -> NodeRef {
    let (data, source, children) = {
      let inner = node.borrow();
      (inner.data.clone(), inner.source, inner.nodes.clone())
    };

    let result = Node::new(data);
    result.borrow_mut().source = source;
    for child in children {
      let copy = Node::clone_node(&child);
      copy.borrow_mut().parent = Some(Rc::downgrade(&result));
      result.borrow_mut().nodes.push(copy);
    }
    result
  }

  /// Pre-order snapshot of every descendant of `node` accepted by
  /// `predicate`. The tree may be mutated freely while the result is used.
  pub fn collect<P>(node: &NodeRef, predicate: P) -> Vec<NodeRef>
  where
    P: Fn(&Node) -> bool,
  {
    let mut found = Vec::new();
    Node::collect_into(node, &predicate, &mut found);
    found
  }

  fn collect_into<P>(node: &NodeRef, predicate: &P, found: &mut Vec<NodeRef>)
  where
    P: Fn(&Node) -> bool,
  {
    for child in Node::children(node) {
      let (matches, is_container) = {
        let inner = child.borrow();
        (predicate(&*inner), inner.data.is_container())
      };
      if matches {
        found.push(child.clone());
      }
      if is_container {
        Node::collect_into(&child, predicate, found);
      }
    }
  }

  pub fn walk_at_rules(node: &NodeRef, name: &str) -> Vec<NodeRef> {
    Node::collect(node, |inner| inner.is_at_rule_named(name))
  }

  pub fn to_css(node: &NodeRef) -> String {
    stringifier::stringify(node)
  }
}

impl fmt::Display for Node {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.data {
      NodeData::Root => write!(f, "root"),
      NodeData::AtRule(data) if data.params.is_empty() => write!(f, "@{}", data.name),
      NodeData::AtRule(data) => write!(f, "@{} {}", data.name, data.params),
      NodeData::Rule(data) => write!(f, "{}", data.selector),
      NodeData::Declaration(data) => write!(f, "{}: {}", data.prop, data.value),
      NodeData::Comment(data) => write!(f, "/* {} */", data.text),
    }
  }
}
