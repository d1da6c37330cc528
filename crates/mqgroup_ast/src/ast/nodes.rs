use std::fmt;

use super::{Node, NodeData, NodeRef};
use crate::parse::{self, ParseError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
  Root,
  AtRule,
  Rule,
  Declaration,
  Comment,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AtRuleData {
  pub name: String,
  pub params: String,
  /// `@media x {}` has a block, `@import "x";` does not.
  pub has_block: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleData {
  pub selector: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeclarationData {
  pub prop: String,
  pub value: String,
  pub important: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentData {
  pub text: String,
  /// Whitespace kept between `/*` and the text.
  pub left: String,
  /// Whitespace kept between the text and `*/`.
  pub right: String,
}

impl Default for CommentData {
  fn default() -> Self {
    Self {
      text: String::new(),
      left: " ".into(),
      right: " ".into(),
    }
  }
}

/// Block at-rule such as `@media (min-width: 500px) { ... }`.
pub fn at_rule(name: impl Into<String>, params: impl Into<String>) -> NodeRef {
  Node::new(NodeData::AtRule(AtRuleData {
    name: name.into(),
    params: params.into(),
    has_block: true,
  }))
}

/// Statement at-rule such as `@import "theme.css";`.
pub fn at_rule_statement(name: impl Into<String>, params: impl Into<String>) -> NodeRef {
  Node::new(NodeData::AtRule(AtRuleData {
    name: name.into(),
    params: params.into(),
    has_block: false,
  }))
}

pub fn rule(selector: impl Into<String>) -> NodeRef {
  Node::new(NodeData::Rule(RuleData {
    selector: selector.into(),
  }))
}

pub fn decl(prop: impl Into<String>, value: impl Into<String>) -> NodeRef {
  Node::new(NodeData::Declaration(DeclarationData {
    prop: prop.into(),
    value: value.into(),
    important: false,
  }))
}

pub fn comment(text: impl Into<String>) -> NodeRef {
  Node::new(NodeData::Comment(CommentData {
    text: text.into(),
    ..CommentData::default()
  }))
}

/// Owning handle to the top of a stylesheet tree.
#[derive(Clone, Debug)]
pub struct Root {
  node: NodeRef,
}

impl Root {
  pub fn new() -> Self {
    Root {
      node: Node::new(NodeData::Root),
    }
  }

  pub fn parse(css: &str) -> Result<Self, ParseError> {
    parse::parse(css)
  }

  pub(crate) fn from_node(node: NodeRef) -> Self {
    Root { node }
  }

  pub fn raw(&self) -> &NodeRef {
    &self.node
  }

  /// Deep copy, useful when a caller needs to roll back a failed transform.
  pub fn deep_clone(&self) -> Self {
    Root::from_node(Node::clone_node(&self.node))
  }

  pub fn nodes(&self) -> Vec<NodeRef> {
    Node::children(&self.node)
  }

  pub fn first(&self) -> Option<NodeRef> {
    Node::first_child(&self.node)
  }

  pub fn last(&self) -> Option<NodeRef> {
    Node::last_child(&self.node)
  }

  pub fn is_empty(&self) -> bool {
    self.node.borrow().nodes.is_empty()
  }

  pub fn append(&self, child: NodeRef) {
    Node::append(&self.node, child);
  }

  pub fn walk_at_rules(&self, name: &str) -> Vec<NodeRef> {
    Node::walk_at_rules(&self.node, name)
  }

  pub fn to_css(&self) -> String {
    Node::to_css(&self.node)
  }
}

impl Default for Root {
  fn default() -> Self {
    Root::new()
  }
}

impl fmt::Display for Root {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_css())
  }
}
