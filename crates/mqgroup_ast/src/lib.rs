//! A small PostCSS-shaped stylesheet tree.
//!
//! Nodes are shared `Rc<RefCell<Node>>` handles with weak parent links, so
//! transforms can detach, clone and re-insert nodes anywhere in the tree while
//! holding references to them.

pub mod ast;
pub mod list;
pub mod parse;
pub mod processor;
pub mod stringifier;

pub use ast::nodes::{at_rule, at_rule_statement, comment, decl, rule};
pub use ast::{
  AtRuleData, CommentData, DeclarationData, Node, NodeData, NodeId, NodeKind, NodeRef, Position,
  Root, RuleData, WeakNodeRef,
};
pub use list::{comma, space, split};
pub use parse::{parse, ParseError};
pub use processor::{Plugin, Processor};
pub use stringifier::stringify;
