use std::collections::HashMap;

use mqgroup_ast::{at_rule, Node, NodeId, NodeRef};

use crate::error::{MqGroupError, MqGroupResult};
use crate::options::MqGroupOptions;

pub type GroupId = u32;

/// The root scope always has this id; wrapper scopes count up from it.
pub const ROOT_GROUP_ID: GroupId = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupKind {
  Root,
  Wrapper,
}

/// Where a conditional block belongs.
#[derive(Clone, Debug)]
pub enum Resolution {
  RootGroup,
  WrapperGroup { id: GroupId, anchor: NodeRef },
  /// The block sits under an ancestor shape this transform does not handle.
  /// It stays where it is.
  TooDeep,
}

/// Classifies conditional blocks into scopes.
///
/// Group ids are memoized per anchor node in a table owned by the resolver,
/// so a resolver lives for exactly one transform run.
pub struct GroupResolver<'a> {
  options: &'a MqGroupOptions,
  block_name: &'a str,
  ids: HashMap<NodeId, GroupId>,
  next_id: GroupId,
}

impl<'a> GroupResolver<'a> {
  pub fn new(options: &'a MqGroupOptions, block_name: &'a str) -> Self {
    Self {
      options,
      block_name,
      ids: HashMap::new(),
      next_id: ROOT_GROUP_ID,
    }
  }

  pub fn resolve(&mut self, block: &NodeRef) -> MqGroupResult<Resolution> {
    let mut anchor: Option<NodeRef> = None;
    let mut intermediate: Option<NodeRef> = None;
    let mut parent = Node::parent_ref(block);
    let mut distance = 0usize;

    while let Some(current) = parent {
      distance += 1;
      let (is_root, is_wrapper) = {
        let inner = current.borrow();
        (inner.is_root(), self.options.is_wrapper(&inner))
      };

      if is_root || is_wrapper {
        if anchor.is_none() {
          anchor = Some(current.clone());
        } else if is_wrapper {
          return Err(MqGroupError::nested_wrapper(&current));
        }
      } else if distance == 1 && self.is_foreign_at_rule(&current) {
        intermediate = Some(current.clone());
      } else {
        return Ok(Resolution::TooDeep);
      }

      parent = Node::parent_ref(&current);
    }

    if let Some(intermediate) = intermediate {
      wrap_children(block, &intermediate);
    }

    match anchor {
      Some(anchor) if !anchor.borrow().is_root() => Ok(Resolution::WrapperGroup {
        id: self.group_id(&anchor),
        anchor,
      }),
      _ => Ok(Resolution::RootGroup),
    }
  }

  fn is_foreign_at_rule(&self, node: &NodeRef) -> bool {
    node
      .borrow()
      .as_at_rule()
      .is_some_and(|data| data.name != self.block_name)
  }

  fn group_id(&mut self, anchor: &NodeRef) -> GroupId {
    let next_id = &mut self.next_id;
    *self.ids.entry(NodeId::of(anchor)).or_insert_with(|| {
      *next_id += 1;
      *next_id
    })
  }
}

/// Move the children of `block` into a fresh copy of the at-rule it sits in,
/// so the nesting survives once `block` is hoisted out of that at-rule.
fn wrap_children(block: &NodeRef, intermediate: &NodeRef) {
  let Some(data) = intermediate.borrow().as_at_rule().cloned() else {
    return;
  };

  let wrapper = at_rule(data.name, data.params);
  for child in Node::remove_all(block) {
    Node::append(&wrapper, child);
  }
  Node::append(block, wrapper);
}

#[cfg(test)]
mod tests {
  use mqgroup_ast::{decl, rule, Root};
  use pretty_assertions::assert_eq;

  use super::*;

  fn media(root_or_parent: &NodeRef, params: &str) -> NodeRef {
    let node = at_rule("media", params);
    let body = rule(".a");
    Node::append(&body, decl("color", "red"));
    Node::append(&node, body);
    Node::append(root_or_parent, node.clone());
    node
  }

  #[test]
  fn top_level_block_belongs_to_root() {
    let root = Root::new();
    let block = media(root.raw(), "print");
    let options = MqGroupOptions::default();
    let mut resolver = GroupResolver::new(&options, "media");

    assert!(matches!(
      resolver.resolve(&block).unwrap(),
      Resolution::RootGroup
    ));
  }

  #[test]
  fn wrapper_ids_are_memoized_and_count_from_two() {
    let root = Root::new();
    let first = at_rule("mqgroup", "");
    let second = at_rule("mqgroup", "");
    root.append(first.clone());
    root.append(second.clone());
    let a = media(&first, "print");
    let b = media(&second, "print");
    let c = media(&first, "screen");

    let options = MqGroupOptions::default();
    let mut resolver = GroupResolver::new(&options, "media");
    let ids: Vec<GroupId> = [a, b, c]
      .iter()
      .map(|block| match resolver.resolve(block).unwrap() {
        Resolution::WrapperGroup { id, .. } => id,
        other => panic!("expected a wrapper group, got {other:?}"),
      })
      .collect();

    assert_eq!(ids, vec![2, 3, 2]);
  }

  #[test]
  fn block_under_foreign_at_rule_gets_its_children_wrapped() {
    let root = Root::new();
    let supports = at_rule("supports", "(display: grid)");
    root.append(supports.clone());
    let block = media(&supports, "print");

    let options = MqGroupOptions::default();
    let mut resolver = GroupResolver::new(&options, "media");
    assert!(matches!(
      resolver.resolve(&block).unwrap(),
      Resolution::RootGroup
    ));

    assert_eq!(
      Node::to_css(&block),
      "@media print {\n  @supports (display: grid) {\n    .a {\n      color: red;\n    }\n  }\n}"
    );
  }

  #[test]
  fn block_inside_rule_or_media_is_too_deep_and_untouched() {
    let root = Root::new();
    let holder = rule(".holder");
    root.append(holder.clone());
    let in_rule = media(&holder, "print");

    let outer = media(root.raw(), "screen");
    let in_media = media(&outer, "print");

    let supports = at_rule("supports", "(display: grid)");
    Node::append(&holder, supports.clone());
    let in_supports_in_rule = media(&supports, "print");
    let before = Node::to_css(&in_supports_in_rule);

    let options = MqGroupOptions::default();
    let mut resolver = GroupResolver::new(&options, "media");
    for block in [&in_rule, &in_media, &in_supports_in_rule] {
      assert!(matches!(
        resolver.resolve(block).unwrap(),
        Resolution::TooDeep
      ));
    }
    assert_eq!(Node::to_css(&in_supports_in_rule), before);
  }

  #[test]
  fn nested_wrappers_are_fatal_and_name_the_outer_wrapper() {
    let root = Root::parse("@mqgroup outer {\n  @mqgroup inner {\n    @media print {}\n  }\n}")
      .unwrap();
    let block = root.walk_at_rules("media").remove(0);

    let options = MqGroupOptions::default();
    let mut resolver = GroupResolver::new(&options, "media");
    let error = resolver.resolve(&block).unwrap_err();

    assert_eq!(
      error,
      MqGroupError::NestedWrapper {
        name: "mqgroup".into(),
        params: "outer".into(),
        position: Some(mqgroup_ast::Position::new(1, 1)),
      }
    );
    assert_eq!(
      error.to_string(),
      "1:1: nested `@mqgroup` rules are not supported"
    );
  }

  #[test]
  fn custom_wrapper_predicate() {
    let root = Root::new();
    let layer = at_rule("layer", "base");
    root.append(layer.clone());
    let block = media(&layer, "print");

    let options = MqGroupOptions::default().with_wrapper_name("layer");
    let mut resolver = GroupResolver::new(&options, "media");
    assert!(matches!(
      resolver.resolve(&block).unwrap(),
      Resolution::WrapperGroup { id: 2, .. }
    ));
  }
}
