use std::collections::BTreeMap;

use indexmap::IndexMap;
use mqgroup_ast::{Node, NodeRef};

use crate::group::{GroupId, GroupKind};

/// One merge scope and the blocks captured in it, keyed by raw query list.
#[derive(Debug)]
pub struct Group {
  pub id: GroupId,
  pub anchor: NodeRef,
  pub kind: GroupKind,
  queries: IndexMap<String, NodeRef>,
}

impl Group {
  fn new(id: GroupId, anchor: NodeRef, kind: GroupKind) -> Self {
    Self {
      id,
      anchor,
      kind,
      queries: IndexMap::new(),
    }
  }

  /// Query lists in first-seen order.
  pub fn query_lists(&self) -> Vec<String> {
    self.queries.keys().cloned().collect()
  }

  pub fn merged(&self, query_list: &str) -> Option<&NodeRef> {
    self.queries.get(query_list)
  }

  pub fn len(&self) -> usize {
    self.queries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.queries.is_empty()
  }

  /// Capture `block` into this group and detach it from the tree.
  fn absorb(&mut self, block: &NodeRef) {
    let query_list = block
      .borrow()
      .as_at_rule()
      .map(|data| data.params.clone())
      .unwrap_or_default();

    match self.queries.get(&query_list) {
      Some(merged) => {
        for child in Node::children(block) {
          Node::append(merged, Node::clone_node(&child));
        }
      }
      None => {
        self.queries.insert(query_list, Node::clone_node(block));
      }
    }

    Node::remove_self(block);
  }
}

/// Collects blocks into groups, ordered by group id.
#[derive(Debug, Default)]
pub struct QueryAggregator {
  groups: BTreeMap<GroupId, Group>,
  captured: usize,
}

impl QueryAggregator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Merge `block` into the group `id`, creating the group on first use.
  pub fn aggregate(&mut self, id: GroupId, anchor: &NodeRef, kind: GroupKind, block: &NodeRef) {
    self
      .groups
      .entry(id)
      .or_insert_with(|| Group::new(id, anchor.clone(), kind))
      .absorb(block);
    self.captured += 1;
  }

  /// Number of blocks captured so far, duplicates included.
  pub fn captured(&self) -> usize {
    self.captured
  }

  pub fn into_groups(self) -> impl Iterator<Item = Group> {
    self.groups.into_values()
  }
}
