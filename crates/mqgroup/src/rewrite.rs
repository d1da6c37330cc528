use mqgroup_ast::{Node, NodeRef, Plugin, Root};

use crate::aggregate::QueryAggregator;
use crate::error::MqGroupResult;
use crate::group::{GroupKind, GroupResolver, Resolution, ROOT_GROUP_ID};
use crate::options::{MqGroupOptions, MEDIA_AT_RULE};
use crate::sort::sort_query_lists;

const SOURCE_MAP_PREFIX: &str = "# sourcemappingurl=";

/// Moves every `@media` block to the end of its scope, merging blocks with
/// identical query lists and removing wrapper scopes.
#[derive(Clone, Debug, Default)]
pub struct MediaQueryGrouper {
  options: MqGroupOptions,
}

impl MediaQueryGrouper {
  pub fn new(options: MqGroupOptions) -> Self {
    Self { options }
  }

  pub fn options(&self) -> &MqGroupOptions {
    &self.options
  }

  /// Rewrite `root` in place.
  ///
  /// Not atomic: when a nested wrapper aborts the run, blocks captured up to
  /// that point are already detached. Work on [`Root::deep_clone`] if the
  /// original must survive a failure.
  pub fn transform(&self, root: &Root) -> MqGroupResult<()> {
    let root_node = root.raw();
    let source_map = take_source_map_annotation(root_node);

    let mut resolver = GroupResolver::new(&self.options, MEDIA_AT_RULE);
    let mut aggregator = QueryAggregator::new();
    let blocks = Node::walk_at_rules(root_node, MEDIA_AT_RULE);
    let mut left_in_place = 0usize;

    for block in &blocks {
      match resolver.resolve(block)? {
        Resolution::RootGroup => {
          aggregator.aggregate(ROOT_GROUP_ID, root_node, GroupKind::Root, block);
        }
        Resolution::WrapperGroup { id, anchor } => {
          aggregator.aggregate(id, &anchor, GroupKind::Wrapper, block);
        }
        Resolution::TooDeep => {
          tracing::trace!(block = %block.borrow(), "Leaving nested @media in place");
          left_in_place += 1;
        }
      }
    }

    let captured = aggregator.captured();
    let mut emitted = 0usize;
    for group in aggregator.into_groups() {
      for query_list in sort_query_lists(group.query_lists(), &self.options.sort) {
        if let Some(merged) = group.merged(&query_list) {
          Node::append(&group.anchor, merged.clone());
          emitted += 1;
        }
      }

      if group.kind == GroupKind::Wrapper {
        Node::unwrap_children(&group.anchor);
      }
    }

    let unused_wrappers = Node::collect(root_node, |node| self.options.is_wrapper(node));
    for wrapper in &unused_wrappers {
      Node::unwrap_children(wrapper);
    }

    if let Some(annotation) = source_map {
      tracing::trace!("Keeping sourcemap annotation last");
      Node::append(root_node, annotation);
    }

    tracing::debug!(
      blocks = blocks.len(),
      captured,
      emitted,
      left_in_place,
      unused_wrappers = unused_wrappers.len(),
      "Grouped media queries"
    );

    Ok(())
  }
}

impl Plugin for MediaQueryGrouper {
  fn name(&self) -> &str {
    "mqgroup"
  }

  fn run(&self, root: &Root) -> anyhow::Result<()> {
    self.transform(root)?;
    Ok(())
  }
}

fn is_source_map_annotation(node: &NodeRef) -> bool {
  node
    .borrow()
    .as_comment()
    .is_some_and(|comment| comment.text.to_lowercase().starts_with(SOURCE_MAP_PREFIX))
}

fn take_source_map_annotation(root: &NodeRef) -> Option<NodeRef> {
  let last = Node::last_child(root)?;
  if !is_source_map_annotation(&last) {
    return None;
  }
  Node::remove_self(&last);
  Some(last)
}
