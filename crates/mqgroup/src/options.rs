use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use mqgroup_ast::Node;
use serde::Deserialize;

/// Name of the at-rule whose blocks get grouped.
pub const MEDIA_AT_RULE: &str = "media";

/// Name of the synthetic at-rule that bounds a merge scope by default.
pub const DEFAULT_WRAPPER_NAME: &str = "mqgroup";

/// Caller-defined ordering over raw media query lists.
pub type QueryComparator = Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>;

/// Decides whether a node is a wrapper scope. The root is always a scope and
/// is never passed to this predicate.
pub type WrapperPredicate = Arc<dyn Fn(&Node) -> bool + Send + Sync>;

#[derive(Clone, Default)]
pub enum SortPolicy {
  /// Keep discovery order.
  #[default]
  Preserve,
  /// Mobile-first: ascending by the least restrictive `min-width`.
  MinWidth,
  Custom(QueryComparator),
}

impl SortPolicy {
  pub fn custom<F>(comparator: F) -> Self
  where
    F: Fn(&str, &str) -> Ordering + Send + Sync + 'static,
  {
    SortPolicy::Custom(Arc::new(comparator))
  }
}

impl From<bool> for SortPolicy {
  fn from(sort: bool) -> Self {
    if sort {
      SortPolicy::MinWidth
    } else {
      SortPolicy::Preserve
    }
  }
}

impl fmt::Debug for SortPolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SortPolicy::Preserve => f.write_str("Preserve"),
      SortPolicy::MinWidth => f.write_str("MinWidth"),
      SortPolicy::Custom(_) => f.write_str("Custom(..)"),
    }
  }
}

/// Serializable configuration, e.g. the `"mqgroup"` key of a package.json.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MqGroupConfig {
  pub sort: Option<bool>,
  pub wrapper_name: Option<String>,
}

#[derive(Clone)]
pub struct MqGroupOptions {
  pub sort: SortPolicy,
  pub wrapper: WrapperPredicate,
}

impl MqGroupOptions {
  pub fn with_sort(mut self, sort: impl Into<SortPolicy>) -> Self {
    self.sort = sort.into();
    self
  }

  pub fn with_wrapper<F>(mut self, predicate: F) -> Self
  where
    F: Fn(&Node) -> bool + Send + Sync + 'static,
  {
    self.wrapper = Arc::new(predicate);
    self
  }

  pub fn with_wrapper_name(self, name: impl Into<String>) -> Self {
    let name = name.into();
    self.with_wrapper(move |node| node.is_at_rule_named(&name))
  }

  pub(crate) fn is_wrapper(&self, node: &Node) -> bool {
    !node.is_root() && (self.wrapper)(node)
  }
}

impl Default for MqGroupOptions {
  fn default() -> Self {
    MqGroupOptions {
      sort: SortPolicy::Preserve,
      wrapper: Arc::new(|node: &Node| node.is_at_rule_named(DEFAULT_WRAPPER_NAME)),
    }
  }
}

impl fmt::Debug for MqGroupOptions {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MqGroupOptions")
      .field("sort", &self.sort)
      .finish_non_exhaustive()
  }
}

impl From<MqGroupConfig> for MqGroupOptions {
  fn from(config: MqGroupConfig) -> Self {
    let options = MqGroupOptions::default().with_sort(config.sort.unwrap_or_default());
    match config.wrapper_name {
      Some(name) => options.with_wrapper_name(name),
      None => options,
    }
  }
}
