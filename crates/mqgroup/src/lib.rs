//! Collects `@media` blocks at the end of their scope.
//!
//! Blocks with an identical query list are merged into one, in the order they
//! were first seen, and optionally sorted mobile-first by `min-width`. A scope
//! is either the stylesheet root or a wrapper at-rule (`@mqgroup { ... }` by
//! default), which is removed from the output once its blocks are emitted.
//!
//! ```
//! use mqgroup::{pack, MqGroupOptions};
//!
//! let css = pack(
//!   "@media print { .a { color: red; } } .b { color: blue; }",
//!   MqGroupOptions::default(),
//! )
//! .unwrap();
//! assert!(css.starts_with(".b"));
//! ```

use mqgroup_ast::Processor;

mod aggregate;
mod error;
mod group;
mod length;
mod options;
mod query_list;
mod rewrite;
mod sort;

pub use aggregate::{Group, QueryAggregator};
pub use error::{MqGroupError, MqGroupResult};
pub use group::{GroupId, GroupKind, GroupResolver, Resolution, ROOT_GROUP_ID};
pub use length::{inspect_length, UNBOUNDED};
pub use options::{
  MqGroupConfig, MqGroupOptions, QueryComparator, SortPolicy, WrapperPredicate,
  DEFAULT_WRAPPER_NAME, MEDIA_AT_RULE,
};
pub use query_list::{parse_query_list, Feature, ParsedQueryList, QueryExpression};
pub use rewrite::MediaQueryGrouper;
pub use sort::{min_width_key, sort_query_lists};

/// Parse `css`, group its media queries and serialize the result.
pub fn pack(css: &str, options: MqGroupOptions) -> anyhow::Result<String> {
  Processor::new()
    .with_plugin(MediaQueryGrouper::new(options))
    .process(css)
}
