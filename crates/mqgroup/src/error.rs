use mqgroup_ast::{NodeRef, Position};
use thiserror::Error;

pub type MqGroupResult<T> = std::result::Result<T, MqGroupError>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MqGroupError {
  /// A wrapper scope was found inside another wrapper scope.
  #[error("{}nested `@{name}` rules are not supported", location(.position))]
  NestedWrapper {
    name: String,
    params: String,
    position: Option<Position>,
  },
}

impl MqGroupError {
  pub(crate) fn nested_wrapper(node: &NodeRef) -> Self {
    let inner = node.borrow();
    let (name, params) = match inner.as_at_rule() {
      Some(data) => (data.name.clone(), data.params.clone()),
      None => (inner.type_name().to_string(), String::new()),
    };

    MqGroupError::NestedWrapper {
      name,
      params,
      position: inner.source,
    }
  }

  /// Source position of the offending node, when the tree came from the parser.
  pub fn position(&self) -> Option<Position> {
    match self {
      MqGroupError::NestedWrapper { position, .. } => *position,
    }
  }
}

fn location(position: &Option<Position>) -> String {
  position
    .map(|position| format!("{position}: "))
    .unwrap_or_default()
}
