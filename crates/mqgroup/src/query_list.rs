use indexmap::IndexMap;
use mqgroup_ast::list;
use once_cell::sync::Lazy;
use regex::Regex;

static BARE_FEATURE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("invalid bare feature regex"));

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feature {
  /// Bare keyword such as `screen`, `print` or `not`.
  Flag,
  /// Raw values of `(feature: value)` tokens, in source order. A token
  /// without a value contributes an empty string.
  Values(Vec<String>),
}

impl Feature {
  pub fn values(&self) -> &[String] {
    match self {
      Feature::Flag => &[],
      Feature::Values(values) => values,
    }
  }
}

/// One comma-separated alternative of a media query list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryExpression {
  features: IndexMap<String, Feature>,
}

impl QueryExpression {
  pub fn get(&self, feature: &str) -> Option<&Feature> {
    self.features.get(feature)
  }

  pub fn has(&self, feature: &str) -> bool {
    self.features.contains_key(feature)
  }

  pub fn is_empty(&self) -> bool {
    self.features.is_empty()
  }

  pub fn features(&self) -> impl Iterator<Item = (&str, &Feature)> {
    self.features.iter().map(|(name, feature)| (name.as_str(), feature))
  }

  fn set_flag(&mut self, feature: String) {
    self.features.insert(feature, Feature::Flag);
  }

  fn push_value(&mut self, feature: String, value: String) {
    let entry = self
      .features
      .entry(feature)
      .or_insert_with(|| Feature::Values(Vec::new()));

    match *entry {
      Feature::Values(ref mut values) => values.push(value),
      Feature::Flag => *entry = Feature::Values(vec![value]),
    }
  }

  fn parse(query: &str) -> Self {
    let mut expression = QueryExpression::default();

    for token in list::space(query) {
      let token = token.to_lowercase();

      if token == "and" {
        continue;
      }

      if BARE_FEATURE.is_match(&token) {
        expression.set_flag(token);
        continue;
      }

      let token = token.strip_prefix('(').unwrap_or(&token);
      let token = token.strip_suffix(')').unwrap_or(token);
      let mut parts = list::split(token, &[':'], false).into_iter();

      let Some(feature) = parts.next().filter(|feature| !feature.is_empty()) else {
        continue;
      };
      expression.push_value(feature, parts.next().unwrap_or_default());
    }

    expression
  }
}

pub type ParsedQueryList = Vec<QueryExpression>;

/// Parse a raw media query list such as `screen and (min-width: 20em), print`.
///
/// Best effort: tokens that do not look like features are skipped rather
/// than reported.
pub fn parse_query_list(query_list: &str) -> ParsedQueryList {
  list::comma(query_list)
    .iter()
    .map(|query| QueryExpression::parse(query))
    .collect()
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn values(expression: &QueryExpression, feature: &str) -> Vec<String> {
    expression
      .get(feature)
      .map(|feature| feature.values().to_vec())
      .unwrap_or_default()
  }

  #[test]
  fn splits_alternatives_and_features() {
    let parsed = parse_query_list("Screen AND (Min-Width: 500PX), print");

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].get("screen"), Some(&Feature::Flag));
    assert!(!parsed[0].has("and"));
    assert_eq!(values(&parsed[0], "min-width"), vec!["500px"]);
    assert_eq!(parsed[1].get("print"), Some(&Feature::Flag));
  }

  #[test]
  fn collects_repeated_features_in_order() {
    let parsed = parse_query_list("(min-width: 10em) and (min-width: 300px)");
    assert_eq!(values(&parsed[0], "min-width"), vec!["10em", "300px"]);
  }

  #[test]
  fn feature_without_value_records_empty_value() {
    let parsed = parse_query_list("(min-width) and (color)");
    assert_eq!(values(&parsed[0], "min-width"), vec![""]);
    assert_eq!(values(&parsed[0], "color"), vec![""]);
  }

  #[test]
  fn empty_list_has_one_empty_alternative() {
    let parsed = parse_query_list("");
    assert_eq!(parsed.len(), 1);
    assert!(parsed[0].is_empty());
  }

  #[test]
  fn malformed_tokens_are_skipped() {
    let parsed = parse_query_list("() and (:) and not");
    let features: Vec<&str> = parsed[0].features().map(|(name, _)| name).collect();
    assert_eq!(features, vec!["not"]);
  }

  #[test]
  fn value_after_flag_replaces_flag() {
    let parsed = parse_query_list("color and (color: 8)");
    assert_eq!(values(&parsed[0], "color"), vec!["8"]);
  }
}
