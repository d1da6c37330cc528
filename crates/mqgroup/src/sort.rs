use std::cmp::Ordering;

use crate::length::{inspect_length, UNBOUNDED};
use crate::options::SortPolicy;
use crate::query_list::{parse_query_list, QueryExpression};

const MIN_WIDTH: &str = "min-width";

/// Ordering key of a parsed media query list.
///
/// Each alternative counts with its most restrictive `min-width`. Negated
/// and print alternatives, and alternatives without a `min-width`, are
/// [`UNBOUNDED`]. The list as a whole is as permissive as its least
/// restrictive alternative.
pub fn min_width_key(query_list: &[QueryExpression]) -> f64 {
  query_list
    .iter()
    .map(alternative_key)
    .fold(UNBOUNDED, f64::min)
}

fn alternative_key(expression: &QueryExpression) -> f64 {
  if expression.has("not") || expression.has("print") {
    return UNBOUNDED;
  }

  let Some(min_width) = expression.get(MIN_WIDTH) else {
    return UNBOUNDED;
  };

  min_width
    .values()
    .iter()
    .map(|value| inspect_length(value))
    .reduce(f64::max)
    .unwrap_or(UNBOUNDED)
}

/// Order raw media query lists according to `policy`. All sorts are stable.
pub fn sort_query_lists(mut query_lists: Vec<String>, policy: &SortPolicy) -> Vec<String> {
  match policy {
    SortPolicy::Preserve => query_lists,
    SortPolicy::Custom(comparator) => {
      query_lists.sort_by(|a, b| comparator(a, b));
      query_lists
    }
    SortPolicy::MinWidth => {
      let mut keyed: Vec<(f64, String)> = query_lists
        .into_iter()
        .map(|query_list| (min_width_key(&parse_query_list(&query_list)), query_list))
        .collect();
      keyed.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(Ordering::Equal));
      keyed.into_iter().map(|(_, query_list)| query_list).collect()
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn key(query_list: &str) -> f64 {
    min_width_key(&parse_query_list(query_list))
  }

  fn sorted(query_lists: &[&str], policy: &SortPolicy) -> Vec<String> {
    sort_query_lists(
      query_lists.iter().map(|query| query.to_string()).collect(),
      policy,
    )
  }

  #[test]
  fn key_uses_largest_min_width_of_an_alternative() {
    assert_eq!(key("(min-width: 10em) and (min-width: 300px)"), 300.0);
    assert_eq!(key("screen and (min-width: 1em)"), 16.0);
  }

  #[test]
  fn key_uses_smallest_alternative() {
    assert_eq!(key("(min-width: 600px), (min-width: 20em)"), 320.0);
    assert_eq!(key("(min-width: 600px), (max-width: 200px)"), 600.0);
  }

  #[test]
  fn negated_print_and_unbounded_queries() {
    assert_eq!(key("(max-width: 300px)"), UNBOUNDED);
    assert_eq!(key("not screen and (min-width: 100px)"), UNBOUNDED);
    assert_eq!(key("print and (min-width: 100px)"), UNBOUNDED);
    assert_eq!(key("(min-width) and (min-width: 10px)"), UNBOUNDED);
    assert_eq!(key(""), UNBOUNDED);
  }

  #[test]
  fn preserve_keeps_discovery_order() {
    let input = ["(min-width: 500px)", "(min-width: 100px)"];
    assert_eq!(sorted(&input, &SortPolicy::Preserve), input);
  }

  #[test]
  fn min_width_sorts_mobile_first_and_is_stable() {
    let input = [
      "print",
      "(min-width: 100px)",
      "(max-width: 300px)",
      "(min-width: 1em)",
      "(min-width: 6.25em)",
    ];

    assert_eq!(
      sorted(&input, &SortPolicy::MinWidth),
      vec![
        "(min-width: 1em)",
        "(min-width: 100px)",
        "(min-width: 6.25em)",
        "print",
        "(max-width: 300px)",
      ]
    );
  }

  #[test]
  fn custom_comparator_orders_raw_strings() {
    let policy = SortPolicy::custom(|a, b| b.len().cmp(&a.len()));
    assert_eq!(
      sorted(&["a", "ccc", "bb", "dd"], &policy),
      vec!["ccc", "bb", "dd", "a"]
    );
  }
}
