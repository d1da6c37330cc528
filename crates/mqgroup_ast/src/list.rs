//! Splitting of comma- and space-separated CSS lists.
//!
//! Separators inside quoted strings, parentheses or after a backslash escape
//! never split. Items are trimmed and empty items are dropped, except that
//! `trailing` keeps the final item even when it is empty (`"a,"` gives
//! `["a", ""]`), which is how media query lists are split.

/// Split a media query list or selector list on top-level commas.
pub fn comma(value: &str) -> Vec<String> {
  split(value, &[','], true)
}

/// Split on top-level whitespace.
pub fn space(value: &str) -> Vec<String> {
  split(value, &[' ', '\n', '\t'], false)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
  Plain,
  Escaped,
  Quoted(char),
  QuotedEscaped(char),
}

pub fn split(value: &str, separators: &[char], trailing: bool) -> Vec<String> {
  let mut items: Vec<String> = Vec::new();
  let mut current = String::new();
  let mut depth = 0u32;
  let mut scan = Scan::Plain;

  for ch in value.chars() {
    let mut is_separator = false;
    scan = match scan {
      Scan::Escaped => Scan::Plain,
      Scan::QuotedEscaped(quote) => Scan::Quoted(quote),
      Scan::Quoted(quote) if ch == '\\' => Scan::QuotedEscaped(quote),
      Scan::Quoted(quote) if ch == quote => Scan::Plain,
      Scan::Quoted(quote) => Scan::Quoted(quote),
      Scan::Plain => match ch {
        '\\' => Scan::Escaped,
        '"' | '\'' => Scan::Quoted(ch),
        '(' => {
          depth = depth.saturating_add(1);
          Scan::Plain
        }
        ')' => {
          depth = depth.saturating_sub(1);
          Scan::Plain
        }
        _ => {
          is_separator = depth == 0 && separators.contains(&ch);
          Scan::Plain
        }
      },
    };

    if is_separator {
      if !current.is_empty() {
        items.push(current.trim().to_string());
      }
      current.clear();
    } else {
      current.push(ch);
    }
  }

  if trailing || !current.is_empty() {
    items.push(current.trim().to_string());
  }

  items
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::{comma, space, split};

  #[test]
  fn comma_splits_query_alternatives() {
    assert_eq!(
      comma("screen and (min-width: 10em), print"),
      vec!["screen and (min-width: 10em)", "print"]
    );
  }

  #[test]
  fn comma_keeps_trailing_empty_item() {
    assert_eq!(comma("screen,"), vec!["screen", ""]);
    assert_eq!(comma(""), vec![""]);
  }

  #[test]
  fn comma_ignores_commas_in_functions_and_strings() {
    assert_eq!(
      comma("(min-width: calc(1px, 2px)), \"a,b\""),
      vec!["(min-width: calc(1px, 2px))", "\"a,b\""]
    );
  }

  #[test]
  fn space_keeps_parenthesised_features_together() {
    assert_eq!(
      space("only screen  and (min-width: 500px)"),
      vec!["only", "screen", "and", "(min-width: 500px)"]
    );
  }

  #[test]
  fn space_keeps_escaped_spaces() {
    assert_eq!(space("a\\ b c"), vec!["a\\ b", "c"]);
  }

  #[test]
  fn space_of_blank_input_is_empty() {
    assert!(space("   ").is_empty());
  }

  #[test]
  fn split_on_colon_drops_missing_value() {
    assert_eq!(split("min-width: 500px", &[':'], false), vec!["min-width", "500px"]);
    assert_eq!(split("min-width:", &[':'], false), vec!["min-width"]);
  }
}
