use once_cell::sync::Lazy;
use regex::Regex;

/// Key for lengths that cannot be compared; sorts after every real length.
pub const UNBOUNDED: f64 = f64::MAX;

static LENGTH: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?P<number>-?\d*\.?\d+)(?P<unit>ch|em|ex|px|rem)").expect("invalid length regex")
});

/// Approximate pixel size of a length, using default font metrics.
///
/// Only meant for ordering queries against each other. Unitless numbers
/// other than `0` and unknown units are [`UNBOUNDED`].
pub fn inspect_length(length: &str) -> f64 {
  if length == "0" {
    return 0.0;
  }

  let Some(captures) = LENGTH.captures(length) else {
    return UNBOUNDED;
  };

  let Ok(value) = captures["number"].parse::<f64>() else {
    return UNBOUNDED;
  };

  match &captures["unit"] {
    "ch" => value * 8.8984375,
    "em" | "rem" => value * 16.0,
    "ex" => value * 8.296875,
    _ => value,
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn converts_font_relative_units() {
    assert_eq!(inspect_length("1em"), 16.0);
    assert_eq!(inspect_length("2rem"), 32.0);
    assert_eq!(inspect_length("1ch"), 8.8984375);
    assert_eq!(inspect_length("2ex"), 16.59375);
    assert_eq!(inspect_length("100px"), 100.0);
  }

  #[test]
  fn handles_fractions_and_signs() {
    assert_eq!(inspect_length(".5em"), 8.0);
    assert_eq!(inspect_length("-10px"), -10.0);
    assert_eq!(inspect_length("37.5em"), 600.0);
  }

  #[test]
  fn zero_is_zero_without_unit() {
    assert_eq!(inspect_length("0"), 0.0);
    assert_eq!(inspect_length("0px"), 0.0);
  }

  #[test]
  fn unknown_lengths_are_unbounded() {
    assert_eq!(inspect_length(""), UNBOUNDED);
    assert_eq!(inspect_length("500"), UNBOUNDED);
    assert_eq!(inspect_length("50vw"), UNBOUNDED);
    assert_eq!(inspect_length("calc(1px + 1vw)"), 1.0);
  }
}
