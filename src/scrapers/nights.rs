use crate::error::ConfigError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("Invalid digits pattern"));

/// How a duration label such as `"7 + 3 nights"` becomes a night count.
///
/// The site writes bonus nights as `"<base> + <extra>"` and open-ended
/// durations as `"21+"`. Both rules agree on the latter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NightsRule {
    /// First run of digits only: `"7 + 3 nights"` is 7.
    #[default]
    First,
    /// Sum of every run of digits: `"7 + 3 nights"` is 10.
    Sum,
}

impl FromStr for NightsRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(Self::First),
            "sum" => Ok(Self::Sum),
            _ => Err(ConfigError::Invalid {
                key: "NIGHTS_RULE",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for NightsRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Sum => f.write_str("sum"),
        }
    }
}

/// Extract a night count from a free-text duration label.
///
/// Whitespace is dropped before digits are matched. Returns `None` when the
/// label holds no digits or the number does not fit.
pub fn parse_nights(label: &str, rule: NightsRule) -> Option<u32> {
    let compact: String = label
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let mut runs = DIGITS.find_iter(&compact).map(|m| m.as_str().parse::<u32>());

    match rule {
        NightsRule::First => runs.next()?.ok(),
        NightsRule::Sum => {
            let mut total: Option<u32> = None;
            for run in runs {
                let n = run.ok()?;
                total = Some(total.unwrap_or(0).checked_add(n)?);
            }
            total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_nights_per_rule() {
        assert_eq!(parse_nights("7 + 3 nights", NightsRule::First), Some(7));
        assert_eq!(parse_nights("7 + 3 nights", NightsRule::Sum), Some(10));
    }

    #[test]
    fn test_open_ended_label() {
        assert_eq!(parse_nights("21+", NightsRule::First), Some(21));
        assert_eq!(parse_nights("21+", NightsRule::Sum), Some(21));
    }

    #[test]
    fn test_plain_labels() {
        assert_eq!(parse_nights("5 Nights", NightsRule::First), Some(5));
        assert_eq!(parse_nights("4 días", NightsRule::Sum), Some(4));
        assert_eq!(parse_nights("1 0 noches", NightsRule::First), Some(10));
    }

    #[test]
    fn test_no_digits_is_none() {
        assert_eq!(parse_nights("nights", NightsRule::First), None);
        assert_eq!(parse_nights("", NightsRule::Sum), None);
    }

    #[test]
    fn test_overflow_is_none() {
        assert_eq!(parse_nights("99999999999 nights", NightsRule::First), None);
        assert_eq!(parse_nights("4000000000 + 4000000000", NightsRule::Sum), None);
    }

    #[test]
    fn test_rule_from_str() {
        assert_eq!("Sum".parse::<NightsRule>().ok(), Some(NightsRule::Sum));
        assert_eq!(" first ".parse::<NightsRule>().ok(), Some(NightsRule::First));
        assert!("average".parse::<NightsRule>().is_err());
    }
}
