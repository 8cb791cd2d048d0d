use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A parsed quarter key.
///
/// Keys that do not parse carry `num == 0` and `is_ytd == false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuarterKey {
    pub num: u8,
    pub is_ytd: bool,
}

impl QuarterKey {
    pub const UNKNOWN: Self = Self {
        num: 0,
        is_ytd: false,
    };

    /// Parses `Q<1-4>` with an optional `_YTD` suffix directly after the digits.
    pub fn parse(key: &str) -> Self {
        let Some(rest) = key.strip_prefix('Q') else {
            return Self::UNKNOWN;
        };

        let digits_end = rest
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(rest.len());

        let num = match rest[..digits_end].parse::<u8>() {
            Ok(n @ 1..=4) => n,
            _ => return Self::UNKNOWN,
        };

        Self {
            num,
            is_ytd: rest[digits_end..].starts_with("_YTD"),
        }
    }

    pub const fn is_known(&self) -> bool {
        self.num != 0
    }
}

pub fn parse_quarter(key: &str) -> QuarterKey {
    QuarterKey::parse(key)
}

/// Where periods whose key (or year) cannot be parsed are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPeriodPolicy {
    #[schemars(description = "Unparseable keys sort before Q1, as if they were quarter 0.")]
    #[default]
    Earliest,

    #[schemars(description = "Unparseable keys sort after every known quarter, YTD included.")]
    Latest,
}

/// How YTD variants are placed relative to standalone quarters of the same year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum YtdPlacement {
    #[schemars(description = "Q1, Q1_YTD, Q2, Q2_YTD, ...: quarter number first, YTD after its quarter.")]
    #[default]
    Interleaved,

    #[schemars(description = "Q1, Q2, Q3, Q4, Q1_YTD, ..., Q4_YTD: every standalone quarter before any YTD.")]
    AfterQuarters,
}

/// The one comparator shared by the balance sheet, cash flow and income
/// statement transformers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeriodOrdering {
    pub unknown_periods: UnknownPeriodPolicy,
    pub ytd_placement: YtdPlacement,
}

impl PeriodOrdering {
    pub const fn new(unknown_periods: UnknownPeriodPolicy, ytd_placement: YtdPlacement) -> Self {
        Self {
            unknown_periods,
            ytd_placement,
        }
    }

    fn quarter_rank(&self, key: QuarterKey) -> (u8, u8, u8) {
        let bucket = u8::from(!key.is_known() && self.unknown_periods == UnknownPeriodPolicy::Latest);
        let ytd = u8::from(key.is_ytd);

        match self.ytd_placement {
            YtdPlacement::Interleaved => (bucket, key.num, ytd),
            YtdPlacement::AfterQuarters => (bucket, ytd, key.num),
        }
    }

    fn year_rank(&self, year: &str) -> (u8, i64) {
        match parse_year(year) {
            Some(value) => (1, value),
            None => match self.unknown_periods {
                UnknownPeriodPolicy::Earliest => (0, 0),
                UnknownPeriodPolicy::Latest => (2, 0),
            },
        }
    }

    pub fn compare_quarters(&self, a: &str, b: &str) -> Ordering {
        self.quarter_rank(QuarterKey::parse(a))
            .cmp(&self.quarter_rank(QuarterKey::parse(b)))
    }

    /// Numeric order; unparseable years are placed by the unknown-period policy.
    pub fn compare_years(&self, a: &str, b: &str) -> Ordering {
        self.year_rank(a).cmp(&self.year_rank(b)).then_with(|| {
            if parse_year(a).is_none() && parse_year(b).is_none() {
                a.cmp(b)
            } else {
                Ordering::Equal
            }
        })
    }

    pub fn compare_year_quarter(
        &self,
        year_a: &str,
        quarter_a: &str,
        year_b: &str,
        quarter_b: &str,
    ) -> Ordering {
        self.compare_years(year_a, year_b)
            .then_with(|| self.compare_quarters(quarter_a, quarter_b))
    }

    pub fn sorted_quarters<'a, I>(&self, keys: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut keys: Vec<&str> = keys.into_iter().collect();
        keys.sort_by(|a, b| self.compare_quarters(a, b));
        keys
    }

    pub fn sorted_years<'a, I>(&self, years: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut years: Vec<&str> = years.into_iter().collect();
        years.sort_by(|a, b| self.compare_years(a, b));
        years
    }
}

pub fn compare_quarters(a: &str, b: &str) -> Ordering {
    PeriodOrdering::default().compare_quarters(a, b)
}

pub fn compare_year_quarter(year_a: &str, quarter_a: &str, year_b: &str, quarter_b: &str) -> Ordering {
    PeriodOrdering::default().compare_year_quarter(year_a, quarter_a, year_b, quarter_b)
}

/// Reads the leading ASCII digits of a year label ("2023", "2023 restated").
pub fn parse_year(year: &str) -> Option<i64> {
    let trimmed = year.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

pub(crate) fn warn_unknown_quarters<'a, I>(statement: &str, keys: I)
where
    I: IntoIterator<Item = &'a str>,
{
    for key in keys {
        if !QuarterKey::parse(key).is_known() {
            warn!(
                "{} payload contains unrecognized period key '{}'; ordering it as an unknown period",
                statement, key
            );
        }
    }
}
