#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum mark every subject needs for the record to pass.
pub const PASS_MARK: f64 = 25.0;

/// Pass/fail flag of an exam record.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExamVerdict {
    /// Every subject met the pass mark.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "PASS"))]
    Pass,
    /// At least one subject fell below the pass mark, or no subjects were recorded.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "FAIL"))]
    #[default]
    Fail,
}

impl ExamVerdict {
    pub const ALL: &'static [ExamVerdict] = &[Self::Pass, Self::Fail];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for ExamVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid verdict string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVerdictError {
    invalid: String,
}

impl fmt::Display for ParseVerdictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid verdict '{}'. Valid values: PASS, FAIL",
            self.invalid
        )
    }
}

impl std::error::Error for ParseVerdictError {}

impl FromStr for ExamVerdict {
    type Err = ParseVerdictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PASS" => Ok(Self::Pass),
            "FAIL" => Ok(Self::Fail),
            _ => Err(ParseVerdictError {
                invalid: s.to_string(),
            }),
        }
    }
}

/// Round a mark or total to two decimal places.
pub fn round_mark(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Total mark and verdict derived from a record's detail marks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExamOutcome {
    pub total_mark: f64,
    pub verdict: ExamVerdict,
}

impl ExamOutcome {
    /// Sum the marks and decide the verdict.
    ///
    /// An empty mark set totals zero and fails.
    pub fn from_marks<I>(marks: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut total = 0.0;
        let mut count = 0usize;
        let mut all_passed = true;
        for mark in marks {
            total += mark;
            count += 1;
            if mark < PASS_MARK {
                all_passed = false;
            }
        }

        let verdict = if count > 0 && all_passed {
            ExamVerdict::Pass
        } else {
            ExamVerdict::Fail
        };

        Self {
            total_mark: round_mark(total),
            verdict,
        }
    }
}
