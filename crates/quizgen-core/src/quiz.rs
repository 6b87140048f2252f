//! Quiz generation settings.
//!
//! All three settings have enumerated or bounded domains. Out-of-domain
//! values are rejected when parsed, never clamped, so whatever reaches the
//! prompt is exactly what the user asked for.

use std::fmt;
use std::str::FromStr;

use derive_more::{Display, Into};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoStaticStr};

/// Kind of questions the model is asked to produce.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    IntoStaticStr,
    EnumString,
    EnumIter,
    strum::Display
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
pub enum QuestionType {
    /// Questions with a set of candidate answers.
    #[default]
    MultipleChoice,
    /// Questions answered in a sentence or two.
    ShortAnswer,
    /// Statements to mark as true or false.
    TrueFalse,
    /// Discussion questions without a single answer.
    OpenEnded,
}

/// Target difficulty of the generated questions.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    IntoStaticStr,
    EnumString,
    EnumIter,
    strum::Display
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
pub enum ComplexityLevel {
    Basic,
    #[default]
    Intermediate,
    Advanced,
}

/// Error returned when a question count is outside `[5, 20]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionCountError {
    #[error("number of questions must be between {min} and {max}, got {value}", min = QuestionCount::MIN, max = QuestionCount::MAX)]
    OutOfRange { value: i64 },
    #[error("number of questions must be an integer, got {0:?}")]
    NotANumber(String),
}

/// Requested number of questions, always within `[5, 20]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Into)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct QuestionCount(u8);

impl QuestionCount {
    /// Smallest accepted count.
    pub const MIN: u8 = 5;
    /// Largest accepted count.
    pub const MAX: u8 = 20;
    /// Count used when none is chosen.
    pub const DEFAULT: Self = Self(10);

    /// Validates `value` against the accepted range.
    pub fn new(value: u8) -> Result<Self, QuestionCountError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(QuestionCountError::OutOfRange {
                value: i64::from(value),
            })
        }
    }

    /// Returns the inner value.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for QuestionCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for QuestionCount {
    type Error = QuestionCountError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for QuestionCount {
    type Err = QuestionCountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| QuestionCountError::NotANumber(trimmed.to_owned()))?;
        u8::try_from(value)
            .map_err(|_| QuestionCountError::OutOfRange { value })
            .and_then(Self::new)
    }
}

/// User-selected generation parameters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    /// Kind of questions to produce.
    pub question_type: QuestionType,
    /// Target difficulty.
    pub complexity: ComplexityLevel,
    /// Requested number of questions.
    pub num_questions: QuestionCount,
}

impl QuizSettings {
    /// Creates settings from explicit values.
    pub fn new(
        question_type: QuestionType,
        complexity: ComplexityLevel,
        num_questions: QuestionCount,
    ) -> Self {
        Self {
            question_type,
            complexity,
            num_questions,
        }
    }
}

impl fmt::Display for QuizSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} question(s), {} level",
            self.num_questions, self.question_type, self.complexity
        )
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn defaults_match_initial_selection() {
        let settings = QuizSettings::default();
        assert_eq!(settings.question_type, QuestionType::MultipleChoice);
        assert_eq!(settings.complexity, ComplexityLevel::Intermediate);
        assert_eq!(settings.num_questions.get(), 10);
    }

    #[test]
    fn question_types_use_kebab_case_names() {
        let names: Vec<&str> = QuestionType::iter().map(|t| -> &'static str { t.into() }).collect();
        assert_eq!(
            names,
            ["multiple-choice", "short-answer", "true-false", "open-ended"]
        );
        assert_eq!(
            "true-false".parse::<QuestionType>().unwrap(),
            QuestionType::TrueFalse
        );
        assert!("essay".parse::<QuestionType>().is_err());
    }

    #[test]
    fn complexity_levels_parse() {
        assert_eq!(
            "advanced".parse::<ComplexityLevel>().unwrap(),
            ComplexityLevel::Advanced
        );
        assert_eq!(ComplexityLevel::Basic.to_string(), "basic");
    }

    #[test]
    fn question_count_accepts_bounds() {
        assert_eq!(QuestionCount::new(5).unwrap().get(), 5);
        assert_eq!(QuestionCount::new(20).unwrap().get(), 20);
        assert_eq!("17".parse::<QuestionCount>().unwrap().get(), 17);
    }

    #[test]
    fn question_count_rejects_instead_of_clamping() {
        assert_eq!(
            QuestionCount::new(4),
            Err(QuestionCountError::OutOfRange { value: 4 })
        );
        assert_eq!(
            "21".parse::<QuestionCount>(),
            Err(QuestionCountError::OutOfRange { value: 21 })
        );
        assert_eq!(
            "-3".parse::<QuestionCount>(),
            Err(QuestionCountError::OutOfRange { value: -3 })
        );
        assert!(matches!(
            "ten".parse::<QuestionCount>(),
            Err(QuestionCountError::NotANumber(_))
        ));
    }

    #[test]
    fn question_count_deserialization_is_validated() {
        let ok: QuestionCount = serde_json::from_str("12").unwrap();
        assert_eq!(ok.get(), 12);
        assert!(serde_json::from_str::<QuestionCount>("30").is_err());
    }
}
