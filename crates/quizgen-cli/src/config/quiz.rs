//! Initial quiz settings.

use clap::Args;
use quizgen_core::quiz::{ComplexityLevel, QuestionCount, QuestionType, QuizSettings};

/// Settings a new session starts with; the shell can change them later.
#[derive(Debug, Clone, Args)]
pub struct QuizConfig {
    /// Kind of questions to generate.
    #[arg(long, env = "QUIZGEN_QUESTION_TYPE", value_enum, default_value = "multiple-choice")]
    pub question_type: QuestionType,

    /// Difficulty of the questions.
    #[arg(long, env = "QUIZGEN_COMPLEXITY", value_enum, default_value = "intermediate")]
    pub complexity: ComplexityLevel,

    /// Number of questions, between 5 and 20.
    #[arg(long, env = "QUIZGEN_NUM_QUESTIONS", default_value = "10")]
    pub num_questions: QuestionCount,
}

impl QuizConfig {
    /// Returns the configured settings.
    pub fn settings(&self) -> QuizSettings {
        QuizSettings::new(self.question_type, self.complexity, self.num_questions)
    }
}
