//! The question-generation prompt.

use std::borrow::Cow;

use quizgen_core::quiz::QuizSettings;

use crate::rag::RetrievedChunk;
use crate::{Error, Result};

const CONTEXT: &str = "{context}";
const QUESTION_TYPES: &str = "{question_types}";
const COMPLEXITY_LEVEL: &str = "{complexity_level}";
const NUM_QUESTIONS: &str = "{num_questions}";

/// Instructions sent with every generation request.
///
/// The numbered requirements are guidance for the model; nothing checks
/// that the answer follows them.
pub const DEFAULT_TEMPLATE: &str = "\
You are an AI designed to analyze and extract meaningful information from text documents. \
Your task is to read the content of a PDF document uploaded by the user and generate insightful, \
relevant, and clear questions based on the context.

Context: {context}

Here are the requirements for the questions you generate:
1. Focus on the main ideas, key points, and important details in the content.
2. Ensure the questions are concise and cover a range of topics from the document.
3. Include questions of varying complexity, such as factual, analytical, and critical-thinking questions.
4. Provide the specified types of questions (e.g., multiple-choice, short-answer, true-false, or open-ended) based on user instructions.
5. Adjust the complexity of the questions based on the depth of the content or user requirements (basic, intermediate, or advanced level).
6. The number of questions should vary between 5-20, depending on the length and richness of the content or user preferences.

Input Parameters:
- Question Types: {question_types} (e.g., multiple-choice, short-answer, true-false, open-ended)
- Complexity Level: {complexity_level} (e.g., basic, intermediate, advanced)
- Number of Questions: {num_questions}

Output: A list of {question_types} questions that align with the user's requirements and the provided content.

Please start generating the questions based on the input context and parameters.
";

/// A prompt with `{context}`, `{question_types}`, `{complexity_level}` and
/// `{num_questions}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: Cow<'static, str>,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            template: Cow::Borrowed(DEFAULT_TEMPLATE),
        }
    }
}

impl PromptTemplate {
    /// Uses a custom template; it must contain a `{context}` placeholder.
    pub fn custom(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(CONTEXT) {
            return Err(Error::config("prompt template has no {context} placeholder"));
        }
        Ok(Self {
            template: Cow::Owned(template),
        })
    }

    /// Returns the raw template.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Fills the placeholders.
    ///
    /// The requested count is inserted as is.
    pub fn render(&self, context: &str, settings: &QuizSettings) -> String {
        // Context last so placeholders inside document text stay untouched.
        self.template
            .replace(QUESTION_TYPES, settings.question_type.as_ref())
            .replace(COMPLEXITY_LEVEL, settings.complexity.as_ref())
            .replace(NUM_QUESTIONS, &settings.num_questions.to_string())
            .replace(CONTEXT, context)
    }
}

/// Joins retrieved chunks into the context block, in retrieval order.
pub fn format_context(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use quizgen_core::quiz::{ComplexityLevel, QuestionCount, QuestionType};

    use super::*;

    fn settings() -> QuizSettings {
        QuizSettings::new(
            QuestionType::TrueFalse,
            ComplexityLevel::Advanced,
            QuestionCount::new(17).unwrap(),
        )
    }

    #[test]
    fn fills_every_placeholder() {
        let prompt = PromptTemplate::default().render("Cells divide by mitosis.", &settings());

        assert!(prompt.contains("Context: Cells divide by mitosis."));
        assert!(prompt.contains("- Question Types: true-false"));
        assert!(prompt.contains("- Complexity Level: advanced"));
        assert!(prompt.contains("- Number of Questions: 17"));
        assert!(prompt.contains("Output: A list of true-false questions"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn placeholders_in_document_text_are_left_alone() {
        let prompt = PromptTemplate::default().render("literal {num_questions}", &settings());
        assert!(prompt.contains("Context: literal {num_questions}"));
    }

    #[test]
    fn custom_template_needs_context() {
        assert!(PromptTemplate::custom("no placeholders").is_err());
        let template = PromptTemplate::custom("{context} -> {num_questions}").unwrap();
        assert_eq!(template.render("abc", &settings()), "abc -> 17");
    }

    #[test]
    fn context_joins_chunks_in_order() {
        let chunk = |i: u32, text: &str| RetrievedChunk {
            chunk_index: i,
            score: 1.0,
            start_offset: 0,
            end_offset: 0,
            text: text.to_owned(),
        };
        let context = format_context(&[chunk(3, " second "), chunk(0, "first"), chunk(1, "  ")]);
        assert_eq!(context, "second\n\nfirst");
    }
}
