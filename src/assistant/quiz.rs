//! E-waste quiz records.
//!
//! The offline resolver answers quiz requests with [`fixed_quiz`]; replies
//! from the hosted model go through [`parse_quiz`], which also tolerates a
//! Markdown code fence around the JSON array.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Options per question.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("quiz payload is not a JSON question array: {0}")]
    Decode(String),
    #[error("question {index} has {found} options, expected 4")]
    OptionCount { index: usize, found: usize },
    #[error("question {index}: correct answer is not one of its options")]
    AnswerNotInOptions { index: usize },
    #[error("quiz contains no questions")]
    Empty,
}

impl QuizQuestion {
    fn new(question: &str, options: [&str; OPTION_COUNT], correct_answer: &str, explanation: &str) -> Self {
        Self {
            question: question.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct_answer.to_string(),
            explanation: explanation.to_string(),
        }
    }
}

/// The five questions served in offline mode.
pub fn fixed_quiz() -> Vec<QuizQuestion> {
    vec![
        QuizQuestion::new(
            "What makes e-waste particularly harmful to the environment?",
            [
                "It takes up more space in landfills than other waste",
                "It contains toxic materials like lead, mercury, and cadmium",
                "It produces more methane when decomposing",
                "It's harder to collect than regular waste",
            ],
            "It contains toxic materials like lead, mercury, and cadmium",
            "Electronic waste contains various toxic materials including lead, mercury, cadmium, and flame retardants that can leach into soil and groundwater when improperly disposed of in landfills.",
        ),
        QuizQuestion::new(
            "What percentage of e-waste materials can typically be recycled or recovered?",
            ["Around 20-30%", "Around 40-50%", "Around 70-80%", "Over 90%"],
            "Over 90%",
            "More than 90% of the materials in electronic devices can be recovered and reused, including valuable metals like gold, silver, copper, and rare earth elements.",
        ),
        QuizQuestion::new(
            "Which of the following is NOT a component commonly found in e-waste?",
            ["Lead", "Mercury", "Uranium", "Cadmium"],
            "Uranium",
            "While lead, mercury, and cadmium are commonly found in electronic waste, uranium is not a standard component in consumer electronics.",
        ),
        QuizQuestion::new(
            "What is the primary reason for proper data destruction when recycling electronic devices?",
            [
                "To make the recycling process faster",
                "To prevent personal information theft",
                "To recover more valuable materials",
                "To reduce the weight for transportation",
            ],
            "To prevent personal information theft",
            "Proper data destruction ensures that personal and sensitive information stored on devices cannot be accessed by unauthorized individuals, preventing identity theft and data breaches.",
        ),
        QuizQuestion::new(
            "Which approach to e-waste management is considered most environmentally friendly?",
            [
                "Landfilling with proper containment",
                "Incineration with energy recovery",
                "Recycling and resource recovery",
                "Exporting to developing countries",
            ],
            "Recycling and resource recovery",
            "Recycling and resource recovery allows valuable materials to be reused, reduces the need for raw material extraction, and prevents toxic substances from entering the environment.",
        ),
    ]
}

/// [`fixed_quiz`] as a pretty-printed JSON array.
pub fn fixed_quiz_json() -> String {
    serde_json::to_string_pretty(&fixed_quiz()).unwrap_or_else(|_| "[]".to_string())
}

/// Decode and validate a quiz reply.
pub fn parse_quiz(text: &str) -> Result<Vec<QuizQuestion>, QuizError> {
    let questions: Vec<QuizQuestion> =
        serde_json::from_str(strip_code_fence(text)).map_err(|e| QuizError::Decode(e.to_string()))?;
    if questions.is_empty() {
        return Err(QuizError::Empty);
    }
    for (index, q) in questions.iter().enumerate() {
        if q.options.len() != OPTION_COUNT {
            return Err(QuizError::OptionCount { index, found: q.options.len() });
        }
        if !q.options.contains(&q.correct_answer) {
            return Err(QuizError::AnswerNotInOptions { index });
        }
    }
    Ok(questions)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // drop an optional language tag on the opening fence
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
