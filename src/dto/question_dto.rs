use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{Error, Result};
use crate::models::question::{
    answer_label, label_position, FeedbackStatus, FeedbackType, OpenValidationType,
    QuestionDifficulty, QuestionStatus, QuestionType,
};
use crate::utils::validation::rule_error;
use crate::validators::question::{validate_question_answers, validate_question_keywords};

pub const IMPORT_ANSWER_SLOTS: usize = 5;

fn default_points() -> f64 {
    1.0
}

fn default_weight() -> f64 {
    1.0
}

pub(crate) fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule_error("required", "Il campo è obbligatorio"));
    }
    Ok(())
}

fn synonyms_not_blank(values: &[String]) -> std::result::Result<(), ValidationError> {
    if values.iter().any(|s| s.trim().is_empty()) {
        return Err(rule_error("blank_synonym", "I sinonimi non possono essere vuoti"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAnswerInput {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
    #[serde(default)]
    pub text_latex: Option<String>,
    #[serde(default)]
    #[validate(url(message = "URL dell'immagine non valido"))]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub label: Option<String>,
}

impl QuestionAnswerInput {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            text_latex: None,
            image_url: None,
            is_correct,
            explanation: None,
            order: 0,
            label: None,
        }
    }
}

/// Re-numbers answers by position: order 0.., label A, B, C, ...
pub fn assign_answer_labels(answers: &mut [QuestionAnswerInput]) {
    for (idx, answer) in answers.iter_mut().enumerate() {
        answer.order = idx as u32;
        answer.label = Some(answer_label(idx));
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionKeywordInput {
    #[validate(custom(function = "not_blank"))]
    pub keyword: String,
    #[serde(default = "default_weight")]
    #[validate(range(min = 0.0, max = 10.0, message = "Il peso deve essere tra 0 e 10"))]
    pub weight: f64,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_suggested: bool,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub exact_match: bool,
    #[serde(default)]
    #[validate(custom(function = "synonyms_not_blank"))]
    pub synonyms: Vec<String>,
}

impl QuestionKeywordInput {
    pub fn new(keyword: impl Into<String>, is_required: bool) -> Self {
        Self {
            keyword: keyword.into(),
            weight: default_weight(),
            is_required,
            is_suggested: false,
            case_sensitive: false,
            exact_match: false,
            synonyms: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_question_rules", skip_on_field_errors = false))]
pub struct CreateQuestionInput {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
    #[serde(default)]
    pub text_latex: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub status: QuestionStatus,
    #[serde(default)]
    pub difficulty: QuestionDifficulty,
    #[validate(custom(function = "not_blank"))]
    pub subject_id: String,
    #[serde(default)]
    pub topic_id: Option<String>,
    #[serde(default)]
    pub general_explanation: Option<String>,
    #[serde(default)]
    #[validate(url(message = "URL dell'immagine non valido"))]
    pub image_url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1900, max = 2100, message = "L'anno deve essere tra 1900 e 2100"))]
    pub year: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Il tempo limite non può essere negativo"))]
    pub time_limit_seconds: Option<i64>,
    #[serde(default = "default_points")]
    #[validate(range(min = 0.0, message = "Il punteggio non può essere negativo"))]
    pub points: f64,
    #[serde(default)]
    #[validate(range(max = 0.0, message = "La penalità deve essere zero o negativa"))]
    pub negative_points: f64,
    #[serde(default)]
    pub open_validation_type: Option<OpenValidationType>,
    #[serde(default)]
    #[validate(nested)]
    pub answers: Vec<QuestionAnswerInput>,
    #[serde(default)]
    #[validate(nested)]
    pub keywords: Vec<QuestionKeywordInput>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn check_question_rules(q: &CreateQuestionInput) -> std::result::Result<(), ValidationError> {
    let answers = validate_question_answers(q.question_type, &q.answers);
    if let Some(msg) = answers.error {
        return Err(rule_error("answers", msg));
    }
    let keywords = validate_question_keywords(q.question_type, q.open_validation_type, &q.keywords);
    if let Some(msg) = keywords.error {
        return Err(rule_error("keywords", msg));
    }
    Ok(())
}

/// One row of a spreadsheet import, before it is turned into a question.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_import_row"))]
pub struct QuestionImportRow {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub difficulty: QuestionDifficulty,
    #[validate(custom(function = "not_blank"))]
    pub subject_code: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub answer_a: Option<String>,
    #[serde(default)]
    pub answer_b: Option<String>,
    #[serde(default)]
    pub answer_c: Option<String>,
    #[serde(default)]
    pub answer_d: Option<String>,
    #[serde(default)]
    pub answer_e: Option<String>,
    #[serde(default)]
    pub correct_answers: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default = "default_points")]
    #[validate(range(min = 0.0, message = "Il punteggio non può essere negativo"))]
    pub points: f64,
    #[serde(default)]
    #[validate(range(max = 0.0, message = "La penalità deve essere zero o negativa"))]
    pub negative_points: f64,
    #[serde(default)]
    #[validate(range(min = 1900, max = 2100, message = "L'anno deve essere tra 1900 e 2100"))]
    pub year: Option<i32>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

fn check_import_row(row: &QuestionImportRow) -> std::result::Result<(), ValidationError> {
    let has_correct = row
        .correct_answers
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());
    if row.question_type.is_choice() && !has_correct {
        return Err(rule_error(
            "correct_answers",
            "Indicare la lettera della risposta corretta",
        ));
    }
    Ok(())
}

impl QuestionImportRow {
    pub fn answer_slots(&self) -> [Option<&str>; IMPORT_ANSWER_SLOTS] {
        [
            self.answer_a.as_deref(),
            self.answer_b.as_deref(),
            self.answer_c.as_deref(),
            self.answer_d.as_deref(),
            self.answer_e.as_deref(),
        ]
    }

    /// Letters listed in `correctAnswers`, split on commas, semicolons or spaces.
    pub fn correct_positions(&self) -> Result<Vec<usize>> {
        let raw = self.correct_answers.as_deref().unwrap_or_default();
        raw.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| {
                label_position(part)
                    .filter(|pos| *pos < IMPORT_ANSWER_SLOTS)
                    .ok_or_else(|| {
                        Error::BadRequest(format!("Lettera di risposta non valida: {}", part))
                    })
            })
            .collect()
    }

    /// Builds the question payload, checking the row and the resulting question.
    pub fn into_question_input(self, subject_id: &str) -> Result<CreateQuestionInput> {
        self.validate()?;

        let correct = self.correct_positions()?;
        let slots = self.answer_slots();
        for pos in &correct {
            if slots[*pos].map_or(true, |text| text.trim().is_empty()) {
                return Err(Error::BadRequest(format!(
                    "La risposta {} indicata come corretta è vuota",
                    answer_label(*pos)
                )));
            }
        }

        let mut answers: Vec<QuestionAnswerInput> = slots
            .into_iter()
            .enumerate()
            .filter_map(|(pos, text)| {
                let text = text.map(str::trim).filter(|t| !t.is_empty())?;
                Some(QuestionAnswerInput::new(text, correct.contains(&pos)))
            })
            .collect();
        assign_answer_labels(&mut answers);

        let tags = self
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();

        let question = CreateQuestionInput {
            text: self.text.trim().to_string(),
            text_latex: None,
            description: None,
            question_type: self.question_type,
            status: QuestionStatus::Draft,
            difficulty: self.difficulty,
            subject_id: subject_id.to_string(),
            topic_id: None,
            general_explanation: self.explanation,
            image_url: None,
            source: self.source,
            year: self.year,
            time_limit_seconds: None,
            points: self.points,
            negative_points: self.negative_points,
            open_validation_type: if self.question_type == QuestionType::OpenText {
                Some(OpenValidationType::Manual)
            } else {
                None
            },
            answers,
            keywords: Vec::new(),
            tags,
        };
        question.validate()?;
        Ok(question)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionFeedbackInput {
    #[validate(custom(function = "not_blank"))]
    pub question_id: String,
    #[serde(rename = "type")]
    pub feedback_type: FeedbackType,
    #[validate(length(
        min = 10,
        max = 1000,
        message = "La segnalazione deve contenere tra 10 e 1000 caratteri"
    ))]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_feedback_review"))]
pub struct FeedbackReviewInput {
    pub status: FeedbackStatus,
    #[serde(default)]
    #[validate(length(max = 2000, message = "La risposta non può superare 2000 caratteri"))]
    pub admin_response: Option<String>,
}

fn check_feedback_review(input: &FeedbackReviewInput) -> std::result::Result<(), ValidationError> {
    let has_response = input
        .admin_response
        .as_deref()
        .is_some_and(|r| !r.trim().is_empty());
    if input.status == FeedbackStatus::Rejected && !has_response {
        return Err(rule_error(
            "admin_response",
            "Specificare il motivo del rifiuto",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_position() {
        let mut answers = vec![
            QuestionAnswerInput::new("uno", true),
            QuestionAnswerInput::new("due", false),
            QuestionAnswerInput::new("tre", false),
        ];
        assign_answer_labels(&mut answers);
        let labels: Vec<_> = answers.iter().map(|a| a.label.clone().unwrap()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
        assert_eq!(answers[2].order, 2);
    }

    #[test]
    fn correct_positions_accepts_mixed_separators() {
        let row = QuestionImportRow {
            text: "Domanda".to_string(),
            question_type: QuestionType::MultipleChoice,
            difficulty: QuestionDifficulty::Medium,
            subject_code: "BIO".to_string(),
            topic: None,
            answer_a: Some("a".to_string()),
            answer_b: Some("b".to_string()),
            answer_c: Some("c".to_string()),
            answer_d: None,
            answer_e: None,
            correct_answers: Some("a; C".to_string()),
            explanation: None,
            points: 1.0,
            negative_points: 0.0,
            year: None,
            source: None,
            tags: None,
        };
        assert_eq!(row.correct_positions().unwrap(), vec![0, 2]);
    }
}
