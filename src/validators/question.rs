//! Cross-field rules for question answers and grading keywords.

use crate::dto::question_dto::{QuestionAnswerInput, QuestionKeywordInput};
use crate::models::question::{OpenValidationType, QuestionType};
use crate::models::result::ValidationResult;

pub const MIN_CHOICE_ANSWERS: usize = 2;

pub const ERR_TOO_FEW_ANSWERS: &str = "Sono necessarie almeno 2 risposte";
pub const ERR_NO_CORRECT_ANSWER: &str = "Almeno una risposta deve essere corretta";
pub const ERR_MULTIPLE_CORRECT: &str =
    "Le domande a risposta singola devono avere una sola risposta corretta";
pub const ERR_NO_KEYWORDS: &str =
    "Le domande a risposta aperta con validazione automatica richiedono almeno una parola chiave";
pub const ERR_NO_REQUIRED_KEYWORD: &str = "Almeno una parola chiave deve essere obbligatoria";

/// Answer-set rules; OPEN_TEXT questions ignore answers entirely.
pub fn validate_question_answers(
    question_type: QuestionType,
    answers: &[QuestionAnswerInput],
) -> ValidationResult {
    if question_type == QuestionType::OpenText {
        return ValidationResult::ok();
    }
    if answers.len() < MIN_CHOICE_ANSWERS {
        return ValidationResult::invalid_field("answers", ERR_TOO_FEW_ANSWERS);
    }

    let correct = answers.iter().filter(|a| a.is_correct).count();
    if correct == 0 {
        return ValidationResult::invalid_field("answers", ERR_NO_CORRECT_ANSWER);
    }
    if question_type == QuestionType::SingleChoice && correct > 1 {
        return ValidationResult::invalid_field("answers", ERR_MULTIPLE_CORRECT);
    }
    ValidationResult::ok()
}

/// Keyword rules, only enforced for OPEN_TEXT graded by keywords.
pub fn validate_question_keywords(
    question_type: QuestionType,
    validation_type: Option<OpenValidationType>,
    keywords: &[QuestionKeywordInput],
) -> ValidationResult {
    if question_type != QuestionType::OpenText {
        return ValidationResult::ok();
    }
    match validation_type {
        Some(vt) if vt.uses_keywords() => {
            if keywords.is_empty() {
                return ValidationResult::invalid_field("keywords", ERR_NO_KEYWORDS);
            }
            if !keywords.iter().any(|k| k.is_required) {
                return ValidationResult::invalid_field("keywords", ERR_NO_REQUIRED_KEYWORD);
            }
            ValidationResult::ok()
        }
        _ => ValidationResult::ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(flags: &[bool]) -> Vec<QuestionAnswerInput> {
        flags
            .iter()
            .enumerate()
            .map(|(i, c)| QuestionAnswerInput::new(format!("risposta {}", i), *c))
            .collect()
    }

    #[test]
    fn open_text_ignores_answers() {
        assert!(validate_question_answers(QuestionType::OpenText, &[]).valid);
        assert!(validate_question_answers(QuestionType::OpenText, &answers(&[true, true])).valid);
    }

    #[test]
    fn choice_needs_two_answers_and_a_correct_one() {
        let one = validate_question_answers(QuestionType::MultipleChoice, &answers(&[true]));
        assert_eq!(one.error.as_deref(), Some(ERR_TOO_FEW_ANSWERS));

        let none = validate_question_answers(QuestionType::SingleChoice, &answers(&[false, false]));
        assert_eq!(none.error.as_deref(), Some(ERR_NO_CORRECT_ANSWER));

        let multi = validate_question_answers(
            QuestionType::MultipleChoice,
            &answers(&[true, true, false]),
        );
        assert!(multi.valid);
    }

    #[test]
    fn single_choice_is_exclusive() {
        let two = validate_question_answers(QuestionType::SingleChoice, &answers(&[true, true]));
        assert_eq!(two.error.as_deref(), Some(ERR_MULTIPLE_CORRECT));
        assert_ne!(ERR_MULTIPLE_CORRECT, ERR_NO_CORRECT_ANSWER);
    }

    #[test]
    fn single_choice_valid_iff_exactly_one_correct() {
        // every combination of up to four answers
        for len in 0..=4usize {
            for mask in 0..(1u32 << len) {
                let flags: Vec<bool> = (0..len).map(|i| mask & (1 << i) != 0).collect();
                let expected = len >= 2 && flags.iter().filter(|f| **f).count() == 1;
                let result = validate_question_answers(QuestionType::SingleChoice, &answers(&flags));
                assert_eq!(result.valid, expected, "flags: {flags:?}");
            }
        }
    }

    #[test]
    fn keywords_only_matter_for_automatic_open_text() {
        let none: Vec<QuestionKeywordInput> = Vec::new();
        assert!(validate_question_keywords(QuestionType::SingleChoice, Some(OpenValidationType::Keywords), &none).valid);
        assert!(validate_question_keywords(QuestionType::OpenText, Some(OpenValidationType::Manual), &none).valid);
        assert!(validate_question_keywords(QuestionType::OpenText, None, &none).valid);

        let missing = validate_question_keywords(QuestionType::OpenText, Some(OpenValidationType::Both), &none);
        assert_eq!(missing.error.as_deref(), Some(ERR_NO_KEYWORDS));

        let optional_only = vec![QuestionKeywordInput::new("mitocondrio", false)];
        let result = validate_question_keywords(
            QuestionType::OpenText,
            Some(OpenValidationType::Keywords),
            &optional_only,
        );
        assert_eq!(result.error.as_deref(), Some(ERR_NO_REQUIRED_KEYWORD));

        let required = vec![QuestionKeywordInput::new("mitocondrio", true)];
        assert!(validate_question_keywords(QuestionType::OpenText, Some(OpenValidationType::Keywords), &required).valid);
    }
}
