use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::dto::question_dto::{CreateQuestionInput, QuestionKeywordInput};
use crate::dto::simulation_dto::{CreateSimulationInput, QuickQuizConfig};
use crate::models::question::{answer_label, QuestionType};
use crate::models::simulation::SimulationPreset;

/// Share of keyword weight an open answer needs, on top of every required keyword.
pub const KEYWORD_PASS_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRules {
    pub correct_points: f64,
    pub wrong_points: f64,
    pub blank_points: f64,
    #[serde(default)]
    pub passing_score: Option<f64>,
}

impl From<&CreateSimulationInput> for ScoringRules {
    fn from(sim: &CreateSimulationInput) -> Self {
        Self {
            correct_points: sim.correct_points,
            wrong_points: sim.wrong_points,
            blank_points: sim.blank_points,
            passing_score: sim.passing_score,
        }
    }
}

impl From<&SimulationPreset> for ScoringRules {
    fn from(preset: &SimulationPreset) -> Self {
        Self {
            correct_points: preset.correct_points,
            wrong_points: preset.wrong_points,
            blank_points: preset.blank_points,
            passing_score: None,
        }
    }
}

impl From<&QuickQuizConfig> for ScoringRules {
    fn from(quiz: &QuickQuizConfig) -> Self {
        Self {
            correct_points: quiz.correct_points,
            wrong_points: quiz.wrong_points,
            blank_points: quiz.blank_points,
            passing_score: None,
        }
    }
}

/// A question as it appears inside a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationQuestion {
    pub id: String,
    #[serde(flatten)]
    pub question: CreateQuestionInput,
}

/// A student's answer: selected answer positions for choice questions, text for open ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: String,
    #[serde(default)]
    pub selected: Vec<usize>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnswerOutcome {
    Correct,
    Wrong,
    Blank,
    PendingReview,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionGrade {
    pub question_id: String,
    pub outcome: AnswerOutcome,
    pub points_earned: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selected_labels: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub correct_labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_score: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matched_keywords: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_required_keywords: Vec<String>,
    pub needs_review: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationGrade {
    pub total_score: f64,
    pub max_score: f64,
    pub correct_count: u32,
    pub wrong_count: u32,
    pub blank_count: u32,
    pub pending_review_count: u32,
    pub needs_review: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
    pub questions: Vec<QuestionGrade>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordMatch {
    pub score: f64,
    pub matched: Vec<String>,
    pub missing_required: Vec<String>,
}

impl KeywordMatch {
    pub fn passes(&self) -> bool {
        self.missing_required.is_empty() && self.score >= KEYWORD_PASS_RATIO
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub struct GradingService;

impl GradingService {
    /// True when `text` contains the keyword or one of its synonyms.
    ///
    /// `exact_match` requires whole words; otherwise any substring counts.
    pub fn keyword_matches(text: &str, keyword: &QuestionKeywordInput) -> bool {
        std::iter::once(&keyword.keyword)
            .chain(keyword.synonyms.iter())
            .map(|term| term.trim())
            .filter(|term| !term.is_empty())
            .any(|term| {
                if keyword.exact_match {
                    let pattern = format!(r"\b{}\b", regex::escape(term));
                    RegexBuilder::new(&pattern)
                        .case_insensitive(!keyword.case_sensitive)
                        .build()
                        .map(|re| re.is_match(text))
                        .unwrap_or(false)
                } else if keyword.case_sensitive {
                    text.contains(term)
                } else {
                    text.to_lowercase().contains(&term.to_lowercase())
                }
            })
    }

    /// Weighted share of keywords found in `text`, plus the required ones that are missing.
    pub fn match_keywords(text: &str, keywords: &[QuestionKeywordInput]) -> KeywordMatch {
        let mut result = KeywordMatch::default();
        let mut total_weight = 0.0;
        let mut matched_weight = 0.0;

        for keyword in keywords {
            total_weight += keyword.weight;
            if Self::keyword_matches(text, keyword) {
                matched_weight += keyword.weight;
                result.matched.push(keyword.keyword.clone());
            } else if keyword.is_required {
                result.missing_required.push(keyword.keyword.clone());
            }
        }

        if total_weight > 0.0 {
            result.score = round2(matched_weight / total_weight);
        } else if result.missing_required.is_empty() {
            // weightless keywords: presence of the required ones decides
            result.score = 1.0;
        }
        result
    }

    fn grade_choice(
        question: &CreateQuestionInput,
        selected: &[usize],
    ) -> (AnswerOutcome, Vec<String>, Vec<String>) {
        let chosen: BTreeSet<usize> = selected.iter().copied().collect();
        let correct: BTreeSet<usize> = question
            .answers
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_correct)
            .map(|(pos, _)| pos)
            .collect();

        let selected_labels = chosen.iter().map(|p| answer_label(*p)).collect();
        let correct_labels = correct.iter().map(|p| answer_label(*p)).collect();

        let outcome = if chosen.is_empty() {
            AnswerOutcome::Blank
        } else if chosen == correct {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Wrong
        };
        (outcome, selected_labels, correct_labels)
    }

    pub fn grade_question(
        item: &SimulationQuestion,
        answer: Option<&SubmittedAnswer>,
        rules: &ScoringRules,
    ) -> QuestionGrade {
        let question = &item.question;
        let mut grade = QuestionGrade {
            question_id: item.id.clone(),
            outcome: AnswerOutcome::Blank,
            points_earned: 0.0,
            selected_labels: Vec::new(),
            correct_labels: Vec::new(),
            keyword_score: None,
            matched_keywords: Vec::new(),
            missing_required_keywords: Vec::new(),
            needs_review: false,
        };

        match question.question_type {
            QuestionType::SingleChoice | QuestionType::MultipleChoice => {
                let selected = answer.map(|a| a.selected.as_slice()).unwrap_or_default();
                let (outcome, selected_labels, correct_labels) =
                    Self::grade_choice(question, selected);
                grade.outcome = outcome;
                grade.selected_labels = selected_labels;
                grade.correct_labels = correct_labels;
            }
            QuestionType::OpenText => {
                let text = answer
                    .and_then(|a| a.text.as_deref())
                    .map(str::trim)
                    .unwrap_or_default();
                if text.is_empty() {
                    grade.outcome = AnswerOutcome::Blank;
                } else {
                    let validation = question.open_validation_type;
                    grade.needs_review = validation.map_or(true, |v| v.needs_review());
                    grade.outcome = match validation {
                        Some(v) if v.uses_keywords() => {
                            let found = Self::match_keywords(text, &question.keywords);
                            let outcome = if found.passes() {
                                AnswerOutcome::Correct
                            } else {
                                AnswerOutcome::Wrong
                            };
                            grade.keyword_score = Some(found.score);
                            grade.matched_keywords = found.matched;
                            grade.missing_required_keywords = found.missing_required;
                            outcome
                        }
                        _ => AnswerOutcome::PendingReview,
                    };
                }
            }
        }

        grade.points_earned = match grade.outcome {
            AnswerOutcome::Correct => rules.correct_points,
            AnswerOutcome::Wrong => rules.wrong_points,
            AnswerOutcome::Blank => rules.blank_points,
            AnswerOutcome::PendingReview => 0.0,
        };
        grade
    }

    /// Grades every question in order; questions without a submitted answer count as blank.
    pub fn grade_simulation(
        questions: &[SimulationQuestion],
        answers: &[SubmittedAnswer],
        rules: &ScoringRules,
    ) -> SimulationGrade {
        let by_question: HashMap<&str, &SubmittedAnswer> = answers
            .iter()
            .map(|a| (a.question_id.as_str(), a))
            .collect();

        let unknown = answers
            .iter()
            .filter(|a| !questions.iter().any(|q| q.id == a.question_id))
            .count();
        if unknown > 0 {
            tracing::debug!(unknown, "ignoring answers for questions outside the simulation");
        }

        let mut grade = SimulationGrade {
            total_score: 0.0,
            max_score: round2(rules.correct_points * questions.len() as f64),
            correct_count: 0,
            wrong_count: 0,
            blank_count: 0,
            pending_review_count: 0,
            needs_review: false,
            passed: None,
            questions: Vec::with_capacity(questions.len()),
        };

        let mut total = 0.0;
        for item in questions {
            let question_grade =
                Self::grade_question(item, by_question.get(item.id.as_str()).copied(), rules);
            match question_grade.outcome {
                AnswerOutcome::Correct => grade.correct_count += 1,
                AnswerOutcome::Wrong => grade.wrong_count += 1,
                AnswerOutcome::Blank => grade.blank_count += 1,
                AnswerOutcome::PendingReview => grade.pending_review_count += 1,
            }
            grade.needs_review |= question_grade.needs_review;
            total += question_grade.points_earned;
            grade.questions.push(question_grade);
        }

        grade.total_score = round2(total);
        // provisional scores are not compared against the threshold
        if !grade.needs_review {
            grade.passed = rules.passing_score.map(|min| grade.total_score >= min);
        }

        tracing::debug!(
            questions = questions.len(),
            score = grade.total_score,
            max = grade.max_score,
            needs_review = grade.needs_review,
            "simulation graded"
        );
        grade
    }
}
