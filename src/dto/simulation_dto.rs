use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::{Validate, ValidationError};

use crate::dto::question_dto::not_blank;
use crate::models::simulation::{
    CreationMode, DifficultyDistribution, DifficultyMix, LocationType, SimulationPreset,
    SimulationType, SimulationVisibility, SubjectDistribution,
};
use crate::utils::time::from_rfc3339;
use crate::utils::validation::rule_error;
use crate::validators::simulation::{
    requires_scheduling, validate_date_range, validate_passing_score,
    validate_question_distribution,
};

pub const ERR_NO_TARGET: &str = "Specificare almeno uno studente o un gruppo";
pub const ERR_BAD_TIMESTAMP: &str = "Data non valida: usare il formato ISO 8601 completo";
pub const ERR_DATE_ORDER: &str = "La data di fine deve essere successiva alla data di inizio";
pub const ERR_PASSING_SCORE: &str = "Il punteggio minimo non può superare il punteggio massimo";
pub const ERR_DISTRIBUTION: &str =
    "La somma della distribuzione per materia deve essere uguale al numero totale di domande";
pub const ERR_SECTIONS: &str =
    "La somma delle domande delle sezioni deve essere uguale al numero totale di domande";
pub const ERR_SCHEDULE: &str =
    "Le simulazioni ufficiali e le esercitazioni richiedono una data di inizio";
pub const ERR_QUESTION_IDS: &str =
    "Il numero di domande selezionate non può superare il numero totale di domande";
pub const ERR_DUPLICATE_QUESTIONS: &str = "La simulazione contiene domande duplicate";

fn default_true() -> bool {
    true
}

fn default_points() -> f64 {
    1.0
}

fn default_quiz_questions() -> u32 {
    10
}

fn default_quiz_minutes() -> u32 {
    15
}

/// Parses an optional timestamp, rejecting date-only or offset-less strings.
fn optional_timestamp(
    value: Option<&str>,
) -> std::result::Result<Option<DateTime<Utc>>, ValidationError> {
    match value {
        None => Ok(None),
        Some(raw) => from_rfc3339(raw)
            .map(Some)
            .map_err(|_| rule_error("timestamp", ERR_BAD_TIMESTAMP)),
    }
}

fn has_id(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// One recipient of a simulation assignment: a student, a group, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_assignment_target"))]
pub struct AssignmentTarget {
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub location_type: Option<LocationType>,
    #[serde(default)]
    pub create_calendar_event: bool,
}

fn check_assignment_target(target: &AssignmentTarget) -> std::result::Result<(), ValidationError> {
    if !has_id(&target.student_id) && !has_id(&target.group_id) {
        return Err(rule_error("no_target", ERR_NO_TARGET));
    }
    let start = optional_timestamp(target.start_date.as_deref())?;
    let due = optional_timestamp(target.due_date.as_deref())?;
    if !validate_date_range(start, due) {
        return Err(rule_error("date_order", ERR_DATE_ORDER));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkAssignmentInput {
    #[validate(custom(function = "not_blank"))]
    pub simulation_id: String,
    #[validate(length(min = 1, message = "Selezionare almeno un destinatario"), nested)]
    pub targets: Vec<AssignmentTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSection {
    #[validate(custom(function = "not_blank"))]
    pub id: String,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(range(min = 1, message = "La durata della sezione deve essere maggiore di zero"))]
    pub duration_minutes: u32,
    #[serde(default)]
    pub question_count: Option<u32>,
    #[serde(default)]
    pub subject_id: Option<String>,
    #[serde(default)]
    pub question_ids: Vec<String>,
    #[serde(default)]
    pub order: u32,
}

/// A student's on-demand practice quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuickQuizConfig {
    #[validate(length(min = 1, message = "Selezionare almeno una materia"))]
    pub subject_ids: Vec<String>,
    #[serde(default)]
    pub topic_ids: Vec<String>,
    #[serde(default = "default_quiz_questions")]
    #[validate(range(min = 5, max = 100, message = "Il quiz deve avere tra 5 e 100 domande"))]
    pub question_count: u32,
    #[serde(default)]
    pub difficulty_mix: DifficultyMix,
    #[serde(default = "default_quiz_minutes")]
    #[validate(range(min = 1, max = 180, message = "La durata deve essere tra 1 e 180 minuti"))]
    pub duration_minutes: u32,
    #[serde(default = "default_points")]
    #[validate(range(min = 0.0, message = "Il punteggio non può essere negativo"))]
    pub correct_points: f64,
    #[serde(default)]
    #[validate(range(max = 0.0, message = "La penalità deve essere zero o negativa"))]
    pub wrong_points: f64,
    #[serde(default)]
    pub blank_points: f64,
    #[serde(default = "default_true")]
    pub show_correct_answers: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "check_simulation_rules"))]
pub struct CreateSimulationInput {
    #[validate(length(min = 3, max = 200, message = "Il titolo deve contenere tra 3 e 200 caratteri"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub simulation_type: SimulationType,
    #[serde(default)]
    pub visibility: SimulationVisibility,
    #[serde(default)]
    pub creation_mode: CreationMode,
    #[serde(default)]
    pub difficulty_mix: Option<DifficultyMix>,
    #[serde(default)]
    pub is_paper_based: bool,
    /// Zero means untimed.
    #[serde(default)]
    pub duration_minutes: u32,
    #[validate(range(min = 1, message = "La simulazione deve avere almeno una domanda"))]
    pub total_questions: u32,
    #[serde(default = "default_points")]
    pub correct_points: f64,
    #[serde(default)]
    #[validate(range(max = 0.0, message = "La penalità deve essere zero o negativa"))]
    pub wrong_points: f64,
    #[serde(default)]
    pub blank_points: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Il punteggio massimo non può essere negativo"))]
    pub max_score: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Il punteggio minimo non può essere negativo"))]
    pub passing_score: Option<f64>,
    #[serde(default = "default_true")]
    pub show_results: bool,
    #[serde(default)]
    pub show_correct_answers: bool,
    #[serde(default = "default_true")]
    pub allow_review: bool,
    #[serde(default)]
    pub randomize_order: bool,
    #[serde(default)]
    pub randomize_answers: bool,
    #[serde(default)]
    pub is_repeatable: bool,
    #[serde(default)]
    #[validate(range(min = 1, message = "Il numero di tentativi deve essere almeno 1"))]
    pub max_attempts: Option<u32>,
    #[serde(default)]
    pub enable_anti_cheat: bool,
    #[serde(default)]
    pub force_fullscreen: bool,
    #[serde(default)]
    pub block_copy_paste: bool,
    #[serde(default)]
    pub log_tab_changes: bool,
    #[serde(default)]
    pub max_tab_changes: Option<u32>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub subject_distribution: Option<SubjectDistribution>,
    #[serde(default)]
    pub difficulty_distribution: Option<DifficultyDistribution>,
    #[serde(default)]
    #[validate(nested)]
    pub sections: Vec<SimulationSection>,
    #[serde(default)]
    pub question_ids: Vec<String>,
    #[serde(default)]
    pub group_ids: Vec<String>,
}

fn check_simulation_rules(sim: &CreateSimulationInput) -> std::result::Result<(), ValidationError> {
    let start = optional_timestamp(sim.start_date.as_deref())?;
    let end = optional_timestamp(sim.end_date.as_deref())?;
    if !validate_date_range(start, end) {
        return Err(rule_error("date_order", ERR_DATE_ORDER));
    }
    if requires_scheduling(sim.simulation_type) && !sim.is_paper_based && start.is_none() {
        return Err(rule_error("schedule", ERR_SCHEDULE));
    }
    if !validate_passing_score(sim.passing_score, sim.max_score) {
        return Err(rule_error("passing_score", ERR_PASSING_SCORE));
    }
    if !validate_question_distribution(sim.total_questions, sim.subject_distribution.as_ref()) {
        return Err(rule_error("distribution", ERR_DISTRIBUTION));
    }

    let section_counts: Option<Vec<u32>> =
        sim.sections.iter().map(|s| s.question_count).collect();
    if let Some(counts) = section_counts.filter(|c| !c.is_empty()) {
        let declared: u64 = counts.iter().map(|c| u64::from(*c)).sum();
        if declared != u64::from(sim.total_questions) {
            return Err(rule_error("sections", ERR_SECTIONS));
        }
    }

    if !sim.question_ids.is_empty() {
        let unique: HashSet<&str> = sim.question_ids.iter().map(String::as_str).collect();
        if unique.len() != sim.question_ids.len() {
            return Err(rule_error("question_ids", ERR_DUPLICATE_QUESTIONS));
        }
        if sim.creation_mode == CreationMode::Manual
            && !sim.is_paper_based
            && sim.question_ids.len() > sim.total_questions as usize
        {
            return Err(rule_error("question_ids", ERR_QUESTION_IDS));
        }
    }
    Ok(())
}

impl CreateSimulationInput {
    /// Starts a simulation from a preset; dates and content are left to the caller.
    pub fn from_preset(preset: &SimulationPreset, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            simulation_type: preset.simulation_type,
            visibility: SimulationVisibility::default(),
            creation_mode: CreationMode::default(),
            difficulty_mix: None,
            is_paper_based: preset.is_paper_based,
            duration_minutes: preset.duration_minutes,
            total_questions: preset.total_questions,
            correct_points: preset.correct_points,
            wrong_points: preset.wrong_points,
            blank_points: preset.blank_points,
            max_score: Some(preset.correct_points * f64::from(preset.total_questions)),
            passing_score: None,
            show_results: preset.show_results,
            show_correct_answers: preset.show_correct_answers,
            allow_review: preset.allow_review,
            randomize_order: preset.randomize_order,
            randomize_answers: preset.randomize_answers,
            is_repeatable: preset.is_repeatable,
            max_attempts: preset.max_attempts,
            enable_anti_cheat: preset.enable_anti_cheat,
            force_fullscreen: preset.force_fullscreen,
            block_copy_paste: preset.block_copy_paste,
            log_tab_changes: preset.log_tab_changes,
            max_tab_changes: preset.max_tab_changes,
            start_date: None,
            end_date: None,
            subject_distribution: None,
            difficulty_distribution: None,
            sections: Vec::new(),
            question_ids: Vec::new(),
            group_ids: Vec::new(),
        }
    }
}
