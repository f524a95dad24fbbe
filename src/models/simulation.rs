use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimulationType {
    Official,
    Practice,
    Custom,
    QuickQuiz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimulationVisibility {
    #[default]
    Private,
    Group,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreationMode {
    #[default]
    Manual,
    SmartRandom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    Online,
    InPerson,
    Hybrid,
}

/// Named difficulty mixing strategy used by smart-random generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DifficultyMix {
    #[default]
    Balanced,
    EasyFocus,
    HardFocus,
    MediumOnly,
    Mixed,
}

impl FromStr for DifficultyMix {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "BALANCED" => Ok(DifficultyMix::Balanced),
            "EASY_FOCUS" => Ok(DifficultyMix::EasyFocus),
            "HARD_FOCUS" => Ok(DifficultyMix::HardFocus),
            "MEDIUM_ONLY" => Ok(DifficultyMix::MediumOnly),
            "MIXED" => Ok(DifficultyMix::Mixed),
            other => Err(format!("Unknown difficulty mix: {}", other)),
        }
    }
}

/// Subject id -> number of questions drawn from that subject.
pub type SubjectDistribution = BTreeMap<String, u32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyDistribution {
    #[serde(rename = "EASY")]
    pub easy: u32,
    #[serde(rename = "MEDIUM")]
    pub medium: u32,
    #[serde(rename = "HARD")]
    pub hard: u32,
}

impl DifficultyDistribution {
    pub fn total(&self) -> u32 {
        self.easy + self.medium + self.hard
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyRatios {
    #[serde(rename = "EASY")]
    pub easy: f64,
    #[serde(rename = "MEDIUM")]
    pub medium: f64,
    #[serde(rename = "HARD")]
    pub hard: f64,
}

/// Default bundle for one exam archetype.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationPreset {
    pub key: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub simulation_type: SimulationType,
    pub duration_minutes: u32,
    pub total_questions: u32,
    pub correct_points: f64,
    pub wrong_points: f64,
    pub blank_points: f64,
    pub show_results: bool,
    pub show_correct_answers: bool,
    pub allow_review: bool,
    pub randomize_order: bool,
    pub randomize_answers: bool,
    pub enable_anti_cheat: bool,
    pub force_fullscreen: bool,
    pub block_copy_paste: bool,
    pub log_tab_changes: bool,
    pub max_tab_changes: Option<u32>,
    pub is_repeatable: bool,
    pub max_attempts: Option<u32>,
    pub is_paper_based: bool,
}

pub const OFFICIAL_TOLC_MED: SimulationPreset = SimulationPreset {
    key: "OFFICIAL_TOLC_MED",
    name: "Simulazione ufficiale TOLC-MED",
    simulation_type: SimulationType::Official,
    duration_minutes: 110,
    total_questions: 60,
    correct_points: 1.5,
    wrong_points: -0.4,
    blank_points: 0.0,
    show_results: false,
    show_correct_answers: false,
    allow_review: false,
    randomize_order: true,
    randomize_answers: true,
    enable_anti_cheat: true,
    force_fullscreen: true,
    block_copy_paste: true,
    log_tab_changes: true,
    max_tab_changes: Some(3),
    is_repeatable: false,
    max_attempts: Some(1),
    is_paper_based: false,
};

pub const PRACTICE_TEST: SimulationPreset = SimulationPreset {
    key: "PRACTICE_TEST",
    name: "Esercitazione",
    simulation_type: SimulationType::Practice,
    duration_minutes: 60,
    total_questions: 30,
    correct_points: 1.0,
    wrong_points: 0.0,
    blank_points: 0.0,
    show_results: true,
    show_correct_answers: true,
    allow_review: true,
    randomize_order: true,
    randomize_answers: true,
    enable_anti_cheat: false,
    force_fullscreen: false,
    block_copy_paste: false,
    log_tab_changes: false,
    max_tab_changes: None,
    is_repeatable: true,
    max_attempts: None,
    is_paper_based: false,
};

pub const QUICK_QUIZ: SimulationPreset = SimulationPreset {
    key: "QUICK_QUIZ",
    name: "Quiz veloce",
    simulation_type: SimulationType::QuickQuiz,
    duration_minutes: 15,
    total_questions: 10,
    correct_points: 1.0,
    wrong_points: 0.0,
    blank_points: 0.0,
    show_results: true,
    show_correct_answers: true,
    allow_review: true,
    randomize_order: true,
    randomize_answers: true,
    enable_anti_cheat: false,
    force_fullscreen: false,
    block_copy_paste: false,
    log_tab_changes: false,
    max_tab_changes: None,
    is_repeatable: true,
    max_attempts: None,
    is_paper_based: false,
};

pub const PAPER_BASED: SimulationPreset = SimulationPreset {
    key: "PAPER_BASED",
    name: "Simulazione cartacea",
    simulation_type: SimulationType::Official,
    duration_minutes: 110,
    total_questions: 60,
    correct_points: 1.5,
    wrong_points: -0.4,
    blank_points: 0.0,
    show_results: false,
    show_correct_answers: false,
    allow_review: false,
    randomize_order: false,
    randomize_answers: false,
    enable_anti_cheat: false,
    force_fullscreen: false,
    block_copy_paste: false,
    log_tab_changes: false,
    max_tab_changes: None,
    is_repeatable: false,
    max_attempts: Some(1),
    is_paper_based: true,
};

pub const SIMULATION_PRESETS: [SimulationPreset; 4] =
    [OFFICIAL_TOLC_MED, PRACTICE_TEST, QUICK_QUIZ, PAPER_BASED];

pub fn find_preset(key: &str) -> Option<&'static SimulationPreset> {
    const PRESETS: &[SimulationPreset] = &SIMULATION_PRESETS;
    PRESETS.iter().find(|p| p.key == key.trim())
}
