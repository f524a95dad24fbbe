//! Simulation invariants as plain predicates, usable with or without the DTO schemas.

use crate::models::simulation::{
    DifficultyDistribution, DifficultyMix, DifficultyRatios, SimulationType, SubjectDistribution,
};

/// True when either bound is missing or `end` is strictly after `start`.
pub fn validate_date_range<T: PartialOrd>(start: Option<T>, end: Option<T>) -> bool {
    match (start, end) {
        (Some(start), Some(end)) => end > start,
        _ => true,
    }
}

/// True when either value is missing or `passing <= max`.
pub fn validate_passing_score(passing: Option<f64>, max: Option<f64>) -> bool {
    match (passing, max) {
        (Some(passing), Some(max)) => passing <= max,
        _ => true,
    }
}

pub fn get_total_from_distribution(distribution: &SubjectDistribution) -> u64 {
    distribution.values().map(|v| u64::from(*v)).sum()
}

/// True when there is no distribution or its counts add up to exactly `total`.
pub fn validate_question_distribution(
    total: u32,
    distribution: Option<&SubjectDistribution>,
) -> bool {
    match distribution {
        Some(d) => get_total_from_distribution(d) == u64::from(total),
        None => true,
    }
}

pub fn is_official_simulation(simulation_type: SimulationType) -> bool {
    simulation_type == SimulationType::Official
}

pub fn is_student_creatable(simulation_type: SimulationType) -> bool {
    matches!(
        simulation_type,
        SimulationType::Custom | SimulationType::QuickQuiz
    )
}

pub fn requires_scheduling(simulation_type: SimulationType) -> bool {
    matches!(
        simulation_type,
        SimulationType::Official | SimulationType::Practice
    )
}

impl DifficultyMix {
    pub fn ratios(&self) -> DifficultyRatios {
        let (easy, medium, hard) = match self {
            DifficultyMix::Balanced => (0.3, 0.5, 0.2),
            DifficultyMix::EasyFocus => (0.5, 0.35, 0.15),
            DifficultyMix::HardFocus => (0.15, 0.35, 0.5),
            DifficultyMix::MediumOnly => (0.0, 1.0, 0.0),
            DifficultyMix::Mixed => (0.33, 0.34, 0.33),
        };
        DifficultyRatios { easy, medium, hard }
    }
}

/// Ratio triple for a named mix; unknown names get the BALANCED ratios.
pub fn get_difficulty_ratios(mix: &str) -> DifficultyRatios {
    mix.parse::<DifficultyMix>()
        .unwrap_or_default()
        .ratios()
}

/// Integer question counts per difficulty that add up to exactly `total`.
///
/// Floors each share, then hands the leftover questions to the largest
/// fractional parts (ties go to EASY, then MEDIUM, then HARD).
pub fn split_by_difficulty(total: u32, mix: DifficultyMix) -> DifficultyDistribution {
    let ratios = mix.ratios();
    let shares = [ratios.easy, ratios.medium, ratios.hard].map(|r| r * f64::from(total));
    let mut counts = shares.map(|s| s.floor() as u32);

    let assigned: u32 = counts.iter().sum();
    let mut leftover = total.saturating_sub(assigned);

    let mut by_fraction = [0usize, 1, 2];
    by_fraction.sort_by(|a, b| {
        let fa = shares[*a] - shares[*a].floor();
        let fb = shares[*b] - shares[*b].floor();
        fb.total_cmp(&fa)
    });
    for idx in by_fraction.iter().cycle() {
        if leftover == 0 {
            break;
        }
        counts[*idx] += 1;
        leftover -= 1;
    }

    DifficultyDistribution {
        easy: counts[0],
        medium: counts[1],
        hard: counts[2],
    }
}
