pub mod question_dto;
pub mod simulation_dto;
