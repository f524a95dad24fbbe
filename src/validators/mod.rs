//! Field and form validators returning [`ValidationResult`](crate::models::result::ValidationResult).

pub mod anagrafica;
pub mod contact;
pub mod forms;
pub mod question;
pub mod sanitizers;
pub mod simulation;
