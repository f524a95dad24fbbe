pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod utils;
pub mod validators;

pub use crate::error::{Error, Result};
pub use crate::models::result::{FieldErrors, FormResult, ValidationResult};
