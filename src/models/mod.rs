pub mod contact;
pub mod profile;
pub mod question;
pub mod result;
pub mod simulation;
