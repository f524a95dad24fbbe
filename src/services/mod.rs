pub mod grading_service;
