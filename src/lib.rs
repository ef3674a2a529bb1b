//! PsyCanvas client — drawing upload, questionnaire, and report polling.

pub mod api;
pub mod config;
pub mod error;
pub mod questionnaire;
pub mod render;
pub mod report;
pub mod wizard;
