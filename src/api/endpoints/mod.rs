//! Tracker endpoint handlers.

pub mod health;
pub mod insights;
pub mod report;
pub mod weekly;
