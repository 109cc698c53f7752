//! CLI functionality for the child health tool
//!
//! This module contains all CLI-related functionality including:
//! - Session setup (reference data, engine config, evaluation date)
//! - Profile input files
//! - Profile assessment and nutrition reports
//! - Single z-score and due-date calculations
//! - Reference data validation
//! - Output formatting

pub mod assess;
pub mod due_date;
pub mod input;
pub mod nutrition;
pub mod output;
pub mod reference;
pub mod session;
pub mod zscore;
