//! Analytics over a subject's records
//!
//! - Growth z-scores by the LMS method, weight trend and derived anthropometry
//! - Weekly nutrient adequacy with food and recipe suggestions
//! - Free-text vaccination due dates and schedule status
//! - Prediction feature extraction and cache reuse
//! - Aggregate risk classification

pub mod due_date;
pub mod features;
pub mod growth;
pub mod nutrition;
pub mod prediction;
pub mod recipes;
pub mod risk;
pub mod vaccination;

pub use due_date::*;
pub use features::*;
pub use growth::*;
pub use nutrition::*;
pub use prediction::*;
pub use recipes::*;
pub use risk::*;
pub use vaccination::*;
