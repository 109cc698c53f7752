//! Child health data model
//!
//! This crate defines the records exchanged between the collaborating store and
//! the analytics engine:
//! - Subjects, sex and age groups
//! - Growth measurements and LMS reference rows
//! - Nutrients, meal logs, foods, recipes and requirement bands
//! - Vaccination schedule entries and dose records
//! - Milestones and illness logs
//! - Typed prediction feature vectors and snapshots
//! - Risk verdicts with stable reason codes

pub mod features;
pub mod growth;
pub mod illness;
pub mod meal;
pub mod milestone;
pub mod nutrient;
pub mod recipe;
pub mod risk;
pub mod subject;
pub mod text;
pub mod vaccine;

pub use features::*;
pub use growth::*;
pub use illness::*;
pub use meal::*;
pub use milestone::*;
pub use nutrient::*;
pub use recipe::*;
pub use risk::*;
pub use subject::*;
pub use text::*;
pub use vaccine::*;
