//! Integration tests for the suppression estimators.
//!
//! All randomized tests use seeded streams so failures reproduce exactly.

#[path = "estimators/scenarios.rs"]
mod scenarios;
#[path = "estimators/properties.rs"]
mod properties;
#[path = "estimators/reproducibility.rs"]
mod reproducibility;
