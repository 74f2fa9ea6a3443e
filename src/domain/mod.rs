//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, auth)
//! - `holistic` - Sharing policy, filters and the aggregated profile view

pub mod foundation;
pub mod holistic;
