//! Holistic profile domain.
//!
//! A holistic profile spans several independently stored facets of a user
//! (demographics, affects, behavior, cognitive aspects, interests, physical
//! state and social relations). Each facet is gated by a sharing flag the
//! owner controls.
//!
//! # Domain Invariants
//!
//! 1. A category whose flag is off resolves to the not-shared sentinel,
//!    whatever data exists
//! 2. A shared category with zero matching records resolves to
//!    "Missing information"
//! 3. No fetcher returns more records than the request limit
//! 4. Policy updates are partial; absent flags keep their value
//! 5. The policy version only increases

mod category;
mod filter;
mod policy;
mod profile;
pub mod records;

pub use category::{Category, CategorySelector};
pub use filter::{ParsedFilter, QueryFilter, ResultLimit, TemporalWindow};
pub use policy::{resolve, Access, PolicyUpdate, SharingPolicy};
pub use profile::{
    AggregatedProfile, CategoryValue, CognitiveAspects, HolisticProfile, PhysicalState,
    PolicyVersion, MISSING_INFORMATION, NOT_SHARED, UNAVAILABLE,
};
pub use records::PhysicalKind;
