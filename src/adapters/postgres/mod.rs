//! PostgreSQL adapters - Database implementations for the profile ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresProfileRepository` - Profile records and sharing policy
//! - `PostgresPersonalDataReader` - Per-category queries over the personal data tables

mod personal_data_reader;
mod profile_repository;

pub use personal_data_reader::PostgresPersonalDataReader;
pub use profile_repository::PostgresProfileRepository;
