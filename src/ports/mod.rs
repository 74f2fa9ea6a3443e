//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `HolisticProfileRepository` - Profile records and sharing policy
//! - `PersonalDataReader` - Per-category fetchers over per-user data sources
//! - `SessionValidator` - Caller identity from session tokens

mod personal_data_reader;
mod profile_repository;
mod session_validator;

pub use personal_data_reader::PersonalDataReader;
pub use profile_repository::HolisticProfileRepository;
pub use session_validator::SessionValidator;
