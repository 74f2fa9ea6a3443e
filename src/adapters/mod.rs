//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Session token validation (JWT, mock)
//! - `http` - Axum routes, handlers and middleware
//! - `postgres` - PostgreSQL-backed profile and personal data access
//! - `storage` - In-memory profile store (testing/development)

pub mod auth;
pub mod http;
pub mod postgres;
pub mod storage;

pub use auth::{JwtConfig, JwtSessionValidator, MockSessionValidator};
pub use postgres::{PostgresPersonalDataReader, PostgresProfileRepository};
pub use storage::{DataSource, InMemoryProfileStore, StoredMessage, UserData};
