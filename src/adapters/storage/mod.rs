//! Storage Adapters
//!
//! In-process implementations of the profile ports.
//!
//! ## Available Adapters
//!
//! - **InMemoryProfileStore** - Profiles and personal data in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{InMemoryProfileStore, UserData};
//!
//! let store = InMemoryProfileStore::new();
//! store.insert_profile(HolisticProfile::new(alice.clone())).await;
//! store.insert_data(alice, UserData::default()).await;
//! ```

mod in_memory_profile_store;

pub use in_memory_profile_store::{DataSource, InMemoryProfileStore, StoredMessage, UserData};
