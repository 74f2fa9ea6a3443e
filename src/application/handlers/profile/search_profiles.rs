//! SearchProfiles - Query handler for username lookup.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Username};
use crate::ports::HolisticProfileRepository;

/// Query for usernames containing a fragment.
#[derive(Debug, Clone)]
pub struct SearchProfilesQuery {
    pub fragment: String,
}

/// Handler for searching profiles by username.
pub struct SearchProfilesHandler {
    repository: Arc<dyn HolisticProfileRepository>,
}

impl SearchProfilesHandler {
    pub fn new(repository: Arc<dyn HolisticProfileRepository>) -> Self {
        Self { repository }
    }

    /// A blank fragment matches nothing.
    pub async fn handle(&self, query: SearchProfilesQuery) -> Result<Vec<Username>, DomainError> {
        let fragment = query.fragment.trim();
        if fragment.is_empty() {
            return Ok(Vec::new());
        }
        self.repository.search_usernames(fragment).await
    }
}
