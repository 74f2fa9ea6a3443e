//! UpdateSharingPolicy - Command handler for the owner's sharing flags.

use std::sync::Arc;

use crate::domain::foundation::{CommandMetadata, DomainError, ErrorCode, Username};
use crate::domain::holistic::{PolicyUpdate, PolicyVersion, SharingPolicy};
use crate::ports::HolisticProfileRepository;

/// Message returned when a caller targets someone else's policy.
pub const PERMISSION_DENIED: &str = "You do not have the required permissions.";

/// Command to change some of a profile's sharing flags.
#[derive(Debug, Clone)]
pub struct UpdateSharingPolicyCommand {
    pub username: Username,
    pub update: PolicyUpdate,
}

/// Result of a successful policy update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSharingPolicyResult {
    pub policy: SharingPolicy,
    pub version: PolicyVersion,
}

/// Handler for updating sharing policies.
pub struct UpdateSharingPolicyHandler {
    repository: Arc<dyn HolisticProfileRepository>,
}

impl UpdateSharingPolicyHandler {
    pub fn new(repository: Arc<dyn HolisticProfileRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: UpdateSharingPolicyCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateSharingPolicyResult, DomainError> {
        // 1. Only the owner may change their own flags
        if metadata.caller != cmd.username {
            tracing::warn!(
                caller = %metadata.caller,
                target = %cmd.username,
                correlation_id = %metadata.correlation_id(),
                "rejected policy update for another user"
            );
            return Err(DomainError::new(ErrorCode::Unauthorized, PERMISSION_DENIED));
        }

        // 2. Load the current record
        let mut profile = self
            .repository
            .find_by_username(&cmd.username)
            .await?
            .ok_or_else(|| DomainError::not_found("Username not found."))?;

        // 3. Nothing requested, nothing to write
        if cmd.update.is_empty() {
            tracing::debug!(username = %cmd.username, "empty policy update ignored");
            return Ok(UpdateSharingPolicyResult {
                policy: *profile.policy(),
                version: profile.version(),
            });
        }

        // 4. Merge the flags that were supplied; absent flags keep their value
        profile.update_policy(&cmd.update);

        // 5. Persist
        self.repository.save_policy(&profile).await?;

        tracing::info!(
            username = %cmd.username,
            version = profile.version().as_u32(),
            source = metadata.source().unwrap_or("unknown"),
            "sharing policy updated"
        );

        Ok(UpdateSharingPolicyResult {
            policy: *profile.policy(),
            version: profile.version(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::holistic::{Category, HolisticProfile};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockProfileRepository {
        profiles: Mutex<Vec<HolisticProfile>>,
        fail_save: bool,
    }

    impl MockProfileRepository {
        fn with(profile: HolisticProfile) -> Self {
            Self {
                profiles: Mutex::new(vec![profile]),
                fail_save: false,
            }
        }

        fn stored(&self, username: &Username) -> HolisticProfile {
            self.profiles
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.username() == username)
                .cloned()
                .unwrap()
        }
    }

    #[async_trait]
    impl HolisticProfileRepository for MockProfileRepository {
        async fn find_by_username(
            &self,
            username: &Username,
        ) -> Result<Option<HolisticProfile>, DomainError> {
            Ok(self
                .profiles
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.username() == username)
                .cloned())
        }

        async fn search_usernames(&self, _fragment: &str) -> Result<Vec<Username>, DomainError> {
            unimplemented!()
        }

        async fn save_policy(&self, profile: &HolisticProfile) -> Result<(), DomainError> {
            if self.fail_save {
                return Err(DomainError::database("connection refused"));
            }
            let mut profiles = self.profiles.lock().unwrap();
            profiles.retain(|p| p.username() != profile.username());
            profiles.push(profile.clone());
            Ok(())
        }
    }

    fn user(name: &str) -> Username {
        Username::new(name).unwrap()
    }

    fn command(name: &str, update: PolicyUpdate) -> UpdateSharingPolicyCommand {
        UpdateSharingPolicyCommand {
            username: user(name),
            update,
        }
    }

    #[tokio::test]
    async fn partial_update_changes_only_supplied_flags() {
        let initial = SharingPolicy::private().with(Category::Affects, true);
        let repo = Arc::new(MockProfileRepository::with(
            HolisticProfile::new(user("alice")).with_policy(initial),
        ));
        let handler = UpdateSharingPolicyHandler::new(repo.clone());

        let result = handler
            .handle(
                command("alice", PolicyUpdate::default().set(Category::Interest, true)),
                CommandMetadata::new(user("alice")),
            )
            .await
            .unwrap();

        assert!(result.policy.is_shared(Category::Interest));
        assert!(result.policy.is_shared(Category::Affects));
        assert!(!result.policy.is_shared(Category::Behavior));
        assert_eq!(result.version, PolicyVersion::initial().increment());
        assert_eq!(*repo.stored(&user("alice")).policy(), result.policy);
    }

    #[tokio::test]
    async fn caller_must_own_the_profile() {
        let repo = Arc::new(MockProfileRepository::with(HolisticProfile::new(user("alice"))));
        let handler = UpdateSharingPolicyHandler::new(repo.clone());

        let err = handler
            .handle(
                command("alice", PolicyUpdate::default().set(Category::Behavior, true)),
                CommandMetadata::new(user("mallory")),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), PERMISSION_DENIED);
        assert!(!repo.stored(&user("alice")).policy().is_shared(Category::Behavior));
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let repo = Arc::new(MockProfileRepository::with(HolisticProfile::new(user("alice"))));
        let handler = UpdateSharingPolicyHandler::new(repo);

        let err = handler
            .handle(
                command("ghost", PolicyUpdate::default()),
                CommandMetadata::new(user("ghost")),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn save_failure_propagates() {
        let mut repo = MockProfileRepository::with(HolisticProfile::new(user("alice")));
        repo.fail_save = true;
        let handler = UpdateSharingPolicyHandler::new(Arc::new(repo));

        let err = handler
            .handle(
                command("alice", PolicyUpdate::default().set(Category::Affects, true)),
                CommandMetadata::new(user("alice")),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[tokio::test]
    async fn empty_update_is_not_persisted() {
        let initial = SharingPolicy::private().with(Category::Affects, true);
        let mut repo =
            MockProfileRepository::with(HolisticProfile::new(user("alice")).with_policy(initial));
        repo.fail_save = true;
        let handler = UpdateSharingPolicyHandler::new(Arc::new(repo));

        let result = handler
            .handle(
                command("alice", PolicyUpdate::default()),
                CommandMetadata::new(user("alice")),
            )
            .await
            .unwrap();

        assert_eq!(result.policy, initial);
        assert_eq!(result.version, PolicyVersion::initial());
    }

    #[tokio::test]
    async fn successive_updates_keep_raising_the_version() {
        let repo = Arc::new(MockProfileRepository::with(HolisticProfile::new(user("alice"))));
        let handler = UpdateSharingPolicyHandler::new(repo);

        let first = handler
            .handle(
                command("alice", PolicyUpdate::default().set(Category::Affects, true)),
                CommandMetadata::new(user("alice")),
            )
            .await
            .unwrap();
        let second = handler
            .handle(
                command("alice", PolicyUpdate::default().set(Category::Affects, false)),
                CommandMetadata::new(user("alice")),
            )
            .await
            .unwrap();

        assert!(second.version > first.version);
        assert!(!second.policy.is_shared(Category::Affects));
    }
}
