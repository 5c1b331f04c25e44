use anyhow::Result;
use log::info;
use std::sync::Arc;

use crate::backend::domain::models::JournalError;
use crate::backend::storage::ProfileStorage;

/// Name used in prompts and exports when no profile is stored
pub const DEFAULT_USER_NAME: &str = "Viajante";

/// Service for the locally stored display name
#[derive(Clone)]
pub struct ProfileService {
    storage: Arc<dyn ProfileStorage>,
}

impl ProfileService {
    /// Create a new ProfileService
    pub fn new(storage: Arc<dyn ProfileStorage>) -> Self {
        Self { storage }
    }

    pub async fn user_name(&self) -> Result<Option<String>> {
        self.storage.get_user_name().await
    }

    /// The stored name, or the generic traveller name
    pub async fn display_name(&self) -> Result<String> {
        Ok(self
            .user_name()
            .await?
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string()))
    }

    /// Store a new display name. Surrounding whitespace is dropped.
    pub async fn set_user_name(&self, user_name: &str) -> Result<String> {
        let trimmed = user_name.trim();
        if trimmed.is_empty() {
            return Err(JournalError::EmptyUserName.into());
        }
        self.storage.set_user_name(trimmed).await?;
        info!("Profile name set");
        Ok(trimmed.to_string())
    }

    pub async fn clear(&self) -> Result<()> {
        self.storage.clear_user_name().await?;
        info!("Profile cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::json::test_utils::TestEnvironment;
    use crate::backend::storage::ProfileRepository;

    fn service(env: &TestEnvironment) -> ProfileService {
        ProfileService::new(Arc::new(ProfileRepository::new(env.connection.clone())))
    }

    #[tokio::test]
    async fn test_display_name_defaults_to_traveller() {
        let env = TestEnvironment::new().unwrap();
        assert_eq!(service(&env).display_name().await.unwrap(), "Viajante");
    }

    #[tokio::test]
    async fn test_set_user_name_trims() {
        let env = TestEnvironment::new().unwrap();
        let profile = service(&env);
        assert_eq!(profile.set_user_name("  Ana  ").await.unwrap(), "Ana");
        assert_eq!(profile.display_name().await.unwrap(), "Ana");
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let env = TestEnvironment::new().unwrap();
        let err = service(&env).set_user_name("   ").await.unwrap_err();
        assert_eq!(err.downcast_ref::<JournalError>(), Some(&JournalError::EmptyUserName));
    }
}
