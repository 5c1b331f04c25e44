//! # Profile Repository
//!
//! The display name lives in `profile.yaml`, a small human-editable file
//! like the other YAML configuration the app keeps.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::connection::JsonConnection;
use crate::backend::storage::traits::ProfileStorage;

const PROFILE_FILE: &str = "profile.yaml";
const CATEGORY: &str = "profile";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ProfileRecord {
    #[serde(default)]
    user_name: Option<String>,
}

#[derive(Clone)]
pub struct ProfileRepository {
    connection: JsonConnection,
}

impl ProfileRepository {
    /// Create a new profile repository
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl ProfileStorage for ProfileRepository {
    async fn get_user_name(&self) -> Result<Option<String>> {
        let record: ProfileRecord = self.connection.read_yaml(CATEGORY, PROFILE_FILE);
        Ok(record.user_name)
    }

    async fn set_user_name(&self, user_name: &str) -> Result<()> {
        let record = ProfileRecord {
            user_name: Some(user_name.to_string()),
        };
        self.connection.write_yaml(CATEGORY, PROFILE_FILE, &record)?;
        Ok(())
    }

    async fn clear_user_name(&self) -> Result<()> {
        self.connection.remove(CATEGORY, PROFILE_FILE)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::json::test_utils::TestEnvironment;

    #[tokio::test]
    async fn test_profile_round_trip_and_clear() {
        let env = TestEnvironment::new().unwrap();
        let repo = ProfileRepository::new(env.connection.clone());
        assert_eq!(repo.get_user_name().await.unwrap(), None);

        repo.set_user_name("Ana").await.unwrap();
        assert_eq!(repo.get_user_name().await.unwrap().as_deref(), Some("Ana"));

        repo.clear_user_name().await.unwrap();
        assert_eq!(repo.get_user_name().await.unwrap(), None);
    }
}
