//! # Answer Repository
//!
//! Stores the sparse answer map in `answers.json`, keyed by entry id and
//! using the same field layout as exported backups.

use anyhow::Result;
use async_trait::async_trait;
use shared::UserData;

use super::connection::JsonConnection;
use crate::backend::storage::traits::AnswerStorage;

const ANSWERS_FILE: &str = "answers.json";
const CATEGORY: &str = "answers";

#[derive(Clone)]
pub struct AnswerRepository {
    connection: JsonConnection,
}

impl AnswerRepository {
    /// Create a new answer repository
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl AnswerStorage for AnswerRepository {
    async fn load_answers(&self) -> Result<UserData> {
        Ok(self.connection.read_json(CATEGORY, ANSWERS_FILE))
    }

    async fn store_answers(&self, answers: &UserData) -> Result<()> {
        self.connection.write_json(CATEGORY, ANSWERS_FILE, answers)?;
        Ok(())
    }

    async fn clear_answers(&self) -> Result<()> {
        self.connection.remove(CATEGORY, ANSWERS_FILE)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::json::test_utils::{answer, TestEnvironment};
    use crate::backend::storage::StorageError;

    #[tokio::test]
    async fn test_save_answer_returns_updated_map() {
        let env = TestEnvironment::new().unwrap();
        let repo = AnswerRepository::new(env.connection.clone());

        let updated = repo.save_answer("mes_1_dia_1", answer("primeira", 1_000)).await.unwrap();
        assert_eq!(updated.len(), 1);

        let updated = repo.save_answer("mes_1_dia_2", answer("segunda", 2_000)).await.unwrap();
        assert_eq!(updated.len(), 2);

        let loaded = repo.load_answers().await.unwrap();
        assert_eq!(loaded, updated);
        assert_eq!(loaded["mes_1_dia_2"].text, "segunda");
    }

    #[tokio::test]
    async fn test_overwrite_keeps_one_answer_per_entry() {
        let env = TestEnvironment::new().unwrap();
        let repo = AnswerRepository::new(env.connection.clone());

        repo.save_answer("mes_1_dia_1", answer("antes", 1_000)).await.unwrap();
        let updated = repo.save_answer("mes_1_dia_1", answer("depois", 2_000)).await.unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated["mes_1_dia_1"].text, "depois");
    }

    #[tokio::test]
    async fn test_clear_answers() {
        let env = TestEnvironment::new().unwrap();
        let repo = AnswerRepository::new(env.connection.clone());
        repo.save_answer("mes_1_dia_1", answer("x", 1)).await.unwrap();

        repo.clear_answers().await.unwrap();
        assert!(repo.load_answers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_capacity_failure_keeps_previous_content() {
        let env = TestEnvironment::with_limit(200).unwrap();
        let repo = AnswerRepository::new(env.connection.clone());
        repo.save_answer("mes_1_dia_1", answer("curta", 1)).await.unwrap();

        let err = repo
            .save_answer("mes_1_dia_2", answer(&"longa ".repeat(100), 2))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorageError>(),
            Some(StorageError::CapacityExceeded { .. })
        ));

        let loaded = repo.load_answers().await.unwrap();
        assert_eq!(loaded.len(), 1);
    }
}
