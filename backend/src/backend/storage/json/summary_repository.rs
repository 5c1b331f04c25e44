use anyhow::Result;
use async_trait::async_trait;
use shared::MonthlySummaries;

use super::connection::JsonConnection;
use crate::backend::storage::traits::SummaryStorage;

const SUMMARIES_FILE: &str = "summaries.json";
const CATEGORY: &str = "summaries";

/// Generated monthly summaries in `summaries.json`
#[derive(Clone)]
pub struct SummaryRepository {
    connection: JsonConnection,
}

impl SummaryRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl SummaryStorage for SummaryRepository {
    async fn load_summaries(&self) -> Result<MonthlySummaries> {
        Ok(self.connection.read_json(CATEGORY, SUMMARIES_FILE))
    }

    async fn store_summaries(&self, summaries: &MonthlySummaries) -> Result<()> {
        self.connection.write_json(CATEGORY, SUMMARIES_FILE, summaries)?;
        Ok(())
    }

    async fn clear_summaries(&self) -> Result<()> {
        self.connection.remove(CATEGORY, SUMMARIES_FILE)?;
        Ok(())
    }
}
