use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::domain::error::Result;
use crate::domain::status_check::{StatusCheck, StatusCheckInput};
use crate::infrastructure::db::StatusCheckStore;

pub struct StatusCheckUseCase {
    repository: Arc<dyn StatusCheckStore>,
    list_limit: i64,
}

impl StatusCheckUseCase {
    pub fn new(repository: Arc<dyn StatusCheckStore>, list_limit: i64) -> Self {
        Self {
            repository,
            list_limit,
        }
    }

    pub async fn record(&self, input: StatusCheckInput) -> Result<StatusCheck> {
        input.validate()?;
        let check = StatusCheck {
            id: Uuid::new_v4().to_string(),
            client_name: input.client_name,
            timestamp: Utc::now(),
        };
        self.repository.insert_status_check(&check).await?;
        Ok(check)
    }

    pub async fn list(&self) -> Result<Vec<StatusCheck>> {
        self.repository.list_status_checks(self.list_limit).await
    }
}
