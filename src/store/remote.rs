//! Remote storage on a PostgREST-style table (`key` text primary key, `value` jsonb).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StorageBackend;
use crate::config::RemoteConfig;
use crate::errors::AppError;

#[derive(Deserialize)]
struct ValueRow {
    value: Value,
}

#[derive(Serialize)]
struct UpsertRow<'a> {
    key: &'a str,
    value: &'a Value,
}

/// Talks to the hosted backend over its REST interface.
pub struct RemoteStorage {
    client: reqwest::Client,
    table_url: String,
    api_key: String,
}

impl RemoteStorage {
    pub fn new(config: &RemoteConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            table_url: format!("{}/rest/v1/{}", config.url, config.table),
            api_key: config.api_key.clone(),
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

#[async_trait]
impl StorageBackend for RemoteStorage {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn read(&self, key: &str) -> Result<Option<Value>, AppError> {
        let filter = format!("eq.{}", key);
        let rows: Vec<ValueRow> = self
            .authorized(self.client.get(&self.table_url))
            .query(&[("key", filter.as_str()), ("select", "value")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(rows.into_iter().next().map(|row| row.value))
    }

    async fn write(&self, key: &str, value: &Value) -> Result<(), AppError> {
        self.authorized(self.client.post(&self.table_url))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[UpsertRow { key, value }])
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
