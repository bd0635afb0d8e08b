use std::time::Duration;

use reqwest::{
    Client,
    Response,
};
use tokio::time::sleep;

use super::{
    ProgressRow,
    RemoteStore,
};
use crate::core::KiokuError;

const PROGRESS_TABLE: &str = "learning_progress";

/// Client for the hosted progress table: a PostgREST-style REST endpoint
/// with upsert-on-conflict support keyed by `(user_id, item_id)`.
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpRemoteStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client: Client::new(), base_url, api_key: api_key.into() }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, PROGRESS_TABLE)
    }

    /// Cheap reachability probe against the progress table.
    pub async fn ping(&self) -> Result<(), KiokuError> {
        let response = self
            .client
            .head(self.table_url())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        ensure_success(&response)
    }

    /// Poll until the backend answers. Lets the owning session defer a
    /// login-triggered sync while connectivity is still coming up.
    pub async fn wait_awake(&self, wait_time: u64, max_attempts: u32) -> bool {
        for attempt in 1..=max_attempts {
            match self.ping().await {
                Ok(()) => {
                    println!("Progress backend is online.");
                    return true;
                }
                Err(err) => {
                    println!(
                        "Progress backend attempt {} of {} failed. Retrying in {} seconds... Error: {}",
                        attempt, max_attempts, wait_time, err
                    );
                    if attempt < max_attempts {
                        sleep(Duration::from_secs(wait_time)).await;
                    }
                }
            }
        }
        false
    }
}

impl RemoteStore for HttpRemoteStore {
    async fn fetch_all(&self, user_id: &str) -> Result<Vec<ProgressRow>, KiokuError> {
        let filter = format!("eq.{}", user_id);
        let response = self
            .client
            .get(self.table_url())
            .query(&[("user_id", filter.as_str()), ("select", "*")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        ensure_success(&response)?;

        let rows: Vec<ProgressRow> = response.json().await?;
        Ok(rows)
    }

    async fn upsert_batch(&self, _user_id: &str, rows: Vec<ProgressRow>) -> Result<(), KiokuError> {
        let response = self
            .client
            .post(self.table_url())
            .query(&[("on_conflict", "user_id,item_id")])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&rows)
            .send()
            .await?;

        ensure_success(&response)
    }
}

fn ensure_success(response: &Response) -> Result<(), KiokuError> {
    if !response.status().is_success() {
        return Err(KiokuError::RemoteStore(format!(
            "HTTP error {} from {}",
            response.status(),
            response.url()
        )));
    }
    Ok(())
}
