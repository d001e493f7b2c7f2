use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{Backend, HistoryStore, Saved, StoreError, StoreResult};
use crate::record::HistoryRecord;

/// Klien REST API riwayat.
#[derive(Clone, Debug)]
pub struct RemoteStore {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct SubmitBody<'a> {
    name: &'a str,
    score: i32,
    max_score: i32,
    category: &'a str,
    note: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: Option<i64>,
    timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    data: Option<Vec<RemoteEntry>>,
}

/// Bentuk baris `GET /api/history`. Skor ada di `score`, bukan `total`.
#[derive(Debug, Deserialize)]
struct RemoteEntry {
    id: Option<i64>,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    name: Option<String>,
    score: i32,
    #[serde(default)]
    max_score: Option<i32>,
    category: String,
    #[serde(default)]
    note: Option<String>,
}

impl From<RemoteEntry> for HistoryRecord {
    fn from(entry: RemoteEntry) -> Self {
        HistoryRecord {
            id: entry.id,
            timestamp: entry.timestamp,
            name: entry.name.unwrap_or_else(|| "-".to_string()),
            total: entry.score,
            max_score: entry
                .max_score
                .unwrap_or_else(HistoryRecord::default_max_score),
            category: entry.category,
            note: entry.note.unwrap_or_default(),
        }
    }
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> StoreResult<Self> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| StoreError::Transport {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/health`.
    pub async fn health(&self) -> StoreResult<Value> {
        let url = self.url("/api/health");
        self.send_json(self.client.get(&url), &url).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> StoreResult<reqwest::Response> {
        debug!(%url, "history request");
        request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|source| StoreError::Transport {
                url: url.to_string(),
                source,
            })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> StoreResult<T> {
        self.send(request, url)
            .await?
            .json()
            .await
            .map_err(|source| StoreError::Transport {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl HistoryStore for RemoteStore {
    async fn submit(&self, record: HistoryRecord) -> StoreResult<Saved> {
        let url = self.url("/api/submit");
        let body = SubmitBody {
            name: &record.name,
            score: record.total,
            max_score: record.max_score,
            category: &record.category,
            note: &record.note,
        };
        let response: SubmitResponse = self
            .send_json(self.client.post(&url).json(&body), &url)
            .await?;

        let mut record = record;
        record.id = response.id;
        if let Some(timestamp) = response.timestamp {
            record.timestamp = timestamp;
        }
        Ok(Saved {
            record,
            backend: Backend::Remote,
        })
    }

    async fn list(&self) -> StoreResult<Vec<HistoryRecord>> {
        let url = self.url("/api/history");
        let response: HistoryResponse = self.send_json(self.client.get(&url), &url).await?;
        Ok(response
            .data
            .unwrap_or_default()
            .into_iter()
            .map(HistoryRecord::from)
            .collect())
    }

    async fn clear_all(&self) -> StoreResult<()> {
        let url = self.url("/api/history");
        self.send(self.client.delete(&url), &url).await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_url_join() {
        let store = RemoteStore::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(store.url("/api/history"), "http://localhost:8080/api/history");
        let store = RemoteStore::new("http://localhost:8080", Duration::from_secs(1)).unwrap();
        assert_eq!(store.url("/api/submit"), "http://localhost:8080/api/submit");
    }

    #[test]
    fn test_remote_entry_mapping() {
        let response: HistoryResponse = serde_json::from_str(
            r#"{"data":[{"id":7,"timestamp":"19/10/2026, 08:30:00","name":"Ayu","score":21,
                "max_score":60,"category":"Perlu Perhatian Ringan","note":null,"created_at":"x"}]}"#,
        )
        .unwrap();
        let records = response
            .data
            .unwrap()
            .into_iter()
            .map(HistoryRecord::from)
            .collect::<Vec<_>>();
        assert_eq!(records[0].id, Some(7));
        assert_eq!(records[0].total, 21);
        assert_eq!(records[0].note, "");
        assert_eq!(records[0].name, "Ayu");
    }

    #[test]
    fn test_null_data_is_empty() {
        let response: HistoryResponse = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert!(response.data.unwrap_or_default().is_empty());
    }
}
