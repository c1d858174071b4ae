//! Async HTTP [`RecordStore`] speaking the roster document API.

use std::time::Duration;

use anyhow::{Context, bail};
use reqwest::{Client, StatusCode, Url};
use roster_core::store::{Document, RecordStore, WriteData};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Connection settings for the document API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{method} {url} → {status}")]
  Status {
    method: &'static str,
    url:    String,
    status: StatusCode,
  },
}

#[derive(Serialize)]
struct WriteBody<'a> {
  data: &'a WriteData,
}

#[derive(Deserialize)]
struct Created {
  id: String,
}

/// Record store client for a remote `roster-server`.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpStore {
  client: Client,
  base:   Url,
}

impl HttpStore {
  pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
    let base = Url::parse(&config.base_url)
      .with_context(|| format!("invalid server URL {:?}", config.base_url))?;
    if base.cannot_be_a_base() {
      bail!("server URL {:?} cannot carry a path", config.base_url);
    }
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base })
  }

  /// `<base>/api/collections/<collection>/documents[/<id>]`, each segment
  /// percent-encoded.
  fn url(&self, collection: &str, id: Option<&str>) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
      segments
        .pop_if_empty()
        .extend(["api", "collections", collection, "documents"]);
      if let Some(id) = id {
        segments.push(id);
      }
    }
    url
  }
}

fn check(
  resp: reqwest::Response,
  method: &'static str,
) -> Result<reqwest::Response, ClientError> {
  if resp.status().is_success() {
    Ok(resp)
  } else {
    Err(ClientError::Status { method, url: resp.url().to_string(), status: resp.status() })
  }
}

impl RecordStore for HttpStore {
  type Error = ClientError;

  /// `GET /api/collections/{c}/documents`
  async fn get_all(&self, collection: &str) -> Result<Vec<Document>, ClientError> {
    let resp = self.client.get(self.url(collection, None)).send().await?;
    Ok(check(resp, "GET")?.json().await?)
  }

  /// `GET /api/collections/{c}/documents/{id}`
  async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, ClientError> {
    let resp = self.client.get(self.url(collection, Some(id))).send().await?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    Ok(Some(check(resp, "GET")?.json().await?))
  }

  /// `POST /api/collections/{c}/documents`
  async fn add(&self, collection: &str, data: WriteData) -> Result<String, ClientError> {
    let resp = self
      .client
      .post(self.url(collection, None))
      .json(&WriteBody { data: &data })
      .send()
      .await?;
    let created: Created = check(resp, "POST")?.json().await?;
    Ok(created.id)
  }

  /// `PATCH /api/collections/{c}/documents/{id}`
  async fn update(&self, collection: &str, id: &str, data: WriteData) -> Result<bool, ClientError> {
    let resp = self
      .client
      .patch(self.url(collection, Some(id)))
      .json(&WriteBody { data: &data })
      .send()
      .await?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(false);
    }
    check(resp, "PATCH")?;
    Ok(true)
  }

  /// `DELETE /api/collections/{c}/documents/{id}`
  async fn delete(&self, collection: &str, id: &str) -> Result<(), ClientError> {
    let resp = self.client.delete(self.url(collection, Some(id))).send().await?;
    if resp.status() != StatusCode::NOT_FOUND {
      check(resp, "DELETE")?;
    }
    Ok(())
  }
}
