//! Client for the remote record store.
//!
//! The store is a hosted service exposing the `entries` table over the
//! PostgREST wire protocol. [`RecordStore`] wraps that surface in three
//! typed operations; everything else (storage, query execution, auth) is
//! the service's problem.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::{Error, Result, StoreConfig};

mod entry;

pub use entry::Entry;

/// Table holding one row per check-in.
const ENTRIES_TABLE: &str = "entries";

/// Central access point for all remote data.
///
/// Cheap to clone: the agent and configuration live behind an [`Arc`] and
/// the handle owns no other state. Every operation is a single round trip —
/// no retries, no batching, no caching — and the agent carries no timeout,
/// so a hung call blocks its caller until the connection dies. Callers that
/// need to observe the effect of a write re-fetch afterwards.
#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<Inner>,
}

struct Inner {
    config: StoreConfig,
    agent: ureq::Agent,
}

impl RecordStore {
    pub fn new(config: StoreConfig) -> Self {
        let agent = ureq::AgentBuilder::new().build();
        Self {
            inner: Arc::new(Inner { config, agent }),
        }
    }

    /// Retrieve every row, in whatever order the service returns them.
    pub fn list_all(&self) -> Result<Vec<Entry>> {
        let url = self.list_url(None)?;
        debug!(url = %url, "listing all entries");
        self.get_rows(&url)
    }

    /// Retrieve the rows whose user name exactly equals `name`.
    pub fn list_by_user(&self, name: &str) -> Result<Vec<Entry>> {
        let url = self.list_url(Some(name))?;
        debug!(user = name, "listing entries for user");
        self.get_rows(&url)
    }

    /// Rewrite the lock flag on every row matching `name`.
    ///
    /// Success is an acknowledgment with no payload.
    pub fn set_locked(&self, name: &str, locked: bool) -> Result<()> {
        let url = self.update_url(name)?;
        let body = json!({ "isLocked": locked });
        debug!(user = name, locked, "updating lock flag");

        let response = self
            .request("PATCH", &url)
            .set("Content-Type", "application/json")
            .set("Prefer", "return=minimal")
            .send_string(&body.to_string());

        match response {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, response)) => Err(query_error(status, response)),
            Err(ureq::Error::Transport(err)) => Err(Error::Transport(err.to_string())),
        }
    }

    fn get_rows(&self, url: &Url) -> Result<Vec<Entry>> {
        match self.request("GET", url).call() {
            Ok(response) => read_rows(response),
            Err(ureq::Error::Status(status, response)) => Err(query_error(status, response)),
            Err(ureq::Error::Transport(err)) => Err(Error::Transport(err.to_string())),
        }
    }

    fn request(&self, method: &str, url: &Url) -> ureq::Request {
        let key = &self.inner.config.api_key;
        self.inner
            .agent
            .request(method, url.as_str())
            .set("apikey", key)
            .set("Authorization", &format!("Bearer {key}"))
            .set("Accept", "application/json")
    }

    /// `{base}/rest/v1/entries`, preserving any path the endpoint already
    /// carries (self-hosted deployments mount the REST surface under one).
    fn entries_url(&self) -> Result<Url> {
        let mut url = self.inner.config.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::Config("store url cannot be a base".into()))?;
            path.pop_if_empty();
            path.push("rest");
            path.push("v1");
            path.push(ENTRIES_TABLE);
        }
        Ok(url)
    }

    fn list_url(&self, user: Option<&str>) -> Result<Url> {
        let mut url = self.entries_url()?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", "*");
            if let Some(user) = user {
                pairs.append_pair("user_name", &format!("eq.{user}"));
            }
        }
        Ok(url)
    }

    fn update_url(&self, user: &str) -> Result<Url> {
        let mut url = self.entries_url()?;
        url.query_pairs_mut()
            .append_pair("user_name", &format!("eq.{user}"));
        Ok(url)
    }
}

fn read_rows(response: ureq::Response) -> Result<Vec<Entry>> {
    let body = response
        .into_string()
        .map_err(|err| Error::Transport(format!("failed to read response body: {err}")))?;
    serde_json::from_str(&body)
        .map_err(|err| Error::Transport(format!("response body is not a valid row set: {err}")))
}

fn query_error(status: u16, response: ureq::Response) -> Error {
    let body = response.into_string().unwrap_or_default();
    Error::Query {
        status,
        message: query_message(&body),
    }
}

/// Pull the human-readable message out of a PostgREST error body, falling
/// back to the raw body when it does not parse as one.
fn query_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = parsed.message {
            return message;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error detail".into()
    } else {
        trimmed.into()
    }
}
