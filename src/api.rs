//! Client for the vessel-monitoring platform's REST API.
//!
//! Only the two resources the formatter needs are covered: the notification
//! type list and the paginated notification inbox. List endpoints answer either
//! with a bare JSON array or with a `{ "data": [...], "total": n }` envelope;
//! both shapes are accepted.
//!
//! # Examples
//!
//! ```no_run
//! use vessel_notify::api::{Paginator, PlatformClient};
//!
//! #[tokio::main]
//! async fn main() -> vessel_notify::Result<()> {
//!     let client = PlatformClient::new("https://vms.example.vn/api", None);
//!     let types = client.fetch_notification_types().await?;
//!     let mut inbox = Paginator::new(20);
//!     inbox.load_more(&client).await?;
//!     println!("{} types, {} notifications", types.len(), inbox.items().len());
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;
use std::time::Instant;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::model::{Notification, NotificationType};

/// Either shape a list endpoint may answer with.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Envelope {
        data: Vec<T>,
        #[serde(default)]
        total: Option<u64>,
    },
    Bare(Vec<T>),
}

impl<T> ListResponse<T> {
    fn into_parts(self) -> (Vec<T>, Option<u64>) {
        match self {
            ListResponse::Envelope { data, total } => (data, total),
            ListResponse::Bare(items) => (items, None),
        }
    }
}

/// One page of a paginated resource.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total number of records server-side, when the API reports it.
    pub total: Option<u64>,
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

/// HTTP client for the platform API.
pub struct PlatformClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl PlatformClient {
    /// Creates a client for `base_url`. A trailing slash is ignored.
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(Vec<T>, Option<u64>)> {
        let url = format!("{}/{}", self.base_url, path);
        log::debug!("Requesting list url={} query={:?}", url, query);

        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let start = Instant::now();
        let response = request.send().await.map_err(|e| {
            log::error!("API request failed url={}: {}", url, e);
            Error::Http(e)
        })?;

        let status = response.status();
        log::debug!(
            "API responded url={} duration_ms={} status={:?}",
            url,
            start.elapsed().as_millis(),
            status
        );

        if !status.is_success() {
            log::error!("API returned error status url={} status={}", url, status);
            return Err(Error::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        let parsed: ListResponse<T> = serde_json::from_slice(&body).map_err(|e| {
            log::error!("Failed to parse API response url={}: {}", url, e);
            Error::Json(e)
        })?;

        Ok(parsed.into_parts())
    }

    /// Fetches the full notification type list.
    pub async fn fetch_notification_types(&self) -> Result<Vec<NotificationType>> {
        let (types, _) = self.get_list("notification-types", &[]).await?;
        log::info!("Fetched notification types count={}", types.len());
        Ok(types)
    }

    /// Fetches one page of notifications, newest first as served by the API.
    ///
    /// `page` and `per_page` are clamped to at least 1.
    pub async fn fetch_notifications(&self, page: u32, per_page: u32) -> Result<Page<Notification>> {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let query = [("page", page.to_string()), ("limit", per_page.to_string())];
        let (items, total) = self.get_list("notifications", &query).await?;
        log::info!(
            "Fetched notifications page={} per_page={} count={} total={:?}",
            page,
            per_page,
            items.len(),
            total
        );
        Ok(Page {
            items,
            total,
            page,
            per_page,
        })
    }
}

/// "Load more" state for the notification inbox.
///
/// Pages are fetched in order and appended. The list is exhausted once a page
/// comes back short or empty, once the reported total is reached, or once a
/// page brings nothing new (a backend that ignores `page` keeps serving the
/// same records).
#[derive(Debug, Clone)]
pub struct Paginator {
    per_page: u32,
    next_page: u32,
    items: Vec<Notification>,
    keys: HashSet<String>,
    total: Option<u64>,
    has_more: bool,
}

impl Paginator {
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page: per_page.max(1),
            next_page: 1,
            items: Vec::new(),
            keys: HashSet::new(),
            total: None,
            has_more: true,
        }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Pages loaded so far.
    pub fn pages_loaded(&self) -> u32 {
        self.next_page - 1
    }

    /// Fetches the next page and appends the records not loaded yet. Returns
    /// how many items were added; `0` once the list is exhausted.
    ///
    /// On error the state is unchanged, so the same page is retried by the
    /// next call.
    pub async fn load_more(&mut self, client: &PlatformClient) -> Result<usize> {
        if !self.has_more {
            return Ok(0);
        }

        let page = client.fetch_notifications(self.next_page, self.per_page).await?;
        let fetched = page.items.len();
        let before = self.items.len();

        for n in page.items {
            if self.keys.insert(n.key()) {
                self.items.push(n);
            }
        }
        let added = self.items.len() - before;

        self.total = page.total.or(self.total);
        self.next_page += 1;
        self.has_more = fetched as u32 >= self.per_page
            && added > 0
            && self.total.is_none_or(|total| (self.items.len() as u64) < total);

        log::debug!(
            "Inbox page loaded page={} fetched={} added={} loaded={} has_more={}",
            self.pages_loaded(),
            fetched,
            added,
            self.items.len(),
            self.has_more
        );

        Ok(added)
    }

    /// Drops everything loaded so far and starts again from page 1.
    pub fn reset(&mut self) {
        *self = Self::new(self.per_page);
    }
}
