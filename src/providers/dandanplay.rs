//! Danmaku provider backed by the dandanplay comment API.
//!
//! Resolution is a two-step exchange: search episodes by
//! `(subject, episode token)` to obtain an episode id, then list the
//! comments for that id. Both calls go through the [`DandanplayApi`] trait
//! so the orchestration logic can be tested against a mock.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    episode::{self, EpisodeToken},
    error::Result,
    net::HttpClient,
    provider::{DanmakuProvider, DanmakuProviderFactory},
    session::DanmakuSession,
    types::RawComment,
};

const ID: &str = "dandanplay";
const API_BASE: &str = "https://api.dandanplay.net";

/// Episode search response.
///
/// A transport-successful search can still carry `success: false` or an
/// empty match list; both mean "no usable data" rather than an error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub animes: Vec<AnimeMatch>,
}

/// One matched anime with its episode candidates, in service order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeMatch {
    #[serde(default)]
    pub anime_title: Option<String>,
    #[serde(default)]
    pub episodes: Vec<EpisodeMatch>,
}

/// One matched episode.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeMatch {
    pub episode_id: i64,
    #[serde(default)]
    pub episode_title: Option<String>,
}

/// Comment list response.
#[derive(Debug, Clone, Deserialize)]
struct CommentResponse {
    #[serde(default)]
    comments: Vec<RawComment>,
}

/// The two remote calls the provider makes, behind a seam for testing.
///
/// [`HttpApi`] is the real implementation; tests substitute a counting mock
/// to assert on short-circuit behavior without touching the network.
#[async_trait]
pub trait DandanplayApi: Send + Sync {
    /// Searches episodes by subject name and normalized episode token.
    async fn search(&self, subject: &str, token: &EpisodeToken) -> Result<SearchResponse>;

    /// Lists the raw comments for a resolved episode id.
    async fn comments(&self, episode_id: i64) -> Result<Vec<RawComment>>;
}

/// [`DandanplayApi`] over HTTP, against the real service.
pub struct HttpApi {
    client: HttpClient,
    api_base: String,
}

impl HttpApi {
    /// Creates an API client against the given base URL.
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: HttpClient::new(ID),
            api_base: api_base.into(),
        }
    }
}

#[async_trait]
impl DandanplayApi for HttpApi {
    async fn search(&self, subject: &str, token: &EpisodeToken) -> Result<SearchResponse> {
        let url = format!(
            "{}/api/v2/search/episodes?anime={}&episode={}",
            self.api_base,
            urlencoding::encode(subject),
            urlencoding::encode(&token.to_string()),
        );
        self.client.get_json(&url).await
    }

    async fn comments(&self, episode_id: i64) -> Result<Vec<RawComment>> {
        let url = format!(
            "{}/api/v2/comment/{}?withRelated=true",
            self.api_base, episode_id,
        );
        let response: CommentResponse = self.client.get_json(&url).await?;
        Ok(response.comments)
    }
}

/// Danmaku provider for the dandanplay comment service.
///
/// Holds one HTTP client for its lifetime; create fresh instances through
/// [`DandanplayFactory`] or [`DandanplayProvider::new`].
///
/// # Examples
///
/// ```rust,no_run
/// use maku::prelude::*;
/// use maku::providers::DandanplayProvider;
///
/// # async fn example() -> maku::Result<()> {
/// let provider = DandanplayProvider::new();
/// let session = provider.fetch("葬送的芙莉莲", Some("第01集")).await?;
/// match session {
///     Some(s) => println!("{} comments", s.len()),
///     None => println!("no danmaku for this episode"),
/// }
/// # Ok(())
/// # }
/// ```
pub struct DandanplayProvider<A: DandanplayApi = HttpApi> {
    api: A,
    closed: AtomicBool,
}

impl DandanplayProvider<HttpApi> {
    /// Creates a provider against the official API endpoint.
    pub fn new() -> Self {
        Self::with_api_base(API_BASE)
    }

    /// Creates a provider against a mirror of the API.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self::with_api(HttpApi::new(api_base))
    }
}

impl<A: DandanplayApi> DandanplayProvider<A> {
    /// Creates a provider over an arbitrary API implementation.
    pub fn with_api(api: A) -> Self {
        Self {
            api,
            closed: AtomicBool::new(false),
        }
    }
}

impl Default for DandanplayProvider<HttpApi> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<A: DandanplayApi> DanmakuProvider for DandanplayProvider<A> {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        "弹弹play"
    }

    async fn fetch(&self, subject: &str, episode: Option<&str>) -> Result<Option<DanmakuSession>> {
        if self.closed.load(Ordering::Acquire) {
            return Err(crate::Error::source(ID, "provider is closed"));
        }

        let Some(token) = episode::normalize(episode) else {
            tracing::debug!(subject, ?episode, "episode label not queryable, skipping");
            return Ok(None);
        };

        let response = self.api.search(subject, &token).await?;
        if !response.success || response.animes.is_empty() {
            tracing::debug!(subject, %token, "search returned no usable matches");
            return Ok(None);
        }

        // First anime, first episode; the service's own ordering is the
        // only ranking applied.
        let Some(episode_id) = response.animes[0].episodes.first().map(|e| e.episode_id) else {
            tracing::debug!(subject, %token, "matched anime has no episodes");
            return Ok(None);
        };

        let raw = self.api.comments(episode_id).await?;
        tracing::debug!(subject, episode_id, count = raw.len(), "fetched comments");

        // Parsing a large comment list is CPU-bound; keep it off the
        // async workers.
        let session = tokio::task::spawn_blocking(move || DanmakuSession::from_raw(raw)).await?;
        Ok(Some(session))
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

/// Factory for [`DandanplayProvider`] instances.
pub struct DandanplayFactory;

impl DanmakuProviderFactory for DandanplayFactory {
    fn id(&self) -> &'static str {
        ID
    }

    fn create(&self) -> Box<dyn DanmakuProvider> {
        Box::new(DandanplayProvider::new())
    }
}
