//! Provider orchestration tests against a counting mock API.
//!
//! These verify the short-circuit pipeline: unrecognized labels never touch
//! the network, remote misses collapse to `Ok(None)`, and only transport
//! failures surface as errors.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use maku::episode::EpisodeToken;
use maku::prelude::*;
use maku::providers::dandanplay::{
    AnimeMatch, DandanplayApi, DandanplayProvider, EpisodeMatch, SearchResponse,
};
use maku::{Error, Result};

struct MockApi {
    search_response: SearchResponse,
    comments: Vec<RawComment>,
    fail_search: bool,
    search_calls: AtomicUsize,
    comment_calls: AtomicUsize,
    last_token: Mutex<Option<String>>,
    last_episode_id: AtomicI64,
}

impl MockApi {
    fn new(search_response: SearchResponse, comments: Vec<RawComment>) -> Arc<Self> {
        Arc::new(Self {
            search_response,
            comments,
            fail_search: false,
            search_calls: AtomicUsize::new(0),
            comment_calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
            last_episode_id: AtomicI64::new(-1),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            search_response: search_with_episodes(vec![]),
            comments: vec![],
            fail_search: true,
            search_calls: AtomicUsize::new(0),
            comment_calls: AtomicUsize::new(0),
            last_token: Mutex::new(None),
            last_episode_id: AtomicI64::new(-1),
        })
    }
}

#[async_trait]
impl DandanplayApi for MockApi {
    async fn search(&self, _subject: &str, token: &EpisodeToken) -> Result<SearchResponse> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token.lock().unwrap() = Some(token.to_string());
        if self.fail_search {
            return Err(Error::source("mock", "transport down"));
        }
        Ok(self.search_response.clone())
    }

    async fn comments(&self, episode_id: i64) -> Result<Vec<RawComment>> {
        self.comment_calls.fetch_add(1, Ordering::SeqCst);
        self.last_episode_id.store(episode_id, Ordering::SeqCst);
        Ok(self.comments.clone())
    }
}

/// Shared handle so tests can hand the mock to the provider while keeping
/// a reference for assertions; the orphan rule forbids implementing
/// `DandanplayApi` for `Arc<MockApi>` directly.
struct ApiHandle(Arc<MockApi>);

#[async_trait]
impl DandanplayApi for ApiHandle {
    async fn search(&self, subject: &str, token: &EpisodeToken) -> Result<SearchResponse> {
        self.0.search(subject, token).await
    }

    async fn comments(&self, episode_id: i64) -> Result<Vec<RawComment>> {
        self.0.comments(episode_id).await
    }
}

fn search_with_episodes(episode_ids: Vec<i64>) -> SearchResponse {
    SearchResponse {
        success: true,
        animes: vec![AnimeMatch {
            anime_title: Some("test anime".to_string()),
            episodes: episode_ids
                .into_iter()
                .map(|episode_id| EpisodeMatch {
                    episode_id,
                    episode_title: None,
                })
                .collect(),
        }],
    }
}

fn raw(p: &str, m: &str) -> RawComment {
    RawComment {
        cid: 0,
        p: p.to_string(),
        m: m.to_string(),
    }
}

#[tokio::test]
async fn test_unrecognized_label_makes_no_network_call() {
    for label in [None, Some(""), Some("   "), Some("SP"), Some("OVA")] {
        let mock = MockApi::new(search_with_episodes(vec![1]), vec![]);
        let provider = DandanplayProvider::with_api(ApiHandle(mock.clone()));

        let session = provider.fetch("subject", label).await.unwrap();
        assert!(session.is_none(), "label {:?} should yield no session", label);
        assert_eq!(mock.search_calls.load(Ordering::SeqCst), 0);
        assert_eq!(mock.comment_calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn test_movie_label_queries_with_movie_token() {
    let mock = MockApi::new(search_with_episodes(vec![100]), vec![]);
    let provider = DandanplayProvider::with_api(ApiHandle(mock.clone()));

    let session = provider.fetch("subject", Some("剧场版")).await.unwrap();
    assert!(session.is_some());
    assert_eq!(
        mock.last_token.lock().unwrap().as_deref(),
        Some("movie")
    );
}

#[tokio::test]
async fn test_episode_label_queries_with_digit_token() {
    let mock = MockApi::new(search_with_episodes(vec![100]), vec![]);
    let provider = DandanplayProvider::with_api(ApiHandle(mock.clone()));

    provider.fetch("subject", Some("第01集")).await.unwrap();
    assert_eq!(mock.last_token.lock().unwrap().as_deref(), Some("01"));
}

#[tokio::test]
async fn test_unsuccessful_search_returns_none() {
    let mut response = search_with_episodes(vec![1]);
    response.success = false;
    let mock = MockApi::new(response, vec![]);
    let provider = DandanplayProvider::with_api(ApiHandle(mock.clone()));

    let session = provider.fetch("subject", Some("07")).await.unwrap();
    assert!(session.is_none());
    assert_eq!(mock.search_calls.load(Ordering::SeqCst), 1);
    assert_eq!(mock.comment_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_anime_list_returns_none() {
    let response = SearchResponse {
        success: true,
        animes: vec![],
    };
    let mock = MockApi::new(response, vec![]);
    let provider = DandanplayProvider::with_api(ApiHandle(mock.clone()));

    let session = provider.fetch("subject", Some("07")).await.unwrap();
    assert!(session.is_none());
    assert_eq!(mock.comment_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_anime_without_episodes_returns_none() {
    let mock = MockApi::new(search_with_episodes(vec![]), vec![]);
    let provider = DandanplayProvider::with_api(ApiHandle(mock.clone()));

    let session = provider.fetch("subject", Some("07")).await.unwrap();
    assert!(session.is_none());
    assert_eq!(mock.search_calls.load(Ordering::SeqCst), 1);
    assert_eq!(mock.comment_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_first_episode_of_first_anime_is_fetched() {
    let response = SearchResponse {
        success: true,
        animes: vec![
            AnimeMatch {
                anime_title: Some("first match".to_string()),
                episodes: vec![
                    EpisodeMatch {
                        episode_id: 11,
                        episode_title: None,
                    },
                    EpisodeMatch {
                        episode_id: 12,
                        episode_title: None,
                    },
                ],
            },
            AnimeMatch {
                anime_title: Some("second match".to_string()),
                episodes: vec![EpisodeMatch {
                    episode_id: 21,
                    episode_title: None,
                }],
            },
        ],
    };
    let mock = MockApi::new(response, vec![]);
    let provider = DandanplayProvider::with_api(ApiHandle(mock.clone()));

    provider.fetch("subject", Some("第02集")).await.unwrap();
    assert_eq!(mock.last_episode_id.load(Ordering::SeqCst), 11);
}

#[tokio::test]
async fn test_malformed_comments_filtered_and_session_ordered() {
    let comments = vec![
        raw("30.0,1,16777215", "late"),
        raw("not an attribute string", "dropped"),
        raw("2.0,5,255", "early"),
        raw("8.0,99,255", "bad mode, dropped"),
        raw("8.0,4,255", "middle"),
    ];
    let mock = MockApi::new(search_with_episodes(vec![1]), comments);
    let provider = DandanplayProvider::with_api(ApiHandle(mock.clone()));

    let session = provider
        .fetch("subject", Some("第01集"))
        .await
        .unwrap()
        .expect("session should exist");

    assert_eq!(session.len(), 3);
    let times: Vec<i64> = session.iter().map(|c| c.time_millis).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(times, vec![2000, 8000, 30000]);
}

#[tokio::test]
async fn test_transport_failure_propagates_as_error() {
    let mock = MockApi::failing();
    let provider = DandanplayProvider::with_api(ApiHandle(mock.clone()));

    let result = provider.fetch("subject", Some("07")).await;
    assert!(result.is_err());
    assert_eq!(mock.comment_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_close_is_idempotent_and_blocks_fetch() {
    let mock = MockApi::new(search_with_episodes(vec![1]), vec![]);
    let provider = DandanplayProvider::with_api(ApiHandle(mock.clone()));

    provider.close().await.unwrap();
    provider.close().await.unwrap();

    let result = provider.fetch("subject", Some("07")).await;
    assert!(matches!(result, Err(Error::Source { .. })));
    assert_eq!(mock.search_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_registry_creates_independent_providers() {
    let registry = ProviderRegistry::builtin();
    let a = registry.create("dandanplay").unwrap();
    let b = registry.create("dandanplay").unwrap();

    assert_eq!(a.id(), "dandanplay");
    assert_eq!(b.id(), "dandanplay");

    // Closing one instance must not affect the other.
    a.close().await.unwrap();
    assert!(a.fetch("subject", Some("07")).await.is_err());
}

#[test]
fn test_registry_unknown_id() {
    let registry = ProviderRegistry::builtin();
    assert!(matches!(
        registry.create("bilibili"),
        Err(Error::NotFound(_))
    ));
}
