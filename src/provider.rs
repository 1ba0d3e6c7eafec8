//! Provider trait, factory trait, and the provider registry.
//!
//! A [`DanmakuProvider`] resolves a (subject, episode label) pair to a
//! [`DanmakuSession`] against one remote comment service. A
//! [`DanmakuProviderFactory`] constructs fresh provider instances and is the
//! unit the [`ProviderRegistry`] holds, so orchestrating code can create
//! providers by identifier without depending on concrete types.
//!
//! # Examples
//!
//! ```rust,no_run
//! use maku::prelude::*;
//!
//! # async fn example() -> maku::Result<()> {
//! let registry = ProviderRegistry::builtin();
//! let provider = registry.create("dandanplay")?;
//!
//! if let Some(session) = provider.fetch("葬送的芙莉莲", Some("第01集")).await? {
//!     println!("{} comments", session.len());
//! }
//!
//! provider.close().await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use std::collections::HashMap;

use crate::{error::Result, session::DanmakuSession};

/// Trait that all danmaku providers must implement.
///
/// A provider owns one long-lived HTTP client for its lifetime. Concurrent
/// `fetch` calls on the same provider are allowed; they share nothing beyond
/// the client's connection pool.
///
/// # Fetch contract
///
/// `fetch` distinguishes three outcomes:
///
/// - `Ok(Some(session))` - danmaku found and parsed;
/// - `Ok(None)` - no danmaku available for this content. This covers
///   unrecognized episode labels (no network call is made), unsuccessful
///   searches, and empty match lists. It is a normal outcome, not an error;
/// - `Err(..)` - the remote service could not be reached after retries.
///   Distinguishable from `Ok(None)` so callers may retry later, but safe
///   to treat identically.
///
/// No partial session is ever returned.
///
/// # Cancellation
///
/// `fetch` suspends at its network calls; dropping the future aborts any
/// in-flight request. Callers run fetches in a scope tied to the playback
/// UI and simply drop it on teardown.
#[async_trait]
pub trait DanmakuProvider: Send + Sync {
    /// Stable identifier of this provider, matching its factory's id.
    fn id(&self) -> &'static str;

    /// Human-readable name of the backing service.
    fn name(&self) -> &'static str;

    /// Resolves danmaku for an episode of the given subject.
    ///
    /// `subject` is the anime title to search for; `episode` is the raw
    /// episode label as the upstream metadata names it, normalized
    /// internally before any network traffic.
    async fn fetch(&self, subject: &str, episode: Option<&str>) -> Result<Option<DanmakuSession>>;

    /// Marks the provider as disposed.
    ///
    /// Safe to call more than once. After the first call, `fetch` returns
    /// an error. The underlying connection pool is released when the
    /// provider value is dropped.
    async fn close(&self) -> Result<()>;
}

impl std::fmt::Debug for dyn DanmakuProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DanmakuProvider")
            .field("id", &self.id())
            .finish_non_exhaustive()
    }
}

/// Constructs provider instances for one backing service.
///
/// Each call to [`create`](DanmakuProviderFactory::create) returns a fresh,
/// independently-owned provider with its own HTTP client. Factories are
/// registered in a [`ProviderRegistry`] under their stable identifier; this
/// indirection lets additional danmaku sources be plugged in without the
/// orchestrating code naming concrete provider types.
pub trait DanmakuProviderFactory: Send + Sync {
    /// Stable identifier for providers built by this factory.
    fn id(&self) -> &'static str;

    /// Builds a fresh provider instance.
    fn create(&self) -> Box<dyn DanmakuProvider>;
}

/// A registry of provider factories, keyed by identifier.
///
/// Populated statically at startup; no runtime service discovery. Use
/// [`ProviderRegistry::builtin`] for the factories shipped with this crate,
/// and [`add`](ProviderRegistry::add) to register your own.
///
/// # Examples
///
/// ```rust
/// use maku::prelude::*;
///
/// let registry = ProviderRegistry::builtin();
/// assert!(registry.list_ids().contains(&"dandanplay"));
///
/// let a = registry.create("dandanplay").unwrap();
/// let b = registry.create("dandanplay").unwrap();
/// // a and b are independent instances with their own clients
/// ```
pub struct ProviderRegistry {
    factories: Vec<Box<dyn DanmakuProviderFactory>>,
    by_id: HashMap<String, usize>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Creates a registry pre-populated with the built-in factories.
    ///
    /// Currently registers the dandanplay provider.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.add(crate::providers::DandanplayFactory);
        registry
    }

    /// Registers a factory, indexed by its id. Returns `&mut self` for
    /// chaining.
    pub fn add(&mut self, factory: impl DanmakuProviderFactory + 'static) -> &mut Self {
        let id = factory.id().to_string();
        let index = self.factories.len();
        self.factories.push(Box::new(factory));
        self.by_id.insert(id, index);
        self
    }

    /// Looks up a factory by id.
    pub fn get(&self, id: &str) -> Option<&dyn DanmakuProviderFactory> {
        self.by_id
            .get(id)
            .and_then(|&index| self.factories.get(index))
            .map(|f| f.as_ref())
    }

    /// Creates a fresh provider instance for the given id.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`](crate::Error::NotFound) when no factory is
    /// registered under `id`.
    pub fn create(&self, id: &str) -> Result<Box<dyn DanmakuProvider>> {
        self.get(id)
            .map(|factory| factory.create())
            .ok_or_else(|| crate::Error::not_found(format!("provider factory '{}'", id)))
    }

    /// Identifiers of all registered factories.
    pub fn list_ids(&self) -> Vec<&'static str> {
        self.factories.iter().map(|f| f.id()).collect()
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// `true` if no factories are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
