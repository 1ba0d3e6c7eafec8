//! # Maku - Unified danmaku source library
//!
//! Maku is an async library that acquires danmaku (time-synchronized viewer
//! comments) for anime playback from pluggable remote providers. It turns a
//! `(subject, episode label)` pair into a time-indexed [`DanmakuSession`]
//! the playback overlay can query as the play head advances.
//!
//! ## Features
//!
//! - **Episode normalization**: maps human-facing episode labels
//!   ("第01集", "剧场版", "07") to the query token remote services expect,
//!   and refuses to query for labels it cannot interpret
//! - **Bounded networking**: per-request timeouts and a fixed-backoff retry,
//!   tuned for comment services that are known to be slow
//! - **Two-step resolution**: search by subject and episode token, then
//!   fetch the comment list for the resolved episode id
//! - **Time-indexed sessions**: immutable, sorted comment storage with
//!   binary-search window queries
//! - **Pluggable providers**: a factory registry keyed by stable string
//!   identifiers, so new services drop in without touching callers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use maku::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> maku::Result<()> {
//!     let registry = ProviderRegistry::builtin();
//!     let provider = registry.create("dandanplay")?;
//!
//!     match provider.fetch("葬送的芙莉莲", Some("第01集")).await? {
//!         Some(session) => {
//!             // comments for the first half-minute of playback
//!             for danmaku in session.time_range(0..30_000) {
//!                 println!("[{}ms] {}", danmaku.time_millis, danmaku.text);
//!             }
//!         }
//!         None => println!("no danmaku available"),
//!     }
//!
//!     provider.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Outcome model
//!
//! "No danmaku available" is a normal outcome, reported as `Ok(None)` from
//! [`DanmakuProvider::fetch`]: unrecognized episode labels (which never
//! touch the network), unsuccessful searches, and empty match lists all
//! collapse to it. Only transport failures surface as `Err`, after the
//! client's retry budget is spent; callers may treat those identically to
//! `Ok(None)` or schedule a later retry. Individual comments that fail to
//! parse are silently dropped during session construction.
//!
//! ## Architecture
//!
//! - [`episode`]: episode label normalization
//! - [`net`]: HTTP client with timeout and retry bounds
//! - [`session`]: time-indexed comment sessions
//! - [`provider`]: provider and factory traits, registry
//! - [`providers`]: concrete provider implementations
//! - [`types`]: comment data model
//! - [`error`]: error handling

pub mod episode;
pub mod error;
pub mod net;
pub mod provider;
pub mod providers;
pub mod session;
pub mod types;

/// Prelude module for convenient imports.
///
/// Re-exports the most commonly used types and traits so a single
/// `use maku::prelude::*;` covers typical usage.
pub mod prelude {
    pub use crate::{
        episode::EpisodeToken,
        provider::{DanmakuProvider, DanmakuProviderFactory, ProviderRegistry},
        session::DanmakuSession,
        types::{Danmaku, DanmakuMode, RawComment},
    };
}

// Re-export main types at crate root for direct access
pub use episode::EpisodeToken;
pub use error::{Error, Result};
pub use provider::{DanmakuProvider, DanmakuProviderFactory, ProviderRegistry};
pub use session::DanmakuSession;
pub use types::{Danmaku, DanmakuMode, RawComment};
