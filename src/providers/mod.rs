//! Danmaku provider implementations.
//!
//! One provider is realized here: [`DandanplayProvider`], backed by the
//! dandanplay comment API. Its factory, [`DandanplayFactory`], is registered
//! by [`ProviderRegistry::builtin`](crate::provider::ProviderRegistry::builtin).
//!
//! Additional services can be integrated by implementing
//! [`DanmakuProvider`](crate::provider::DanmakuProvider) and registering a
//! factory for it; nothing in the orchestration layer names concrete
//! provider types.

pub mod dandanplay;

pub use dandanplay::{DandanplayFactory, DandanplayProvider};
