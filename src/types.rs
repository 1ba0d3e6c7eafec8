//! Core data types for danmaku comments.
//!
//! This module defines the fundamental data structures shared by all
//! providers:
//!
//! - [`RawComment`] - A comment exactly as the remote service returns it
//! - [`Danmaku`] - A parsed, typed comment ready for playback overlay
//! - [`DanmakuMode`] - On-screen placement of a comment
//!
//! # Examples
//!
//! ```rust
//! use maku::types::{Danmaku, RawComment};
//!
//! let raw = RawComment {
//!     cid: 1,
//!     p: "12.85,1,16777215,-1".to_string(),
//!     m: "前方高能".to_string(),
//! };
//!
//! let danmaku = Danmaku::from_raw(raw).unwrap();
//! assert_eq!(danmaku.time_millis, 12850);
//! ```

use serde::{Deserialize, Serialize};

/// A comment as returned by the remote comment service, prior to parsing.
///
/// The `p` field is a comma-separated attribute string of the form
/// `"<seconds>,<mode>,<color>[,<user>]"` and `m` carries the comment text.
/// The attribute string is treated as opaque until session construction,
/// where it is decoded best-effort; entries that fail to decode are dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawComment {
    /// Comment identifier assigned by the remote service
    #[serde(default)]
    pub cid: i64,
    /// Comma-separated attribute string: time in seconds, mode code,
    /// RGB color, and optionally a sender identifier
    pub p: String,
    /// Comment text
    pub m: String,
}

/// On-screen placement of a danmaku comment.
///
/// Wire codes follow the common niconico-derived convention: 1 through 3
/// scroll right-to-left, 4 pins to the bottom, 5 pins to the top. Any other
/// code is unrecognized and the comment carrying it is dropped during
/// session construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DanmakuMode {
    /// Scrolls across the screen right-to-left (codes 1-3)
    Rolling,
    /// Pinned to the top of the screen (code 5)
    Top,
    /// Pinned to the bottom of the screen (code 4)
    Bottom,
}

impl DanmakuMode {
    /// Maps a wire mode code to a placement, or `None` for unknown codes.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1..=3 => Some(DanmakuMode::Rolling),
            4 => Some(DanmakuMode::Bottom),
            5 => Some(DanmakuMode::Top),
            _ => None,
        }
    }
}

/// A parsed danmaku comment.
///
/// This is the unit a [`DanmakuSession`](crate::session::DanmakuSession)
/// stores and hands to the playback overlay. Instances are produced by
/// [`Danmaku::from_raw`] from the wire representation; construction is
/// best-effort and malformed wire comments simply yield `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Danmaku {
    /// Playback time offset in milliseconds from the start of the episode
    pub time_millis: i64,
    /// On-screen placement
    pub mode: DanmakuMode,
    /// RGB color as a packed integer (0xRRGGBB)
    pub color: u32,
    /// Sender identifier as reported by the service; empty when absent
    pub user_id: String,
    /// Comment text
    pub text: String,
}

impl Danmaku {
    /// Parses a wire comment into a typed one.
    ///
    /// Returns `None` when the attribute string is malformed: missing
    /// fields, a non-numeric time or color, a negative or non-finite time,
    /// or an unrecognized mode code. Callers never see these as errors;
    /// session construction silently filters them out.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use maku::types::{Danmaku, DanmakuMode, RawComment};
    ///
    /// let raw = RawComment {
    ///     cid: 7,
    ///     p: "3.5,5,16711680,abc123".to_string(),
    ///     m: "弹幕".to_string(),
    /// };
    /// let d = Danmaku::from_raw(raw).unwrap();
    /// assert_eq!(d.time_millis, 3500);
    /// assert_eq!(d.mode, DanmakuMode::Top);
    /// assert_eq!(d.color, 0xFF0000);
    /// assert_eq!(d.user_id, "abc123");
    /// ```
    pub fn from_raw(raw: RawComment) -> Option<Self> {
        let mut fields = raw.p.split(',');

        let seconds: f64 = fields.next()?.trim().parse().ok()?;
        if !seconds.is_finite() || seconds < 0.0 {
            return None;
        }

        let mode_code: u8 = fields.next()?.trim().parse().ok()?;
        let mode = DanmakuMode::from_code(mode_code)?;

        let color: u32 = fields.next()?.trim().parse().ok()?;
        let user_id = fields.next().unwrap_or("").trim().to_string();

        Some(Danmaku {
            time_millis: (seconds * 1000.0).round() as i64,
            mode,
            color,
            user_id,
            text: raw.m,
        })
    }
}
