//! Time-indexed danmaku sessions.
//!
//! A [`DanmakuSession`] owns the comments for one episode, sorted by
//! playback time, and is what a provider hands back to the player. The
//! session is immutable once built; the player queries it by time window as
//! playback advances and drops it when playback ends.
//!
//! Construction from wire comments is best-effort: entries whose attribute
//! string cannot be decoded are silently filtered out, never surfaced as
//! errors. Parsing a large comment list is CPU-bound, so providers run
//! [`DanmakuSession::from_raw`] on a blocking worker thread.
//!
//! # Examples
//!
//! ```rust
//! use maku::session::DanmakuSession;
//! use maku::types::RawComment;
//!
//! let raw = vec![
//!     RawComment { cid: 2, p: "30.0,1,16777215".into(), m: "后面的".into() },
//!     RawComment { cid: 1, p: "5.0,1,16777215".into(), m: "前面的".into() },
//! ];
//!
//! let session = DanmakuSession::from_raw(raw);
//! assert_eq!(session.len(), 2);
//! assert_eq!(session.comments()[0].time_millis, 5000);
//! ```

use crate::types::{Danmaku, RawComment};
use std::ops::Range;

/// An immutable, time-ascending collection of danmaku for one episode.
///
/// Built once per successful fetch. Comments are stored sorted by
/// `time_millis`, so window queries are binary searches and full iteration
/// yields comments in playback order.
#[derive(Debug, Clone, Default)]
pub struct DanmakuSession {
    comments: Vec<Danmaku>,
}

impl DanmakuSession {
    /// Builds a session from parsed comments, sorting them by time.
    ///
    /// Input order does not matter; the stored order is always ascending by
    /// `time_millis`. The sort is stable, so comments sharing a timestamp
    /// keep their relative input order.
    pub fn new(mut comments: Vec<Danmaku>) -> Self {
        comments.sort_by_key(|c| c.time_millis);
        Self { comments }
    }

    /// Builds a session from wire comments, dropping malformed entries.
    ///
    /// Each [`RawComment`] is decoded with
    /// [`Danmaku::from_raw`](crate::types::Danmaku::from_raw); entries that
    /// fail to decode are skipped. This never fails: a fully malformed
    /// input simply produces an empty session.
    pub fn from_raw(raw: Vec<RawComment>) -> Self {
        let total = raw.len();
        let comments: Vec<Danmaku> = raw.into_iter().filter_map(Danmaku::from_raw).collect();
        let dropped = total - comments.len();
        if dropped > 0 {
            tracing::debug!(total, dropped, "dropped malformed danmaku comments");
        }
        Self::new(comments)
    }

    /// Number of comments in the session.
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// `true` if the session holds no comments.
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// All comments, ascending by time.
    pub fn comments(&self) -> &[Danmaku] {
        &self.comments
    }

    /// Iterates over all comments in playback order.
    pub fn iter(&self) -> impl Iterator<Item = &Danmaku> {
        self.comments.iter()
    }

    /// Comments whose time offset falls within `range` (milliseconds,
    /// half-open).
    ///
    /// This is the query the playback overlay issues repeatedly as the
    /// play head advances; it is a pair of binary searches over the sorted
    /// storage, no allocation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use maku::session::DanmakuSession;
    /// use maku::types::RawComment;
    ///
    /// let session = DanmakuSession::from_raw(vec![
    ///     RawComment { cid: 1, p: "1.0,1,255".into(), m: "a".into() },
    ///     RawComment { cid: 2, p: "2.0,1,255".into(), m: "b".into() },
    ///     RawComment { cid: 3, p: "9.0,1,255".into(), m: "c".into() },
    /// ]);
    ///
    /// let window = session.time_range(0..3000);
    /// assert_eq!(window.len(), 2);
    /// ```
    pub fn time_range(&self, range: Range<i64>) -> &[Danmaku] {
        let start = self
            .comments
            .partition_point(|c| c.time_millis < range.start);
        let end = self.comments.partition_point(|c| c.time_millis < range.end);
        &self.comments[start..end]
    }

    /// Time offset of the last comment in milliseconds, or 0 when empty.
    pub fn duration_millis(&self) -> i64 {
        self.comments.last().map(|c| c.time_millis).unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a DanmakuSession {
    type Item = &'a Danmaku;
    type IntoIter = std::slice::Iter<'a, Danmaku>;

    fn into_iter(self) -> Self::IntoIter {
        self.comments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(cid: i64, p: &str, m: &str) -> RawComment {
        RawComment {
            cid,
            p: p.to_string(),
            m: m.to_string(),
        }
    }

    #[test]
    fn test_sorts_regardless_of_input_order() {
        let session = DanmakuSession::from_raw(vec![
            raw(1, "42.0,1,255", "late"),
            raw(2, "3.0,1,255", "early"),
            raw(3, "17.5,1,255", "middle"),
        ]);

        let times: Vec<i64> = session.iter().map(|c| c.time_millis).collect();
        assert_eq!(times, vec![3000, 17500, 42000]);
    }

    #[test]
    fn test_malformed_entries_are_dropped() {
        let session = DanmakuSession::from_raw(vec![
            raw(1, "1.0,1,255", "ok"),
            raw(2, "garbage", "bad"),
            raw(3, "2.0,99,255", "bad mode"),
            raw(4, "5.5,4,0", "ok"),
        ]);

        assert_eq!(session.len(), 2);
        assert!(session.iter().all(|c| c.text.starts_with("ok")));
    }

    #[test]
    fn test_fully_malformed_input_yields_empty_session() {
        let session = DanmakuSession::from_raw(vec![raw(1, "", "a"), raw(2, "x,y,z", "b")]);
        assert!(session.is_empty());
        assert_eq!(session.duration_millis(), 0);
    }

    #[test]
    fn test_time_range_window() {
        let session = DanmakuSession::from_raw(vec![
            raw(1, "1.0,1,255", "a"),
            raw(2, "2.0,1,255", "b"),
            raw(3, "2.0,1,255", "c"),
            raw(4, "9.0,1,255", "d"),
        ]);

        assert_eq!(session.time_range(0..1000).len(), 0);
        assert_eq!(session.time_range(1000..2001).len(), 3);
        assert_eq!(session.time_range(2000..3000).len(), 2);
        assert_eq!(session.time_range(9001..i64::MAX).len(), 0);
        assert_eq!(session.time_range(0..i64::MAX).len(), 4);
    }

    #[test]
    fn test_duration_is_last_offset() {
        let session =
            DanmakuSession::from_raw(vec![raw(1, "1.0,1,255", "a"), raw(2, "60.5,1,255", "b")]);
        assert_eq!(session.duration_millis(), 60500);
    }
}
