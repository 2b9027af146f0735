//! Query-string normalization for paging
//!
//! Out-of-range or unparseable `limit`, `offset` and `couplet` values are
//! corrected to their defaults instead of being rejected.

/// Page size when the caller gives none, or a non-positive one
pub const DEFAULT_LIMIT: i64 = 10;

/// Couplet index when the caller gives none; the paginator reads it as the first
pub const DEFAULT_COUPLET: usize = 0;

/// LIMIT/OFFSET pair for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Always positive
    pub limit: i64,
    /// Never negative
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    /// Normalize raw query values
    ///
    /// # Examples
    /// ```
    /// use mlib_cs::pagination::Page;
    ///
    /// let p = Page::from_query(Some("25"), Some("50"));
    /// assert_eq!((p.limit, p.offset), (25, 50));
    ///
    /// // Garbage and out-of-range values fall back to the defaults
    /// let p = Page::from_query(Some("-3"), Some("abc"));
    /// assert_eq!((p.limit, p.offset), (10, 0));
    /// ```
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Self {
        Self::new(parse_int(limit), parse_int(offset))
    }

    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT),
            offset: offset.filter(|o| *o >= 0).unwrap_or(0),
        }
    }
}

/// Normalize the raw `couplet` query value to a non-negative index
pub fn couplet_index(raw: Option<&str>) -> usize {
    parse_int(raw)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(DEFAULT_COUPLET)
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}
