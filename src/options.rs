//! Pagination and sort options appended to request paths.

use crate::error::{Error, Result};
use url::{form_urlencoded, Position, Url};

/// Query string options accepted by the `list`, `nutrients` and `search`
/// endpoints.
///
/// A `None` field is left out of the query string entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Maximum number of items to return (`max`).
    pub max: Option<u32>,
    /// Zero-based offset of the first item (`offset`).
    pub offset: Option<u32>,
    /// Sort key (`sort`), e.g. `n` for name, `id`, `c` for nutrient content.
    pub sort: Option<String>,
}

impl QueryOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the page offset.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the sort key.
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Encode the present fields as `application/x-www-form-urlencoded`.
    pub fn to_query_string(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(max) = self.max {
            query.append_pair("max", &max.to_string());
        }
        if let Some(offset) = self.offset {
            query.append_pair("offset", &offset.to_string());
        }
        if let Some(sort) = &self.sort {
            query.append_pair("sort", sort);
        }
        query.finish()
    }
}

// Paths are resolved under a directory so dot segments escaping it show up.
const REFERENCE_BASE: &str = "http://reference.invalid/base/";

/// Append `opts` to `path` as its query string.
///
/// Without options the path is returned unchanged. With options, any query
/// already present on `path` is replaced; a fragment is kept.
pub fn add_query_options(path: &str, opts: Option<&QueryOptions>) -> Result<String> {
    let opts = match opts {
        Some(o) => o,
        None => return Ok(path.to_string()),
    };

    let invalid = |reason: String| Error::InvalidPath {
        path: path.to_string(),
        reason,
    };

    // The URL parser strips tabs and newlines silently.
    if let Some(c) = path.chars().find(|c| c.is_control()) {
        return Err(invalid(format!("contains control character {:?}", c)));
    }
    if Url::parse(path).is_ok() {
        return Err(invalid("expected a relative reference, not an absolute URL".into()));
    }

    let base = Url::parse(REFERENCE_BASE).map_err(|e| invalid(e.to_string()))?;
    let mut url = base.join(path).map_err(|e| invalid(e.to_string()))?;
    if url.host_str() != base.host_str() {
        return Err(invalid("reference names a different host".into()));
    }

    let query = opts.to_query_string();
    url.set_query((!query.is_empty()).then_some(query.as_str()));

    let resolved = &url[Position::BeforePath..];
    if path.starts_with('/') {
        return Ok(resolved.to_string());
    }
    resolved
        .strip_prefix(base.path())
        .map(str::to_string)
        .ok_or_else(|| invalid("reference escapes its base path".into()))
}
