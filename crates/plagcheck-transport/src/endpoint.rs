//! API base URL resolution.

use url::Url;

use crate::BackendError;

/// Base URL used when neither a flag nor the environment supplies one.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Validated API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    url: Url,
}

impl ApiBase {
    /// Parses and validates a base URL.
    ///
    /// Surrounding whitespace and one pair of matching quotes are stripped,
    /// so values copied from `.env` files work as-is.
    ///
    /// # Errors
    /// Returns [`BackendError::InvalidBaseUrl`] unless the value is an
    /// absolute `http`/`https` URL that can carry a path.
    pub fn parse(raw: &str) -> Result<Self, BackendError> {
        let cleaned = strip_quotes(raw.trim()).trim();
        let url = Url::parse(cleaned)
            .map_err(|error| BackendError::InvalidBaseUrl(format!("{cleaned:?}: {error}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(BackendError::InvalidBaseUrl(format!(
                "{cleaned:?}: scheme must be http or https"
            )));
        }
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(BackendError::InvalidBaseUrl(format!(
                "{cleaned:?}: missing host"
            )));
        }

        Ok(Self { url })
    }

    /// The base as text, without a trailing slash.
    pub fn as_str(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }

    /// Joins path segments onto the base. Segments are percent-encoded, so
    /// opaque task ids cannot escape their position.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.url.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Picks the base URL: explicit flag, then environment value, then
/// [`DEFAULT_API_BASE`]. Blank values count as absent.
///
/// # Errors
/// Returns [`BackendError::InvalidBaseUrl`] when the chosen value is invalid.
pub fn resolve_api_base(flag: Option<&str>, env: Option<&str>) -> Result<ApiBase, BackendError> {
    let chosen = [flag, env]
        .into_iter()
        .flatten()
        .find(|value| !strip_quotes(value.trim()).trim().is_empty())
        .unwrap_or(DEFAULT_API_BASE);
    ApiBase::parse(chosen)
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
