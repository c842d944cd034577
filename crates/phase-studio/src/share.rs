//! Page location and clipboard plumbing for share links.

use phase_mesh::limits::{MAX_URL_LENGTH, URL_PARAM};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("Too many gradients to share: the link would be {len} characters (max {max}). Try sharing fewer gradients.", max = MAX_URL_LENGTH)]
    Unavailable { len: usize },

    #[error("Nothing to share: the collection is empty")]
    NothingToShare,

    #[error("Failed to create share URL: could not encode gradients")]
    EncodeFailed,

    #[error("Failed to copy URL to clipboard: {0}")]
    Clipboard(String),
}

/// A page URL split into its base (everything before `?`), query pairs and fragment.
///
/// Query values are kept verbatim; share tokens are URL-safe and need no escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    base: String,
    query: Vec<(String, String)>,
    fragment: Option<String>,
}

impl PageLocation {
    pub fn parse(url: &str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, frag)) => (rest, Some(frag.to_string())),
            None => (url, None),
        };
        let (base, query) = match rest.split_once('?') {
            Some((base, query)) => (base, query),
            None => (rest, ""),
        };

        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect();

        Self { base: base.to_string(), query, fragment }
    }

    /// Origin and path, with no query or fragment.
    #[inline]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Share token carried by the `gradients` parameter, if any.
    pub fn token(&self) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, v)| k == URL_PARAM && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    /// Drops the `gradients` parameter; other parameters stay.
    pub fn clear_token(&mut self) {
        self.query.retain(|(k, _)| k != URL_PARAM);
    }

    /// Full URL with `gradients` set to `token`, replacing any existing value.
    pub fn with_token(&self, token: &str) -> String {
        let mut query = self.query.clone();
        match query.iter_mut().find(|(k, _)| k == URL_PARAM) {
            Some((_, v)) => *v = token.to_string(),
            None => query.push((URL_PARAM.to_string(), token.to_string())),
        }
        self.assemble(&query)
    }

    fn assemble(&self, query: &[(String, String)]) -> String {
        let mut url = self.base.clone();
        for (i, (k, v)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(k);
            if !v.is_empty() {
                url.push('=');
                url.push_str(v);
            }
        }
        if let Some(frag) = &self.fragment {
            url.push('#');
            url.push_str(frag);
        }
        url
    }
}

impl std::fmt::Display for PageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.assemble(&self.query))
    }
}

/// Destination for copied share links.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ShareError>;
}

/// The desktop clipboard.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ShareError> {
        let mut cb = arboard::Clipboard::new().map_err(|e| ShareError::Clipboard(e.to_string()))?;
        cb.set_text(text.to_string()).map_err(|e| ShareError::Clipboard(e.to_string()))
    }
}

/// Clipboard that keeps the last copied text in memory. Headless sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
    /// When set, every write fails with this reason.
    pub fail_with: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ShareError> {
        if let Some(reason) = &self.fail_with {
            return Err(ShareError::Clipboard(reason.clone()));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}
