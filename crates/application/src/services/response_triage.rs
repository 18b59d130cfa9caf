//! Response triage
//!
//! Classifies a raw backend body before structured parsing is attempted.
//! Checks run in the order redirect, expired session, internal error and
//! short-circuit on the first hit.

use std::fmt;
use std::sync::LazyLock;

use aho_corasick::AhoCorasick;
use tracing::warn;
use url::Url;

use crate::error::ProviderError;

/// Classification of a raw backend response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseClass {
    /// Ordinary response, safe to parse
    Normal,
    /// Meta-refresh or script redirect to an absolute URL
    Redirect(Url),
    /// Backend session or connection id no longer valid
    SessionExpired,
    /// Generic backend error page
    InternalError,
}

impl ResponseClass {
    /// Whether the body can be handed to the structured parser
    #[must_use]
    pub const fn is_normal(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

impl fmt::Display for ResponseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Redirect(url) => write!(f, "redirect to {url}"),
            Self::SessionExpired => f.write_str("session expired"),
            Self::InternalError => f.write_str("internal error"),
        }
    }
}

/// Known "session no longer valid" texts across backend families
pub const DEFAULT_SESSION_EXPIRED_MARKERS: &[&str] = &[
    "your session has expired",
    "session expired",
    "session is no longer valid",
    "connection id is no longer valid",
    "ihre verbindungskennung ist nicht mehr gültig",
    "verbindungskennung ist nicht mehr gültig",
    "die sitzung ist abgelaufen",
    "sitzung abgelaufen",
    "la session a expiré",
];

/// Known internal-error page texts across backend families
pub const DEFAULT_INTERNAL_ERROR_MARKERS: &[&str] = &[
    "internal server error",
    "an internal error occurred",
    "interner fehler",
    "es ist ein interner fehler aufgetreten",
    "service temporarily unavailable",
    "<title>error</title>",
    "the server encountered an internal error",
    "erreur interne",
];

const SCRIPT_REDIRECT_MARKERS: &[&str] = &[
    "location.href",
    "location.replace",
    "location.assign",
    "window.location",
    "document.location",
];

fn build_matcher<I, P>(patterns: I) -> Result<AhoCorasick, ProviderError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<[u8]>,
{
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(patterns)
        .map_err(|e| ProviderError::precondition(format!("invalid triage marker: {e}")))
}

static SESSION_EXPIRED: LazyLock<AhoCorasick> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Infallible with valid static patterns
    build_matcher(DEFAULT_SESSION_EXPIRED_MARKERS).expect("Failed to build session matcher")
});

static INTERNAL_ERROR: LazyLock<AhoCorasick> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Infallible with valid static patterns
    build_matcher(DEFAULT_INTERNAL_ERROR_MARKERS).expect("Failed to build error matcher")
});

static SCRIPT_REDIRECT: LazyLock<AhoCorasick> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Infallible with valid static patterns
    build_matcher(SCRIPT_REDIRECT_MARKERS).expect("Failed to build redirect matcher")
});

/// Marker sets used to classify raw responses
#[derive(Clone)]
pub struct ResponseTriage {
    session_expired: AhoCorasick,
    internal_error: AhoCorasick,
}

impl fmt::Debug for ResponseTriage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseTriage")
            .field("session_expired_markers", &self.session_expired.patterns_len())
            .field("internal_error_markers", &self.internal_error.patterns_len())
            .finish()
    }
}

impl Default for ResponseTriage {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseTriage {
    /// Triage with the built-in markers
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_expired: SESSION_EXPIRED.clone(),
            internal_error: INTERNAL_ERROR.clone(),
        }
    }

    /// Triage with the built-in markers plus backend-specific ones
    ///
    /// Markers match ASCII case-insensitively.
    pub fn with_extra_markers(
        session_expired: &[&str],
        internal_error: &[&str],
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            session_expired: build_matcher(
                DEFAULT_SESSION_EXPIRED_MARKERS.iter().chain(session_expired),
            )?,
            internal_error: build_matcher(
                DEFAULT_INTERNAL_ERROR_MARKERS.iter().chain(internal_error),
            )?,
        })
    }

    /// Whether the body is an expired-session page
    #[must_use]
    pub fn is_session_expired(&self, body: &str) -> bool {
        self.session_expired.is_match(body)
    }

    /// Whether the body is a generic internal-error page
    #[must_use]
    pub fn is_internal_error(&self, body: &str) -> bool {
        self.internal_error.is_match(body)
    }

    /// Absolute redirect target of a meta-refresh or script redirect page
    ///
    /// Relative targets are resolved against `request_url`.
    #[must_use]
    pub fn extract_redirect(&self, body: &str, request_url: &Url) -> Option<Url> {
        let target = meta_refresh_target(body).or_else(|| script_redirect_target(body))?;
        let target = target.trim().replace("&amp;", "&");
        if target.is_empty() {
            return None;
        }
        request_url.join(&target).ok()
    }

    /// Classify a raw body, first match wins
    #[must_use]
    pub fn classify(&self, body: &str, request_url: &Url) -> ResponseClass {
        let class = if let Some(target) = self.extract_redirect(body, request_url) {
            ResponseClass::Redirect(target)
        } else if self.is_session_expired(body) {
            ResponseClass::SessionExpired
        } else if self.is_internal_error(body) {
            ResponseClass::InternalError
        } else {
            return ResponseClass::Normal;
        };
        warn!(url = %request_url, class = %class, "Backend returned a non-structured page");
        class
    }
}

/// Target of `<meta http-equiv="refresh" content="N; url=...">`
fn meta_refresh_target(body: &str) -> Option<&str> {
    let lower = body.to_ascii_lowercase();
    let mut from = 0;
    while let Some(offset) = lower[from..].find("<meta") {
        let start = from + offset;
        let end = lower[start..].find('>').map_or(lower.len(), |e| start + e);
        let tag = &lower[start..end];
        from = end;

        if !tag.contains("http-equiv") || !tag.contains("refresh") {
            continue;
        }
        let Some(content_at) = tag.find("content") else {
            continue;
        };
        let Some((value_start, value_end)) = attribute_value(tag, content_at + "content".len())
        else {
            continue;
        };
        let value = &tag[value_start..value_end];
        let Some(url_at) = value.find("url=") else {
            continue;
        };
        let target_start = start + value_start + url_at + "url=".len();
        let target = body[target_start..start + value_end].trim();
        return Some(target.trim_matches(|c| c == '\'' || c == '"'));
    }
    None
}

/// Byte range of an attribute value following `name`, quoted or bare
fn attribute_value(tag: &str, after_name: usize) -> Option<(usize, usize)> {
    let rest = &tag[after_name..];
    let eq = rest.find('=')?;
    if !rest[..eq].trim().is_empty() {
        return None;
    }
    let value = &rest[eq + 1..];
    let skipped = value.len() - value.trim_start().len();
    let value_start = after_name + eq + 1 + skipped;
    let value = &tag[value_start..];
    match value.chars().next()? {
        quote @ ('"' | '\'') => {
            let close = value[1..].find(quote)?;
            Some((value_start + 1, value_start + 1 + close))
        },
        _ => {
            let len = value
                .find(char::is_whitespace)
                .unwrap_or(value.len());
            Some((value_start, value_start + len))
        },
    }
}

/// Target of `location.href = '...'`, `window.location = "..."` or
/// `location.replace('...')`
fn script_redirect_target(body: &str) -> Option<&str> {
    for found in SCRIPT_REDIRECT.find_overlapping_iter(body) {
        let rest = body[found.end()..].trim_start();
        let Some(rest) = rest
            .strip_prefix('=')
            .or_else(|| rest.strip_prefix('('))
        else {
            continue;
        };
        let rest = rest.trim_start();
        let Some(quote) = rest.chars().next().filter(|c| *c == '\'' || *c == '"') else {
            continue;
        };
        let rest = &rest[1..];
        if let Some(close) = rest.find(quote) {
            return Some(&rest[..close]);
        }
    }
    None
}
