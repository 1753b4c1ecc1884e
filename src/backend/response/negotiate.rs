/**
 * Format Negotiation
 *
 * Decides which representation a caller asked for. Signals are checked in
 * this order and the first one present wins:
 *
 * 1. `format` query parameter (`?format=xml`)
 * 2. Path extension (`/api/widgets.xml`)
 * 3. `Accept` header, highest q-value first
 *
 * No signal at all, or a wildcard, means JSON. A signal naming only formats
 * we cannot produce is "not acceptable".
 */

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::{header::ACCEPT, request::Parts, HeaderMap, Uri};

use crate::shared::ResponseFormat;

/// The caller asked only for formats we cannot produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotAcceptable {
    pub requested: String,
}

/// Outcome of negotiation for one request
///
/// Extracting never fails; an unsupported format is carried along and only
/// matters once something has to be emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedFormat(pub Result<ResponseFormat, NotAcceptable>);

impl RequestedFormat {
    pub fn from_parts(uri: &Uri, headers: &HeaderMap) -> Self {
        Self(negotiate(uri, headers))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestedFormat {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(&parts.uri, &parts.headers))
    }
}

/// Resolve the representation for a request
pub fn negotiate(uri: &Uri, headers: &HeaderMap) -> Result<ResponseFormat, NotAcceptable> {
    if let Some(requested) = format_param(uri) {
        return parse_named(&requested);
    }

    if let Some(extension) = path_extension(uri.path()) {
        return parse_named(extension);
    }

    match headers.get(ACCEPT).and_then(|value| value.to_str().ok()) {
        Some(accept) if !accept.trim().is_empty() => from_accept(accept),
        _ => Ok(ResponseFormat::default()),
    }
}

fn parse_named(name: &str) -> Result<ResponseFormat, NotAcceptable> {
    name.parse().map_err(|_| NotAcceptable {
        requested: name.to_string(),
    })
}

fn format_param(uri: &Uri) -> Option<String> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri).ok()?;
    pairs
        .into_iter()
        .find(|(key, _)| key == "format")
        .map(|(_, value)| value)
}

fn path_extension(path: &str) -> Option<&str> {
    let last = path.rsplit('/').next()?;
    let (stem, extension) = last.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some(extension)
}

fn from_accept(accept: &str) -> Result<ResponseFormat, NotAcceptable> {
    let mut ranges: Vec<(&str, f32)> = accept
        .split(',')
        .filter_map(|range| {
            let mut parts = range.split(';');
            let mime = parts.next()?.trim();
            if mime.is_empty() {
                return None;
            }
            let quality = parts
                .filter_map(|param| param.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            Some((mime, quality))
        })
        .filter(|(_, quality)| *quality > 0.0)
        .collect();

    // stable: equal q-values keep header order
    ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (mime, _) in &ranges {
        if let Some(format) = ResponseFormat::from_mime(mime) {
            return Ok(format);
        }
        if *mime == "*/*" || *mime == "application/*" {
            return Ok(ResponseFormat::default());
        }
    }

    Err(NotAcceptable {
        requested: accept.to_string(),
    })
}
