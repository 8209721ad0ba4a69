//! Pjax-related types.
//!
//! Pjax clients send an `X-PJAX` header when they only want the part of the page that changes
//! between navigations. Honoring it is opt-in: see
//! [`PageController::with_pjax_detection`](crate::PageController::with_pjax_detection).
use std::{convert::Infallible, fmt::Display};

use axum::response::IntoResponse;
use http::request::Parts;

mod header {
    /// Sent by Pjax clients on every navigation they handle.
    pub(super) const X_PJAX: http::HeaderName = http::HeaderName::from_static("x-pjax");
}

/// A Pjax request header extractor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Request {
    /// A classic request, with no Pjax header.
    #[default]
    Classic,

    /// A Pjax request.
    Pjax,
}

impl Request {
    /// Inspect the headers of a request.
    pub fn from_headers(headers: &http::HeaderMap) -> Self {
        if headers.contains_key(header::X_PJAX) {
            Self::Pjax
        } else {
            Self::Classic
        }
    }

    /// Whether the request was made by a Pjax client.
    pub fn is_pjax(&self) -> bool {
        matches!(self, Self::Pjax)
    }
}

impl<S: Send + Sync> axum::extract::FromRequestParts<S> for Request {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// An HTML response, as returned by an Axum handler.
pub struct Response<T> {
    /// The body of the response.
    body: T,

    /// The content-type of the response.
    content_type: http::HeaderValue,

    /// Some extra HTTP headers that are added to the response.
    extra_headers: http::HeaderMap,
}

impl<T> Response<T> {
    /// Create a new HTML response with the given body.
    pub fn new(body: T) -> Self {
        Self {
            body,
            content_type: http::HeaderValue::from_static("text/html; charset=utf-8"),
            extra_headers: http::HeaderMap::new(),
        }
    }

    /// Set the content type of the response.
    pub fn with_content_type(mut self, content_type: http::HeaderValue) -> Self {
        self.content_type = content_type;
        self
    }

    /// Add an extra HTTP header to the response.
    pub fn with_header(mut self, name: http::HeaderName, value: http::HeaderValue) -> Self {
        self.extra_headers.append(name, value);
        self
    }

    /// Indicate that the response body depends on the `X-PJAX` request header.
    ///
    /// Must be set whenever full and partial renders can be served from the same URL, or shared
    /// caches may hand a fragment to a browser asking for the full page.
    pub fn with_vary_on_pjax(self) -> Self {
        self.with_header(
            http::header::VARY,
            http::HeaderValue::from_static("X-PJAX"),
        )
    }
}

impl<T: Display> IntoResponse for Response<T> {
    fn into_response(self) -> axum::response::Response {
        let headers: http::HeaderMap = [(http::header::CONTENT_TYPE, self.content_type)]
            .into_iter()
            .chain(
                self.extra_headers
                    .into_iter()
                    .filter_map(|(name, value)| name.map(|name| (name, value))),
            )
            .collect();

        (http::StatusCode::OK, headers, self.body.to_string()).into_response()
    }
}
