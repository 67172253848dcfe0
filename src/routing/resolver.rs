//! Path resolution and fallback delegation.
//!
//! # Responsibilities
//! - Decide, per request path, between redirect and delegation
//! - Pair a resolver with the fallback that handles misses
//!
//! # Design Decisions
//! - Resolution is a pure function returning [`Resolution`]; the HTTP
//!   adapter turns it into a response
//! - A miss is a defined outcome, never an error
//! - Construction cannot fail and performs no validation of the fallback

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use percent_encoding::percent_decode_str;

use crate::http::fallback::FallbackHandler;
use crate::routing::table::LookupTable;

/// Outcome of resolving a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Redirect to the configured destination.
    Redirect(&'a str),
    /// No entry for the path; hand the request to the fallback.
    Delegate,
}

/// Immutable path resolver backed by a [`LookupTable`].
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    table: Arc<LookupTable>,
}

impl Resolver {
    pub fn new(table: LookupTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// Resolve a request path against the table.
    pub fn resolve(&self, path: &str) -> Resolution<'_> {
        match self.table.get(path) {
            Some(destination) => Resolution::Redirect(destination),
            None => Resolution::Delegate,
        }
    }

    pub fn table(&self) -> &LookupTable {
        &self.table
    }
}

/// A resolver together with the fallback used on a miss.
///
/// This is the unit the HTTP server installs. It is itself a
/// [`FallbackHandler`], so handlers can be chained: a miss in one table is
/// delegated to the next.
pub struct RedirectHandler<F: ?Sized = dyn FallbackHandler> {
    resolver: Resolver,
    fallback: Arc<F>,
}

impl<F: ?Sized> Clone for RedirectHandler<F> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            fallback: self.fallback.clone(),
        }
    }
}

impl<F: ?Sized> std::fmt::Debug for RedirectHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectHandler")
            .field("entries", &self.resolver.table().len())
            .finish_non_exhaustive()
    }
}

/// Build a handler that redirects paths found in `lookup` and delegates
/// everything else to `fallback`.
pub fn build_resolver<F>(lookup: impl Into<LookupTable>, fallback: F) -> RedirectHandler<F>
where
    F: FallbackHandler,
{
    RedirectHandler::with_shared_fallback(lookup, Arc::new(fallback))
}

impl<F: FallbackHandler + ?Sized> RedirectHandler<F> {
    /// Build a handler around a fallback that is already shared, e.g. an
    /// `Arc<dyn FallbackHandler>` reused across reloads.
    pub fn with_shared_fallback(lookup: impl Into<LookupTable>, fallback: Arc<F>) -> Self {
        let resolver = Resolver::new(lookup.into());
        tracing::debug!(entries = resolver.table().len(), "Resolver built");
        Self { resolver, fallback }
    }

    pub fn resolve(&self, path: &str) -> Resolution<'_> {
        self.resolver.resolve(path)
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn fallback(&self) -> &Arc<F> {
        &self.fallback
    }

    /// Answer a request: 302 on a hit, the fallback's response on a miss.
    ///
    /// The lookup key is the percent-decoded request path.
    pub async fn respond(&self, request: Request<Body>) -> Response {
        let destination = {
            let path = decode_path(request.uri().path());
            match self.resolver.resolve(&path) {
                Resolution::Redirect(destination) => {
                    tracing::debug!(path = %path, destination = %destination, "Redirecting");
                    Some(destination)
                }
                Resolution::Delegate => {
                    tracing::trace!(path = %path, "No mapping, delegating to fallback");
                    None
                }
            }
        };

        match destination {
            Some(destination) => found(destination),
            None => self.fallback.handle(request).await,
        }
    }
}

impl<F: ?Sized> RedirectHandler<F> {
    /// Erase the fallback type so handlers from different sources can be
    /// swapped behind one type.
    pub fn into_dyn(self) -> RedirectHandler
    where
        F: FallbackHandler + Sized,
    {
        let fallback: Arc<dyn FallbackHandler> = self.fallback;
        RedirectHandler {
            resolver: self.resolver,
            fallback,
        }
    }
}

impl<F: FallbackHandler + ?Sized> FallbackHandler for RedirectHandler<F> {
    fn handle(&self, request: Request<Body>) -> BoxFuture<'_, Response> {
        Box::pin(self.respond(request))
    }
}

/// Percent-decode a request path. Paths that do not decode to UTF-8 are
/// looked up as received.
fn decode_path(raw: &str) -> Cow<'_, str> {
    percent_decode_str(raw).decode_utf8().unwrap_or(Cow::Borrowed(raw))
}

/// `302 Found` with the destination copied verbatim into `Location`.
fn found(destination: &str) -> Response {
    match HeaderValue::from_str(destination) {
        Ok(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
        Err(e) => {
            tracing::error!(
                destination = %destination.escape_debug(),
                error = %e,
                "Destination is not a valid Location header value"
            );
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
