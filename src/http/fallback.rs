//! Fallback handlers invoked when a path has no mapping.
//!
//! # Responsibilities
//! - Define the [`FallbackHandler`] capability
//! - Provide the stock fallbacks used by the server binary
//! - Adapt closures and tower services into fallbacks
//!
//! # Design Decisions
//! - The resolver depends only on the trait, never on a concrete handler
//! - Handlers receive the request untouched and own the whole response

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use tower::{Service, ServiceExt};

/// Handles a request the resolver could not map.
pub trait FallbackHandler: Send + Sync + 'static {
    fn handle(&self, request: Request<Body>) -> BoxFuture<'_, Response>;
}

impl<T: FallbackHandler + ?Sized> FallbackHandler for Arc<T> {
    fn handle(&self, request: Request<Body>) -> BoxFuture<'_, Response> {
        (**self).handle(request)
    }
}

impl<T: FallbackHandler + ?Sized> FallbackHandler for Box<T> {
    fn handle(&self, request: Request<Body>) -> BoxFuture<'_, Response> {
        (**self).handle(request)
    }
}

/// Plain `404 Not Found`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

impl FallbackHandler for NotFound {
    fn handle(&self, _request: Request<Body>) -> BoxFuture<'_, Response> {
        Box::pin(async { (StatusCode::NOT_FOUND, "Not Found").into_response() })
    }
}

/// Fixed status and text body for every request.
#[derive(Debug, Clone)]
pub struct FixedResponse {
    status: StatusCode,
    body: String,
}

impl FixedResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

impl FallbackHandler for FixedResponse {
    fn handle(&self, _request: Request<Body>) -> BoxFuture<'_, Response> {
        let response = (self.status, self.body.clone()).into_response();
        Box::pin(async move { response })
    }
}

/// Fallback backed by an async closure. Built with [`handler_fn`].
#[derive(Clone)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wrap an async closure `Fn(Request<Body>) -> impl Future<Output = Response>`.
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    HandlerFn { f }
}

impl<F, Fut> FallbackHandler for HandlerFn<F>
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn handle(&self, request: Request<Body>) -> BoxFuture<'_, Response> {
        Box::pin((self.f)(request))
    }
}

/// Fallback backed by any infallible tower service, such as an axum `Router`.
///
/// The service is cloned per request, so it must be cheap to clone.
#[derive(Clone)]
pub struct ServiceFallback<S> {
    service: S,
}

impl<S> ServiceFallback<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }
}

impl<S, R> FallbackHandler for ServiceFallback<S>
where
    S: Service<Request<Body>, Response = R, Error = Infallible> + Clone + Send + Sync + 'static,
    S::Future: Send + 'static,
    R: IntoResponse + 'static,
{
    fn handle(&self, request: Request<Body>) -> BoxFuture<'_, Response> {
        let service = self.service.clone();
        Box::pin(async move {
            match service.oneshot(request).await {
                Ok(response) => response.into_response(),
                Err(never) => match never {},
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};

    fn request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found() {
        let res = NotFound.handle(request("/anything")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_fixed_response() {
        let fallback = FixedResponse::new(StatusCode::OK, "Hello, world!");
        let res = fallback.handle(request("/")).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_text(res).await, "Hello, world!");
    }

    #[tokio::test]
    async fn test_router_as_fallback() {
        let router = Router::new().route("/", get(|| async { "root" }));
        let fallback = ServiceFallback::new(router);

        let res = fallback.handle(request("/")).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_text(res).await, "root");

        let res = fallback.handle(request("/missing")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dyn_fallback_through_arc() {
        let fallback: Arc<dyn FallbackHandler> = Arc::new(NotFound);
        let res = fallback.handle(request("/")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
