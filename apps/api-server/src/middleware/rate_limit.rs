//! Per-client rate limiting in front of every route except the health check.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use easel_shared::ErrorResponse;
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use easel_core::ports::RateLimiter;

/// Paths that never count against a client's budget.
const EXEMPT_PATHS: &[&str] = &["/api/health"];

/// Rate limiting middleware factory.
pub struct RateLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: Arc<dyn RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let limiter = self.limiter.clone();

        if EXEMPT_PATHS.contains(&req.path()) {
            return Box::pin(async move { Ok(service.call(req).await?.map_into_left_body()) });
        }

        // The socket peer, never X-Forwarded-For: clients can forge that.
        let client = req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        Box::pin(async move {
            match limiter.check(&client).await {
                Ok(result) if !result.allowed => {
                    tracing::warn!(%client, path = %req.path(), "Rate limit exceeded");

                    let retry_after = result.reset_after.as_secs().max(1);
                    let error = ErrorResponse::new(429, "Too Many Requests").with_message(format!(
                        "Rate limit exceeded. Try again in {} seconds.",
                        retry_after
                    ));

                    let response = HttpResponse::TooManyRequests()
                        .insert_header(("X-RateLimit-Remaining", "0"))
                        .insert_header(("Retry-After", retry_after.to_string()))
                        .json(error);

                    Ok(req.into_response(response).map_into_right_body())
                }
                Ok(_) => Ok(service.call(req).await?.map_into_left_body()),
                Err(e) => {
                    // Fail open
                    tracing::error!(%client, "Rate limiter error: {}", e);
                    Ok(service.call(req).await?.map_into_left_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test, web};
    use easel_infra::{InMemoryRateLimiter, RateLimitConfig};
    use std::time::Duration;

    #[actix_web::test]
    async fn test_rejects_after_budget_but_not_health() {
        let limiter = Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(60),
        }));
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(limiter))
                .route("/api/posts", web::get().to(|| async { HttpResponse::Ok().finish() }))
                .route("/api/health", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let first = test::call_service(&app, test::TestRequest::get().uri("/api/posts").to_request()).await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = test::call_service(&app, test::TestRequest::get().uri("/api/posts").to_request()).await;
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(second.headers().contains_key("retry-after"));

        let health = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
        assert_eq!(health.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_forwarded_headers_do_not_reset_budget() {
        let limiter = Arc::new(InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(60),
        }));
        let app = test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(limiter))
                .route("/api/posts", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let peer: std::net::SocketAddr = "203.0.113.7:40000".parse().unwrap();

        let mut statuses = Vec::new();
        for i in 0..5 {
            let req = test::TestRequest::get()
                .uri("/api/posts")
                .peer_addr(peer)
                .insert_header(("X-Forwarded-For", format!("10.0.0.{i}")))
                .insert_header(("Forwarded", format!("for=10.1.0.{i}")))
                .to_request();
            statuses.push(test::call_service(&app, req).await.status());
        }

        assert_eq!(statuses[0], StatusCode::OK);
        assert!(statuses[1..].iter().all(|s| *s == StatusCode::TOO_MANY_REQUESTS));

        // A different socket peer has its own budget.
        let other = test::TestRequest::get()
            .uri("/api/posts")
            .peer_addr("198.51.100.1:40000".parse().unwrap())
            .to_request();
        assert_eq!(test::call_service(&app, other).await.status(), StatusCode::OK);
    }
}
