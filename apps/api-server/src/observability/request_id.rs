//! Request ID middleware - tags every request and response with an ID.

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the request ID in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reuses an incoming `X-Request-ID` (from a proxy or the client) or mints
/// a UUID, records it on a tracing span and echoes it on the response.
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestIdService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService { service }))
    }
}

pub struct RequestIdService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let header_value = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| {
                HeaderValue::from_str(&Uuid::new_v4().to_string())
                    .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
            });

        let request_id = RequestId(header_value.to_str().unwrap_or("unknown").to_string());
        let span = tracing::info_span!("request", request_id = %request_id.0);
        req.extensions_mut().insert(request_id);

        let fut = self.service.call(req);

        Box::pin(
            async move {
                let mut res = fut.await?;
                res.headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value);
                Ok(res)
            }
            .instrument(span),
        )
    }
}

/// The current request's ID, readable from request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn test_generates_and_echoes_id() {
        let app = test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let generated = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let id = generated.headers().get("x-request-id").unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());

        let echoed = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/")
                .insert_header(("X-Request-ID", "abc-123"))
                .to_request(),
        )
        .await;
        assert_eq!(echoed.headers().get("x-request-id").unwrap(), "abc-123");
    }
}
