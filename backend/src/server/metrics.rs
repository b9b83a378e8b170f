//! Optional Prometheus request metrics.
//!
//! The middleware is always installed so the app type stays the same; with
//! no exporter configured it only boxes the response body.

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use futures_util::future::LocalBoxFuture;
use std::sync::Arc;

/// Namespace for HTTP request metrics.
const METRICS_NAMESPACE: &str = "trips";

/// Build the `/metrics` exporter.
pub(crate) fn make_metrics() -> Result<PrometheusMetrics, String> {
    PrometheusMetricsBuilder::new(METRICS_NAMESPACE)
        .endpoint("/metrics")
        .build()
        .map_err(|err| err.to_string())
}

#[derive(Clone, Default)]
pub(crate) struct PrometheusLayer {
    exporter: Option<Arc<PrometheusMetrics>>,
}

impl PrometheusLayer {
    pub(crate) fn new(exporter: Option<PrometheusMetrics>) -> Self {
        Self {
            exporter: exporter.map(Arc::new),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for PrometheusLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let Some(exporter) = self.exporter.clone() else {
            let svc = service.map(|res: ServiceResponse<B>| res.map_into_boxed_body());
            return Box::pin(async move { Ok(boxed::service(svc)) });
        };
        let fut = Compat::new((*exporter).clone()).new_transform(service);
        Box::pin(async move { Ok(boxed::service(fut.await?)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::StatusCode, test, web};
    use rstest::rstest;

    #[rstest]
    #[actix_web::test]
    async fn disabled_layer_passes_requests_through() {
        let app = test::init_service(
            App::new()
                .wrap(PrometheusLayer::default())
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn enabled_layer_serves_the_metrics_endpoint() {
        let exporter = make_metrics().expect("exporter builds");
        let app = test::init_service(
            App::new()
                .wrap(PrometheusLayer::new(Some(exporter)))
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let _ = test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
    }
}
