//! Optional Prometheus metrics middleware wrapper.
//!
//! `HttpServer::new` rebuilds the `App` per worker, so the middleware stack
//! must have one type whether metrics are configured or not. This layer
//! erases the difference: both branches produce the same boxed service type,
//! with the enabled branch delegating to `actix-web-prom`.

use std::sync::Arc;

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::BoxBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::PrometheusMetrics;
use futures_util::future::LocalBoxFuture;

#[derive(Clone)]
pub(crate) enum MetricsLayer {
    Enabled(Arc<PrometheusMetrics>),
    Disabled,
}

impl MetricsLayer {
    #[must_use]
    pub(crate) fn from_option(metrics: Option<PrometheusMetrics>) -> Self {
        match metrics {
            Some(metrics) => Self::Enabled(Arc::new(metrics)),
            None => Self::Disabled,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: actix_web::body::MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        match self.clone() {
            MetricsLayer::Enabled(metrics) => {
                let wrapped = Compat::new((*metrics).clone()).new_transform(service);
                Box::pin(async move {
                    let service = wrapped.await?;
                    Ok(boxed::service(service))
                })
            }
            MetricsLayer::Disabled => Box::pin(async move {
                let service =
                    service.map(|response: ServiceResponse<B>| response.map_into_boxed_body());
                Ok(boxed::service(service))
            }),
        }
    }
}
