//! Request timing middleware feeding the performance monitor

use crate::server::state::AppState;
use crate::utils::duration_ms;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::web;
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::time::Instant;
use tracing::debug;

/// Records every response's latency and error status with the monitor
pub struct RequestTiming;

impl<S, B> Transform<S, ServiceRequest> for RequestTiming
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequestTimingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTimingService { service }))
    }
}

/// Service implementation for request timing middleware
pub struct RequestTimingService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTimingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let monitor = req
            .app_data::<web::Data<AppState>>()
            .and_then(|state| state.monitor.clone());

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;

            let elapsed_ms = duration_ms(start_time.elapsed());
            let status = res.status();
            if let Some(monitor) = monitor {
                monitor.track_request(elapsed_ms, status.as_u16() >= 400);
            }

            debug!("{} {} -> {} in {:.2}ms", method, path, status.as_u16(), elapsed_ms);
            Ok(res)
        })
    }
}
