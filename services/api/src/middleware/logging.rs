use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::Error;
use tracing::Span;
use tracing_actix_web::{root_span, DefaultRootSpanBuilder, RootSpanBuilder, TracingLogger};

use crate::handlers::SESSION_HEADER;

/// Request spans carrying the caller's session id next to the default fields.
pub struct SessionRootSpanBuilder;

impl RootSpanBuilder for SessionRootSpanBuilder {
    fn on_request_start(request: &ServiceRequest) -> Span {
        let session = request
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        root_span!(request, session = session)
    }

    fn on_request_end<B: MessageBody>(span: Span, outcome: &Result<ServiceResponse<B>, Error>) {
        DefaultRootSpanBuilder::on_request_end(span, outcome);
    }
}

pub type Logger = TracingLogger<SessionRootSpanBuilder>;

pub fn create_logger() -> Logger {
    TracingLogger::new()
}
