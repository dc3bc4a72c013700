//! Request extractor for the negotiation headers, and the one place a
//! handler outcome becomes an HTTP response.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::{HeaderName, ACCEPT, CONTENT_TYPE};
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use sensorhub_core::{AppResult, NegotiationContext, Reply};

/// `Content-Type` and `Accept` of the current request.
#[derive(Debug, Clone, Default)]
pub struct Negotiation(pub NegotiationContext);

impl Negotiation {
    /// Raw `Content-Type`.
    pub fn content_type(&self) -> Option<&str> {
        self.0.content_type.as_deref()
    }

    /// Raw `Accept`.
    pub fn accept(&self) -> Option<&str> {
        self.0.accept.as_deref()
    }
}

fn header_value(req: &HttpRequest, name: HeaderName) -> Option<&str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}

impl FromRequest for Negotiation {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Negotiation(NegotiationContext::new(
            header_value(req, CONTENT_TYPE),
            header_value(req, ACCEPT),
        ))))
    }
}

/// Renders a handler outcome for this request.
pub fn respond(negotiation: &Negotiation, outcome: AppResult<Reply>) -> HttpResponse {
    let reply = outcome.unwrap_or_else(Reply::from);
    let rendered = reply.render(negotiation.accept());
    let status = StatusCode::from_u16(rendered.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status)
        .content_type(rendered.content_type)
        .body(rendered.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use pretty_assertions::assert_eq;
    use sensorhub_core::AppError;

    #[actix_web::test]
    async fn test_extracts_headers() {
        let (req, mut payload) = TestRequest::default()
            .insert_header((CONTENT_TYPE, "application/xml"))
            .insert_header((ACCEPT, "application/json"))
            .to_http_parts();
        let negotiation = Negotiation::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(negotiation.content_type(), Some("application/xml"));
        assert_eq!(negotiation.accept(), Some("application/json"));
    }

    #[actix_web::test]
    async fn test_missing_headers() {
        let (req, mut payload) = TestRequest::default().to_http_parts();
        let negotiation = Negotiation::from_request(&req, &mut payload).await.unwrap();
        assert_eq!(negotiation.content_type(), None);
        assert_eq!(negotiation.accept(), None);
    }

    #[test]
    fn test_respond_maps_errors() {
        let negotiation = Negotiation(NegotiationContext::new(None, Some("application/xml")));
        let resp = respond(&negotiation, Err(AppError::NotFound));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            resp.headers().get(CONTENT_TYPE).unwrap(),
            "application/xml"
        );
    }
}
