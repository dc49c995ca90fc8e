use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, http::Method};
use futures_util::future::{Ready, ready};
use uuid::Uuid;

use crate::api::middleware::AssignedRequestId;

/// Per-request data handed to every handler operation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub method: Method,
    pub path: String,
}

impl FromRequest for RequestContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Outside the RequestId middleware (unit tests, ad-hoc apps) mint one here.
        let request_id = req
            .extensions()
            .get::<AssignedRequestId>()
            .map(|id| id.0.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        ready(Ok(RequestContext {
            request_id,
            method: req.method().clone(),
            path: req.path().to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::{REQUEST_ID_HEADER, RequestId};
    use actix_web::{App, HttpResponse, test, web};

    async fn echo(ctx: RequestContext) -> HttpResponse {
        HttpResponse::Ok().body(format!("{} {} {}", ctx.request_id, ctx.method, ctx.path))
    }

    #[actix_web::test]
    async fn context_carries_middleware_request_id() {
        let app = test::init_service(App::new().wrap(RequestId).route("/ctx", web::get().to(echo))).await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/ctx").to_request()).await;
        let header = res
            .headers()
            .get(REQUEST_ID_HEADER)
            .expect("request id header")
            .to_str()
            .expect("header is ascii")
            .to_owned();
        let body = test::read_body(res).await;
        let body = std::str::from_utf8(&body).expect("utf8 body");
        assert_eq!(body, format!("{} GET /ctx", header));
    }

    #[actix_web::test]
    async fn context_mints_id_without_middleware() {
        let req = test::TestRequest::get().uri("/plain").to_http_request();
        let ctx = RequestContext::extract(&req).await.expect("infallible extraction");
        assert!(Uuid::parse_str(&ctx.request_id).is_ok());
        assert_eq!(ctx.path, "/plain");
    }
}
