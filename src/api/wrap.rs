use std::future::Future;

use actix_web::{FromRequest, HttpResponse, http::StatusCode};
use futures_util::future::LocalBoxFuture;
use serde::Serialize;

use crate::{api::context::RequestContext, errors::AppError};

/// Adapts a handler operation `(ctx, input) -> Result<R, AppError>` into an
/// actix handler. `input` is any extractor (`()`, `ValidatedJson<T>`,
/// `web::Query<T>`); success is serialized as JSON with the route's fixed
/// `status`, errors go to the error hook.
pub fn wrap_with_status<F, Fut, I, R>(
    operation: F,
    status: StatusCode,
) -> impl Fn(RequestContext, I) -> LocalBoxFuture<'static, Result<HttpResponse, AppError>>
+ Clone
+ 'static
where
    F: Fn(RequestContext, I) -> Fut + Clone + 'static,
    Fut: Future<Output = Result<R, AppError>> + 'static,
    I: FromRequest + 'static,
    R: Serialize + 'static,
{
    move |ctx, input| {
        let fut = operation(ctx, input);
        Box::pin(async move {
            let body = fut.await?;
            Ok(HttpResponse::build(status).json(body))
        })
    }
}
