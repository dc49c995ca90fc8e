use actix_cors::CorsError;
use actix_web::{
    ResponseError,
    dev::ServiceResponse,
    http::header::{CONTENT_LENGTH, CONTENT_TYPE},
    middleware::ErrorHandlerResponse,
};

use crate::errors::AppError;

/// Single interception point for error responses the handlers did not
/// build themselves: unmatched methods, rejected origins, or extractor
/// failures outside the configured hooks. Responses already rendered from
/// an `AppError` pass through untouched.
pub fn translate_error_response<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let already_translated = res
        .response()
        .error()
        .and_then(|err| err.as_error::<AppError>())
        .is_some();
    if already_translated {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let (req, original) = res.into_parts();
    let error = match original.error().and_then(|err| err.as_error::<CorsError>()) {
        Some(cors) => AppError::BadRequest(cors.to_string()),
        None => AppError::from_status(original.status()),
    };
    log::debug!(
        "translating engine error {} for {} {}",
        original.status(),
        req.method(),
        req.path()
    );

    let mut translated = error.error_response();
    // Keep CORS, request id and Allow headers set further down the chain.
    for (name, value) in original.headers() {
        if *name != CONTENT_TYPE && *name != CONTENT_LENGTH {
            translated.headers_mut().append(name.clone(), value.clone());
        }
    }

    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, translated).map_into_right_body(),
    ))
}

pub async fn route_not_found(req: actix_web::HttpRequest) -> Result<actix_web::HttpResponse, AppError> {
    log::warn!("No route for {} {}", req.method(), req.path());
    Err(AppError::NotFound(format!(
        "No route for {} {}",
        req.method(),
        req.path()
    )))
}
