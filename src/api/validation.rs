//! Request decoding and declarative validation.
//! Anything rejected here is answered by the error hook before a handler runs.

use std::collections::BTreeMap;
use std::ops::Deref;

use actix_web::{
    FromRequest, HttpRequest,
    dev::Payload,
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web,
};
use futures_util::future::LocalBoxFuture;
use serde::{Serialize, de::DeserializeOwned};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::errors::AppError;

/// One failed constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Failed constraints keyed by field path (`owner.email`, `items[2].sku`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationDetails {
    pub fields: BTreeMap<String, Vec<FieldViolation>>,
}

impl From<&ValidationErrors> for ValidationDetails {
    fn from(errors: &ValidationErrors) -> Self {
        let mut details = ValidationDetails::default();
        collect(&mut details.fields, "", errors);
        details
    }
}

fn collect(
    fields: &mut BTreeMap<String, Vec<FieldViolation>>,
    prefix: &str,
    errors: &ValidationErrors,
) {
    for (field, kind) in errors.errors() {
        let path = format!("{}{}", prefix, field);
        match kind {
            ValidationErrorsKind::Field(violations) => {
                fields
                    .entry(path)
                    .or_default()
                    .extend(violations.iter().map(|v| FieldViolation {
                        code: v.code.to_string(),
                        message: v.message.as_ref().map(|m| m.to_string()),
                    }));
            }
            ValidationErrorsKind::Struct(inner) => {
                collect(fields, &format!("{}.", path), inner);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(fields, &format!("{}[{}].", path, index), inner);
                }
            }
        }
    }
}

/// JSON body that has been deserialized and passed its `Validate` rules.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let json = web::Json::<T>::from_request(req, payload);
        let path = req.path().to_string();

        Box::pin(async move {
            let value = json.await?.into_inner();
            if let Err(errors) = value.validate() {
                log::debug!("validation rejected body for {}: {}", path, errors);
                return Err(AppError::from(errors).into());
            }
            Ok(ValidatedJson(value))
        })
    }
}

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejecting JSON body for {}: {}", req.path(), err);
    let error = match err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            AppError::PayloadTooLarge
        }
        JsonPayloadError::ContentType => {
            AppError::BadRequest("Content type must be application/json".to_string())
        }
        JsonPayloadError::Deserialize(e) => AppError::BadRequest(format!("Malformed JSON body: {}", e)),
        _ => AppError::BadRequest("Unable to read request body".to_string()),
    };
    error.into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejecting query for {}: {}", req.path(), err);
    AppError::BadRequest(format!("Invalid query string: {}", err)).into()
}

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("rejecting path parameters for {}: {}", req.path(), err);
    AppError::BadRequest(format!("Invalid path parameter: {}", err)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::StatusCode, test};
    use serde::Deserialize;
    use serde_json::{Value, json};

    #[derive(Debug, Deserialize, Validate)]
    struct Owner {
        #[validate(email)]
        email: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct CreateWidget {
        #[validate(length(min = 1, max = 32, message = "name must be 1-32 characters"))]
        name: String,
        #[validate(range(min = 1, max = 100))]
        quantity: u32,
        #[validate(nested)]
        owner: Owner,
    }

    async fn create_widget(body: ValidatedJson<CreateWidget>) -> HttpResponse {
        HttpResponse::Ok().json(json!({ "name": body.name, "quantity": body.quantity }))
    }

    async fn post(body: Value) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .route("/widgets", web::post().to(create_widget)),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/widgets")
            .set_json(body)
            .to_request();
        let res = test::call_service(&app, req).await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    #[actix_web::test]
    async fn flattens_nested_field_paths() {
        let widget = CreateWidget {
            name: String::new(),
            quantity: 0,
            owner: Owner {
                email: "nope".to_string(),
            },
        };
        let errors = widget.validate().expect_err("widget is invalid");
        let details = ValidationDetails::from(&errors);

        let keys: Vec<&str> = details.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "owner.email", "quantity"]);
        assert_eq!(details.fields["name"][0].code, "length");
        assert_eq!(
            details.fields["name"][0].message.as_deref(),
            Some("name must be 1-32 characters")
        );
        assert_eq!(details.fields["owner.email"][0].code, "email");
        assert_eq!(details.fields["quantity"][0].code, "range");
    }

    #[actix_web::test]
    async fn valid_body_reaches_handler() {
        let (status, body) = post(json!({
            "name": "gear",
            "quantity": 3,
            "owner": { "email": "ops@example.com" }
        }))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "gear");
    }

    #[actix_web::test]
    async fn constraint_failure_lists_fields() {
        let (status, body) = post(json!({
            "name": "",
            "quantity": 3,
            "owner": { "email": "ops@example.com" }
        }))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(body["details"]["fields"]["name"][0]["code"], "length");
        assert!(body["details"]["fields"].get("quantity").is_none());
    }

    #[actix_web::test]
    async fn missing_field_is_a_bad_request() {
        let (status, body) = post(json!({ "name": "gear" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }
}
