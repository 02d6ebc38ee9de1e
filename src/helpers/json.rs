use actix_web::error::{Error, InternalError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct JsonResponse<T> {
    pub(crate) status: String,
    pub(crate) message: String,
    pub(crate) code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) item: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) list: Option<Vec<T>>,
}

pub(crate) struct JsonResponseBuilder<T>
where
    T: Serialize,
{
    item: Option<T>,
    list: Option<Vec<T>>,
}

impl<T> JsonResponseBuilder<T>
where
    T: Serialize,
{
    pub(crate) fn set_item(mut self, item: T) -> Self {
        self.item = Some(item);
        self
    }

    pub(crate) fn set_list(mut self, list: Vec<T>) -> Self {
        self.list = Some(list);
        self
    }

    fn into_response(self, code: StatusCode, message: &str, fallback: &str) -> JsonResponse<T> {
        let message = if !message.trim().is_empty() {
            message.to_string()
        } else {
            fallback.to_string()
        };

        JsonResponse {
            status: if code.is_success() { "OK" } else { "Error" }.to_string(),
            message,
            code: code.as_u16(),
            item: self.item,
            list: self.list,
        }
    }

    fn into_error(self, code: StatusCode, message: &str, fallback: &str) -> Error {
        let body = self.into_response(code, message, fallback);
        let message = body.message.clone();
        InternalError::from_response(message, HttpResponse::build(code).json(body)).into()
    }

    pub(crate) fn ok(self, message: &str) -> web::Json<JsonResponse<T>> {
        web::Json(self.into_response(StatusCode::OK, message, "Success"))
    }

    pub(crate) fn bad_request(self, message: &str) -> Error {
        self.into_error(StatusCode::BAD_REQUEST, message, "Bad request")
    }

    pub(crate) fn not_found(self, message: &str) -> Error {
        self.into_error(StatusCode::NOT_FOUND, message, "Object not found")
    }

    pub(crate) fn internal_server_error(self, message: &str) -> Error {
        self.into_error(StatusCode::INTERNAL_SERVER_ERROR, message, "Internal error")
    }
}

impl<T> JsonResponse<T>
where
    T: Serialize,
{
    pub(crate) fn build() -> JsonResponseBuilder<T> {
        JsonResponseBuilder {
            item: None,
            list: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_skips_empty_payloads() {
        let body = JsonResponse::<String>::build().set_item("x".to_string()).ok("");
        let value = serde_json::to_value(&body.0).unwrap();

        assert_eq!(value["status"], "OK");
        assert_eq!(value["message"], "Success");
        assert_eq!(value["code"], 200);
        assert_eq!(value["item"], "x");
        assert!(value.get("list").is_none());
    }

    #[test]
    fn errors_carry_their_status() {
        let err = JsonResponse::<String>::build().not_found("Conversation not found");
        assert_eq!(err.as_response_error().status_code(), StatusCode::NOT_FOUND);

        let err = JsonResponse::<String>::build().bad_request("");
        assert_eq!(err.as_response_error().status_code(), StatusCode::BAD_REQUEST);
    }
}
