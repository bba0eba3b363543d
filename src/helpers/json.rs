use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use serde::Serialize;

/// Envelope shared by every endpoint: a message plus an optional item or list.
#[derive(Serialize)]
pub(crate) struct JsonResponse<T> {
    pub(crate) message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) item: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) list: Option<Vec<T>>,
}

pub(crate) struct JsonResponseBuilder<T> {
    message: String,
    id: Option<String>,
    item: Option<T>,
    list: Option<Vec<T>>,
}

impl<T> JsonResponse<T>
where
    T: Serialize,
{
    pub(crate) fn build() -> JsonResponseBuilder<T> {
        JsonResponseBuilder {
            message: String::new(),
            id: None,
            item: None,
            list: None,
        }
    }
}

impl<T> JsonResponseBuilder<T>
where
    T: Serialize,
{
    pub(crate) fn set_msg<I: Into<String>>(mut self, message: I) -> Self {
        self.message = message.into();
        self
    }

    pub(crate) fn set_id<I: Into<String>>(mut self, id: I) -> Self {
        self.id = Some(id.into());
        self
    }

    pub(crate) fn set_item(mut self, item: T) -> Self {
        self.item = Some(item);
        self
    }

    pub(crate) fn set_list(mut self, list: Vec<T>) -> Self {
        self.list = Some(list);
        self
    }

    fn into_response(self) -> JsonResponse<T> {
        JsonResponse {
            message: self.message,
            id: self.id,
            item: self.item,
            list: self.list,
        }
    }

    pub(crate) fn ok<I: Into<String>>(self, message: I) -> web::Json<JsonResponse<T>> {
        web::Json(self.set_msg(message).into_response())
    }

    fn error<I: Into<String>>(self, status: StatusCode, message: I) -> actix_web::Error {
        let message = message.into();
        let body = HttpResponse::build(status).json(self.set_msg(message.clone()).into_response());
        InternalError::from_response(message, body).into()
    }

    pub(crate) fn bad_request<I: Into<String>>(self, message: I) -> actix_web::Error {
        self.error(StatusCode::BAD_REQUEST, message)
    }

    pub(crate) fn unauthorized<I: Into<String>>(self, message: I) -> actix_web::Error {
        self.error(StatusCode::UNAUTHORIZED, message)
    }

    pub(crate) fn not_found<I: Into<String>>(self, message: I) -> actix_web::Error {
        self.error(StatusCode::NOT_FOUND, message)
    }

    pub(crate) fn internal_server_error<I: Into<String>>(self, message: I) -> actix_web::Error {
        self.error(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}
