use crate::controller::Exhaust;
use application::transfer::{UserDto, UserEventOutcome};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::prelude::entity::{
    EmailAddress, ExternalId, FirstName, InternalId, LastName, PhotoUrl, UserName,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    internal_id: InternalId,
    external_id: ExternalId,
    email: EmailAddress,
    username: UserName,
    first_name: FirstName,
    last_name: LastName,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo_url: Option<PhotoUrl>,
}

impl From<UserDto> for UserBody {
    fn from(dto: UserDto) -> Self {
        Self {
            internal_id: dto.internal_id,
            external_id: dto.external_id,
            email: dto.email,
            username: dto.username,
            first_name: dto.first_name,
            last_name: dto.last_name,
            photo_url: dto.photo_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<UserBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for EventResponse {
    fn into_response(self) -> Response {
        let status = if self.success {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        };
        (status, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(flatten)]
    user: UserBody,
}

impl IntoResponse for UserResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

pub struct EventPresenter;

impl Exhaust<UserEventOutcome> for EventPresenter {
    type To = EventResponse;
    fn emit(&self, input: UserEventOutcome) -> Self::To {
        match input {
            UserEventOutcome::Applied(user) => EventResponse {
                success: true,
                user: Some(UserBody::from(user)),
                error: None,
            },
            UserEventOutcome::Ignored { .. } => EventResponse {
                success: false,
                user: None,
                error: Some("Unsupported event type".to_string()),
            },
        }
    }
}

pub struct UserPresenter;

impl Exhaust<Option<UserDto>> for UserPresenter {
    type To = Option<UserResponse>;
    fn emit(&self, input: Option<UserDto>) -> Self::To {
        input.map(|dto| UserResponse {
            user: UserBody::from(dto),
        })
    }
}
