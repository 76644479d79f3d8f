use axum::body::Bytes;
use error_stack::{Report, ResultExt};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use kernel::interface::event::{EventKind, UserLifecycleEvent};
use kernel::prelude::entity::{
    EmailAddress, ExternalId, FirstName, LastName, PhotoUrl, UserName,
};
use kernel::KernelError;

use crate::controller::TryIntake;

/// The provider's delivery shell. Only the type tag is fixed; the data
/// layout depends on it.
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(rename = "type")]
    kind: String,
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct EmailEntry {
    email_address: String,
}

#[derive(Debug, Deserialize)]
struct CreatedData {
    id: String,
    #[serde(default)]
    email_addresses: Vec<EmailEntry>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdatedData {
    id: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeletedData {
    #[serde(default)]
    id: Option<String>,
}

fn parse<T: DeserializeOwned>(
    data: serde_json::Value,
) -> error_stack::Result<T, KernelError> {
    serde_json::from_value(data).change_context(KernelError::Request)
}

impl TryFrom<WebhookEnvelope> for UserLifecycleEvent {
    type Error = Report<KernelError>;

    fn try_from(envelope: WebhookEnvelope) -> Result<Self, Self::Error> {
        let WebhookEnvelope { kind, data } = envelope;
        let parsed = match kind.as_str() {
            "user.created" => {
                let data: CreatedData = parse(data)?;
                let email = data
                    .email_addresses
                    .into_iter()
                    .next()
                    .map(|entry| entry.email_address)
                    .unwrap_or_default();
                Some(Self::Created {
                    id: ExternalId::new(data.id),
                    email: EmailAddress::new(email),
                    username: data.username.map(UserName::new),
                    first_name: FirstName::new(data.first_name.unwrap_or_default()),
                    last_name: LastName::new(data.last_name.unwrap_or_default()),
                    photo_url: data.image_url.map(PhotoUrl::new),
                })
            }
            "user.updated" => {
                let data: UpdatedData = parse(data)?;
                Some(Self::Updated {
                    id: ExternalId::new(data.id),
                    username: data.username.map(UserName::new),
                    first_name: FirstName::new(data.first_name.unwrap_or_default()),
                    last_name: LastName::new(data.last_name.unwrap_or_default()),
                    photo_url: data.image_url.map(PhotoUrl::new),
                })
            }
            "user.deleted" => {
                let data: DeletedData = parse(data)?;
                Some(Self::Deleted {
                    id: data.id.map(ExternalId::new),
                })
            }
            _ => None,
        };
        Ok(parsed.unwrap_or_else(|| Self::Unsupported {
            kind: EventKind::new(kind),
        }))
    }
}

pub struct EventTransformer;

impl TryIntake<Bytes> for EventTransformer {
    type To = UserLifecycleEvent;
    type Error = Report<KernelError>;
    fn emit(&self, input: Bytes) -> Result<Self::To, Self::Error> {
        let envelope: WebhookEnvelope = serde_json::from_slice(&input)
            .change_context(KernelError::Request)
            .attach_printable("the delivery body is not a webhook envelope")?;
        UserLifecycleEvent::try_from(envelope)
    }
}

#[cfg(test)]
mod test {
    use axum::body::Bytes;
    use serde_json::json;

    use kernel::interface::event::{EventKind, UserLifecycleEvent};
    use kernel::prelude::entity::{EmailAddress, ExternalId, FirstName, LastName, UserName};
    use kernel::KernelError;

    use crate::controller::TryIntake;
    use crate::request::EventTransformer;

    fn emit(body: serde_json::Value) -> Result<UserLifecycleEvent, error_stack::Report<KernelError>>
    {
        EventTransformer.emit(Bytes::from(body.to_string()))
    }

    #[test]
    fn created_envelope_maps_to_a_created_event() {
        let event = emit(json!({
            "type": "user.created",
            "data": {
                "id": "ext_1",
                "email_addresses": [
                    {"email_address": "a@b.com"},
                    {"email_address": "second@b.com"}
                ],
                "first_name": "Jane",
                "last_name": "Doe"
            }
        }))
        .unwrap();

        assert_eq!(
            event,
            UserLifecycleEvent::Created {
                id: ExternalId::new("ext_1"),
                email: EmailAddress::new("a@b.com"),
                username: None,
                first_name: FirstName::new("Jane"),
                last_name: LastName::new("Doe"),
                photo_url: None,
            }
        );
    }

    #[test]
    fn updated_envelope_keeps_absent_fields_as_defaults() {
        let event = emit(json!({
            "type": "user.updated",
            "data": {"id": "ext_1", "username": "jd"}
        }))
        .unwrap();

        assert_eq!(
            event,
            UserLifecycleEvent::Updated {
                id: ExternalId::new("ext_1"),
                username: Some(UserName::new("jd")),
                first_name: FirstName::new(""),
                last_name: LastName::new(""),
                photo_url: None,
            }
        );
    }

    #[test]
    fn deleted_envelope_may_omit_the_id() {
        let event = emit(json!({
            "type": "user.deleted",
            "data": {"deleted": true}
        }))
        .unwrap();
        assert_eq!(event, UserLifecycleEvent::Deleted { id: None });
    }

    #[test]
    fn unknown_kind_becomes_unsupported() {
        let event = emit(json!({
            "type": "session.created",
            "data": {"id": "sess_1"}
        }))
        .unwrap();
        assert_eq!(
            event,
            UserLifecycleEvent::Unsupported {
                kind: EventKind::new("session.created"),
            }
        );
    }

    #[test]
    fn malformed_data_is_a_request_error() {
        let error = emit(json!({
            "type": "user.created",
            "data": {"email_addresses": "nope"}
        }))
        .unwrap_err();
        assert!(matches!(error.current_context(), KernelError::Request));
    }

    #[test]
    fn a_non_envelope_body_is_a_request_error() {
        let error = EventTransformer.emit(Bytes::from_static(b"[]")).unwrap_err();
        assert!(matches!(error.current_context(), KernelError::Request));
    }
}
