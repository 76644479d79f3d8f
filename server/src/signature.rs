//! Webhook signature verification.
//!
//! Deliveries are signed the Svix way: the secret is `whsec_` followed by
//! a base64 key, the signed content is `{id}.{timestamp}.{body}` taken
//! from the `svix-id` and `svix-timestamp` headers, and `svix-signature`
//! carries space-separated `{version},{base64}` candidates. Only `v1`
//! (HMAC-SHA256) candidates are checked.

use std::fmt::{Display, Formatter};

use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use error_stack::{Context, Report, ResultExt};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use kernel::KernelError;

const SECRET_PREFIX: &str = "whsec_";
const TOLERANCE_SECS: i64 = 300;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SignatureError {
    MissingHeaders,
    MissingSecret,
    InvalidSignature,
}

impl Display for SignatureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHeaders => f.write_str("Missing Svix headers"),
            Self::MissingSecret => f.write_str("Webhook secret is not configured"),
            Self::InvalidSignature => f.write_str("Invalid signature"),
        }
    }
}

impl Context for SignatureError {}

#[derive(Debug)]
pub struct WebhookVerifier {
    key: Vec<u8>,
}

impl WebhookVerifier {
    pub fn new(secret: &str) -> error_stack::Result<Self, SignatureError> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        if encoded.is_empty() {
            return Err(Report::new(SignatureError::MissingSecret));
        }
        let key = STANDARD
            .decode(encoded)
            .change_context(SignatureError::MissingSecret)
            .attach_printable("the webhook secret is not valid base64")?;
        Ok(Self { key })
    }

    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        let secret = dotenvy::var("WEBHOOK_SECRET").change_context(KernelError::Config)?;
        Self::new(&secret).change_context(KernelError::Config)
    }

    pub fn verify(
        &self,
        headers: &HeaderMap,
        body: &[u8],
    ) -> error_stack::Result<(), SignatureError> {
        self.verify_at(headers, body, time::OffsetDateTime::now_utc().unix_timestamp())
    }

    fn verify_at(
        &self,
        headers: &HeaderMap,
        body: &[u8],
        now: i64,
    ) -> error_stack::Result<(), SignatureError> {
        let id = header_value(headers, "svix-id")?;
        let timestamp = header_value(headers, "svix-timestamp")?;
        let signatures = header_value(headers, "svix-signature")?;

        let sent_at = timestamp
            .parse::<i64>()
            .change_context(SignatureError::InvalidSignature)
            .attach_printable("the timestamp header is not a unix timestamp")?;
        if (now - sent_at).abs() > TOLERANCE_SECS {
            return Err(Report::new(SignatureError::InvalidSignature)
                .attach_printable("the timestamp is outside the accepted tolerance"));
        }

        let mut mac = HmacSha256::new_from_slice(&self.key)
            .change_context(SignatureError::MissingSecret)?;
        mac.update(id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);

        for candidate in signatures.split_ascii_whitespace() {
            let Some((version, encoded)) = candidate.split_once(',') else {
                continue;
            };
            if version != "v1" {
                continue;
            }
            let Ok(expected) = STANDARD.decode(encoded) else {
                continue;
            };
            // verify_slice compares in constant time
            if mac.clone().verify_slice(&expected).is_ok() {
                return Ok(());
            }
        }

        Err(Report::new(SignatureError::InvalidSignature))
    }
}

fn header_value<'a>(
    headers: &'a HeaderMap,
    name: &str,
) -> error_stack::Result<&'a str, SignatureError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Report::new(SignatureError::MissingHeaders).attach_printable(name.to_string()))
}
