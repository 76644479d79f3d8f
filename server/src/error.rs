use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use error_stack::Report;
use kernel::KernelError;
use serde::Serialize;
use std::process::{ExitCode, Termination};

use crate::signature::SignatureError;

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub enum ErrorStatus {
    Kernel(Report<KernelError>),
    Signature(Report<SignatureError>),
}

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        Self::Kernel(e)
    }
}

impl From<Report<SignatureError>> for ErrorStatus {
    fn from(e: Report<SignatureError>) -> Self {
        Self::Signature(e)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl ErrorStatus {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Kernel(report) => {
                let context = report.current_context();
                let status = match context {
                    KernelError::Request | KernelError::MissingId | KernelError::NotFound => {
                        StatusCode::BAD_REQUEST
                    }
                    KernelError::Duplicate => StatusCode::CONFLICT,
                    KernelError::Timeout => StatusCode::REQUEST_TIMEOUT,
                    KernelError::Config | KernelError::Internal => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, context.to_string())
            }
            Self::Signature(report) => {
                let context = report.current_context();
                let status = match context {
                    SignatureError::MissingHeaders => StatusCode::BAD_REQUEST,
                    SignatureError::MissingSecret => StatusCode::INTERNAL_SERVER_ERROR,
                    SignatureError::InvalidSignature => StatusCode::UNAUTHORIZED,
                };
                (status, context.to_string())
            }
        }
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> axum::response::Response {
        match &self {
            Self::Kernel(report) => tracing::error!("{report:?}"),
            Self::Signature(report) => tracing::error!("{report:?}"),
        }
        let (status, error) = self.status_and_message();
        (
            status,
            Json(ErrorBody {
                success: false,
                error,
            }),
        )
            .into_response()
    }
}
