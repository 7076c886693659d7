use std::num::{ParseFloatError, ParseIntError};

use super::ApiError;

#[cfg(feature = "dynamodb")]
use aws_sdk_dynamodb::error::{BuildError, ProvideErrorMetadata, SdkError};

#[cfg(feature = "dynamodb")]
impl<E, R> From<SdkError<E, R>> for ApiError
where
    E: ProvideErrorMetadata + std::fmt::Debug,
{
    fn from(value: SdkError<E, R>) -> Self {
        match value.code() {
            Some("AccessDeniedException") | Some("AccessDenied") => Self::PermissionDenied,
            Some("ResourceNotFoundException") => Self::DynamoDbResourceNotFound(
                value.message().unwrap_or("Resource not found").to_string(),
            ),
            Some("ConditionalCheckFailedException") => Self::NotFound,
            Some("ProvisionedThroughputExceededException")
            | Some("ThrottlingException")
            | Some("RequestLimitExceeded") => Self::ThroughputError,
            _ => Self::DynamoDbError(match value.message() {
                Some(m) => m.to_string(),
                None => format!("{:?}", value.as_service_error()),
            }),
        }
    }
}

/// Classifies an error from the identity provider.
///
/// These do not go through the blanket `SdkError` conversion because the
/// generic arm would label them as document-store failures.
#[cfg(feature = "cognito")]
pub fn cognito_error<E, R>(value: SdkError<E, R>) -> ApiError
where
    E: ProvideErrorMetadata + std::fmt::Debug,
{
    match value.code() {
        Some("AccessDeniedException") | Some("NotAuthorizedException") => ApiError::PermissionDenied,
        Some("UsernameExistsException") => {
            ApiError::InvalidRequest("An account with this email already exists".into())
        }
        Some("InvalidPasswordException") => {
            ApiError::InvalidRequest("The temporary password does not meet the pool's password policy".into())
        }
        Some("UserNotFoundException") => ApiError::NotFound,
        Some("TooManyRequestsException") => ApiError::ThroughputError,
        _ => ApiError::CognitoError(match value.message() {
            Some(m) => m.to_string(),
            None => format!("{:?}", value.as_service_error()),
        }),
    }
}

#[cfg(feature = "dynamodb")]
impl From<BuildError> for ApiError {
    fn from(value: BuildError) -> Self {
        Self::ServerError(format!("Builder error: {}", value))
    }
}

impl From<ParseFloatError> for ApiError {
    fn from(value: ParseFloatError) -> Self {
        Self::ServerError(format!("Parse float error: {}", value))
    }
}

impl From<ParseIntError> for ApiError {
    fn from(value: ParseIntError) -> Self {
        Self::ServerError(format!("Parse int error: {}", value))
    }
}

impl From<chrono::ParseError> for ApiError {
    fn from(value: chrono::ParseError) -> Self {
        Self::InvalidRequest(format!("Invalid ISO-8601 timestamp: {}", value))
    }
}

impl From<rust_xlsxwriter::XlsxError> for ApiError {
    fn from(value: rust_xlsxwriter::XlsxError) -> Self {
        Self::ServerError(format!("XLSX error: {}", value))
    }
}
