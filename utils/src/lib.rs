pub mod auth;
#[cfg(feature = "dynamodb")]
pub mod config;
#[cfg(feature = "dynamodb")]
pub mod dynamodb;
pub mod earnings;
pub mod error;
#[cfg(feature = "dynamodb")]
pub mod export;
#[cfg(feature = "dynamodb")]
pub mod filters;
mod function_handler_macro;
#[cfg(feature = "dynamodb")]
pub mod tables;
#[cfg(feature = "dynamodb")]
pub mod trash;

pub use aws_config;
#[cfg(feature = "cognito")]
pub use aws_sdk_cognitoidentityprovider;
#[cfg(feature = "dynamodb")]
pub use aws_sdk_dynamodb;
pub use chrono;
pub use lambda_http;
pub use log;
pub use serde_json;
pub use uuid;

use error::ApiError;
use lambda_http::{Body, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod prelude {
    pub use crate::auth::{AuthContext, Role};
    #[cfg(feature = "dynamodb")]
    pub use crate::config::PortalConfig;
    #[cfg(feature = "dynamodb")]
    pub use crate::dynamodb::maps::{AttributeValueHashMap, ItemIntegration};
    pub use crate::error::ApiError;
    #[cfg(feature = "cognito")]
    pub use crate::error::into::cognito_error;
    pub use crate::{clean_email, json_resp, parse_request_body, OptionHandler};
}

pub trait OptionHandler<T> {
    /// Unwraps an Option that should be included in a request.
    ///
    /// Returns an error if it isn't there.
    fn should_exist_in_request(&self) -> Result<&T, ApiError>;
    /// Unwraps an Option that should be in the database. This needs to be called
    /// after the item is confirmed as present in the database.
    fn should_exist_in_db_schema(&self, key: &str) -> Result<&T, ApiError>;
}

impl<T> OptionHandler<T> for Option<T> {
    #[inline]
    fn should_exist_in_request(&self) -> Result<&T, ApiError> {
        match self {
            Some(x) => Ok(x),
            None => Err(ApiError::InvalidRequest("A required field was missing from the request".into())),
        }
    }
    #[inline]
    fn should_exist_in_db_schema(&self, key: &str) -> Result<&T, ApiError> {
        match self {
            Some(x) => Ok(x),
            None => Err(ApiError::InvalidDbSchema(key.into())),
        }
    }
}

/// Remove any sabotage from the email address.
pub fn clean_email(input: &str) -> String {
    if let Some(at_sign) = input.find('@') {
        if input[at_sign..].eq_ignore_ascii_case("@gmail.com") {
            let mut local = input[..at_sign].replace('.', "");
            if let Some(plus) = local.find('+') {
                local.truncate(plus);
            }
            local.push_str(&input[at_sign..]);
            return local;
        }
    }
    input.to_owned()
}

/// Parses a JSON request body.
///
/// The portal's original client sometimes wraps the payload in a second
/// layer of encoding under a `body` string field; both forms are accepted.
pub fn parse_request_body<T: DeserializeOwned>(body: &Body) -> Result<T, ApiError> {
    let text: &str = match body {
        Body::Text(t) => t,
        Body::Binary(b) => std::str::from_utf8(b)
            .map_err(|_| ApiError::InvalidRequest("Body must be UTF-8".into()))?,
        Body::Empty => return Err(ApiError::InvalidRequest("Missing request body".into())),
    };
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| ApiError::InvalidRequest(format!("Body is not valid JSON: {}", e)))?;
    let value = match value.get("body") {
        Some(serde_json::Value::String(inner)) => serde_json::from_str(inner)
            .map_err(|e| ApiError::InvalidRequest(format!("Nested `body` field is not valid JSON: {}", e)))?,
        _ => value,
    };
    serde_json::from_value(value)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid request: {}", e)))
}

/// Returns a 200 response with a JSON body.
pub fn json_resp<T: Serialize>(payload: &T) -> Result<Response<Body>, ApiError> {
    let body = serde_json::to_string(payload)
        .map_err(|e| ApiError::ServerError(format!("Response serialization failed: {}", e)))?;
    Response::builder()
        .status(200)
        .header("content-type", "application/json")
        .body(body.into())
        .map_err(|e| ApiError::ServerError(format!("Unable to build http::Response: {}", e)))
}

#[cfg(feature = "logging")]
pub fn init_logging() {
    use simple_logger::SimpleLogger;
    if SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .env()
        .init()
        .is_err()
    {
        log::debug!("Logger was already initialized");
    }
}

/// Local-run subscriber with env-filter control, in place of the Lambda
/// default subscriber.
#[cfg(feature = "local")]
pub fn init_local_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "logging")]
        {
            $crate::log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        $crate::log::error!($($arg)*);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_handler() {
        let x: Option<u32> = Some(55);
        let y: Option<u32> = None;

        assert_eq!(x.should_exist_in_request().is_ok(), true);
        assert_eq!(y.should_exist_in_request().is_err(), true);
    }

    #[test]
    fn gmail_sabotage_is_removed() {
        assert_eq!(clean_email("d.o.g.s+spam@gmail.com"), "dogs@gmail.com");
        assert_eq!(clean_email("plain@gmail.com"), "plain@gmail.com");
        assert_eq!(clean_email("keep.dots+tag@example.com"), "keep.dots+tag@example.com");
    }

    #[derive(serde::Deserialize)]
    struct Probe {
        action: String,
    }

    #[test]
    fn plain_body_parses() {
        let body = Body::Text(r#"{"action":"bulkRead"}"#.into());
        let probe: Probe = parse_request_body(&body).unwrap();
        assert_eq!(probe.action, "bulkRead");
    }

    #[test]
    fn double_encoded_body_parses() {
        let body = Body::Text(r#"{"body":"{\"action\":\"timeRange\"}"}"#.into());
        let probe: Probe = parse_request_body(&body).unwrap();
        assert_eq!(probe.action, "timeRange");
    }

    #[test]
    fn empty_body_is_rejected() {
        let result: Result<Probe, ApiError> = parse_request_body(&Body::Empty);
        assert!(result.is_err());
    }
}
