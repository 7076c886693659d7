use lambda_http::{http::StatusCode, Body, Error, Response};

pub mod into;

#[derive(Debug)]
pub enum ApiError {
    InvalidAuthentication,
    PermissionDenied,
    RequestWentThrough,
    DynamoDbResourceNotFound(String),
    DynamoDbError(String),
    #[cfg(feature = "cognito")]
    CognitoError(String),
    InvalidRequest(String),
    InvalidDbSchema(String),
    ServerError(String),
    NotFound,
    ThroughputError,
}

impl ApiError {
    #[inline]
    fn get_status_code(&self) -> StatusCode {
        let status = match self {
            Self::InvalidAuthentication => 401,
            Self::PermissionDenied => 403,
            Self::RequestWentThrough => 202,
            Self::DynamoDbError(_) => 500,
            Self::DynamoDbResourceNotFound(_) => 404,
            #[cfg(feature = "cognito")]
            Self::CognitoError(_) => 500,
            Self::InvalidRequest(_) => 400,
            Self::InvalidDbSchema(_) => 500,
            Self::ServerError(_) => 500,
            Self::NotFound => 404,
            Self::ThroughputError => 500,
        };
        StatusCode::from_u16(status).expect("Invalid status code")
    }
}

macro_rules! write_fmt {
    ($f:expr, $fmt:expr, $repl:expr) => {
        $f.write_fmt(format_args!($fmt, $repl))
    };
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAuthentication => f.write_str("Unauthorized"),
            Self::PermissionDenied => f.write_str("Forbidden"),
            Self::RequestWentThrough => f.write_str("There was an error, but your request went through"),
            Self::DynamoDbError(_) => f.write_str("There was an internal server error"),
            Self::DynamoDbResourceNotFound(e) => f.write_str(e),
            #[cfg(feature = "cognito")]
            Self::CognitoError(_) => f.write_str("There was an internal server error"),
            Self::InvalidRequest(x) => write_fmt!(f, "Invalid request: {}", x),
            Self::InvalidDbSchema(e) => write_fmt!(f, "Invalid DB schema: {}", e),
            Self::ServerError(x) => write_fmt!(f, "There was an internal server error: {}", x),
            Self::NotFound => f.write_str("Not Found"),
            Self::ThroughputError => f.write_str("The servers are a bit busy at the moment. Try again in a few minutes"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Turns an error into a 202 error
    pub fn _202(&mut self) {
        *self = Self::RequestWentThrough
    }

    /// Returns an error response.
    pub fn respond(&self) -> Result<Response<Body>, Error> {
        error_response(self.get_status_code(), &self.to_string())
    }
}

fn error_response(status: StatusCode, message: &str) -> Result<Response<Body>, Error> {
    let body = serde_json::json!({ "error": message }).to_string();
    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(body.into())
        .expect("Unable to build http::Response"))
}
