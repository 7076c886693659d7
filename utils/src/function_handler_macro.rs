/// Generates the `function_handler` and `main` for a Lambda function whose
/// request body deserializes into `$request_type`.
///
/// The expanding crate defines
/// `async fn process_request(config: &PortalConfig, auth: &AuthContext, request: $request_type) -> Result<Response<Body>, ApiError>`
/// and imports `run`, `service_fn`, `tracing`, `Body`, `Error`, `Request`,
/// and `Response` from `lambda_http`.
#[macro_export]
macro_rules! impl_function_handler {
    ($request_type:ty) => {
        async fn function_handler(event: Request) -> Result<Response<Body>, Error> {
            $crate::debug_log!("In function_handler");
            let auth = match $crate::auth::AuthContext::from_request(&event) {
                Ok(v) => v,
                Err(e) => return e.respond(),
            };
            let request: $request_type = match $crate::parse_request_body(event.body()) {
                Ok(v) => v,
                Err(e) => return e.respond(),
            };
            let config = $crate::config::PortalConfig::from_env();
            match process_request(&config, &auth, request).await {
                Ok(resp) => Ok(resp),
                Err(e) => e.respond(),
            }
        }

        #[tokio::main]
        async fn main() -> Result<(), Error> {
            #[cfg(feature = "logging")]
            $crate::init_logging();
            tracing::init_default_subscriber();
            run(service_fn(function_handler)).await
        }
    };
}
