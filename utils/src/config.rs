//! Per-invocation configuration, read from the environment into an explicit
//! value that gets passed to the request processor.

use crate::error::ApiError;
use crate::tables;

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub affiliates_table: String,
    pub quotes_table: String,
    pub sales_table: String,
    pub dog_tags_table: String,
    pub spam_quotes_table: String,
    pub checkout_events_table: String,
    pub user_pool_id: Option<String>,
}

impl PortalConfig {
    pub fn from_env() -> Self {
        #[cfg(feature = "local")]
        dotenv::dotenv().ok();

        Self {
            affiliates_table: table_name("AFFILIATES_TABLE", tables::affiliates::AFFILIATES_TABLE.table_name),
            quotes_table: table_name("QUOTES_TABLE", tables::quotes::QUOTES_TABLE.table_name),
            sales_table: table_name("SALES_TABLE", tables::sales::SALES_TABLE.table_name),
            dog_tags_table: table_name("DOG_TAGS_TABLE", tables::dog_tags::DOG_TAGS_TABLE.table_name),
            spam_quotes_table: table_name("SPAM_QUOTES_TABLE", tables::spam_quotes::SPAM_QUOTES_TABLE.table_name),
            checkout_events_table: table_name(
                "CHECKOUT_EVENTS_TABLE",
                tables::checkout_events::CHECKOUT_EVENTS_TABLE.table_name,
            ),
            user_pool_id: std::env::var("USER_POOL_ID").ok().filter(|v| !v.is_empty()),
        }
    }

    /// Only the user-management function needs the pool id, so it is not an
    /// error for the variable to be absent until somebody asks for it.
    pub fn user_pool_id(&self) -> Result<&str, ApiError> {
        self.user_pool_id
            .as_deref()
            .ok_or_else(|| ApiError::ServerError("USER_POOL_ID not set".into()))
    }
}

fn table_name(var: &str, default: &'static str) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_schema_constants() {
        let config = PortalConfig::from_env();
        assert!(!config.affiliates_table.is_empty());
        assert!(!config.checkout_events_table.is_empty());
    }

    #[test]
    fn missing_user_pool_id_is_deferred() {
        let config = PortalConfig {
            affiliates_table: "a".into(),
            quotes_table: "q".into(),
            sales_table: "s".into(),
            dog_tags_table: "d".into(),
            spam_quotes_table: "sq".into(),
            checkout_events_table: "c".into(),
            user_pool_id: None,
        };
        assert!(config.user_pool_id().is_err());
    }
}
