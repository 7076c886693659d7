//! Claims extraction from the API Gateway JWT authorizer.
//!
//! Sign-in, password resets, and group management live in the identity
//! provider; by the time a request reaches a function the gateway has
//! already validated the token, so all that is left is reading the claims
//! out of the request context and mapping group membership to a role.

use std::collections::HashMap;

use lambda_http::{Request, RequestExt};

use crate::error::ApiError;

pub const ADMIN_GROUP: &str = "admins";
pub const AFFILIATE_GROUP: &str = "affiliates";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Affiliate,
}

#[derive(Debug, Clone)]
pub struct AuthContext {
    pub username: String,
    pub role: Role,
    pub affiliate_id: Option<String>,
}

impl AuthContext {
    pub fn from_request(event: &Request) -> Result<Self, ApiError> {
        let request_context = event.request_context();
        let claims = request_context
            .authorizer()
            .and_then(|auth| auth.jwt.clone())
            .map(|jwt| jwt.claims)
            .unwrap_or_default();
        Self::from_claims(&claims)
    }

    pub fn from_claims(claims: &HashMap<String, String>) -> Result<Self, ApiError> {
        let username = claims.get("sub").cloned().unwrap_or_default();
        if username.is_empty() {
            return Err(ApiError::InvalidAuthentication);
        }
        let groups = parse_groups(claims.get("cognito:groups").map(String::as_str).unwrap_or(""));
        let role = if groups.iter().any(|g| g == ADMIN_GROUP) {
            Role::Admin
        } else if groups.iter().any(|g| g == AFFILIATE_GROUP) {
            Role::Affiliate
        } else {
            return Err(ApiError::PermissionDenied);
        };
        let affiliate_id = claims
            .get("custom:affiliate_id")
            .cloned()
            .filter(|id| !id.is_empty());
        Ok(Self { username, role, affiliate_id })
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Affiliate => Err(ApiError::PermissionDenied),
        }
    }

    /// The affiliate id the caller is reading rows for.
    ///
    /// Admins may ask for any id; affiliates only ever get their own, and a
    /// mismatched request is refused rather than silently rescoped.
    pub fn scoped_affiliate_id(&self, requested: Option<&str>) -> Result<String, ApiError> {
        match self.role {
            Role::Admin => match requested {
                Some(id) if !id.is_empty() => Ok(id.to_string()),
                _ => Err(ApiError::InvalidRequest("affiliateId is required".into())),
            },
            Role::Affiliate => {
                let own = self.own_affiliate_id()?;
                match requested {
                    Some(id) if id != own => Err(ApiError::PermissionDenied),
                    _ => Ok(own.to_string()),
                }
            }
        }
    }

    pub fn own_affiliate_id(&self) -> Result<&str, ApiError> {
        self.affiliate_id
            .as_deref()
            .ok_or(ApiError::InvalidAuthentication)
    }
}

/// The groups claim shows up either as a JSON-ish bracketed list or as a
/// plain separated string, depending on the authorizer version.
fn parse_groups(raw: &str) -> Vec<String> {
    raw.trim_start_matches('[')
        .trim_end_matches(']')
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(|g| g.trim_matches('"'))
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str, groups: &str, affiliate_id: Option<&str>) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("sub".to_string(), sub.to_string());
        map.insert("cognito:groups".to_string(), groups.to_string());
        if let Some(id) = affiliate_id {
            map.insert("custom:affiliate_id".to_string(), id.to_string());
        }
        map
    }

    #[test]
    fn admin_group_maps_to_admin_role() {
        let ctx = AuthContext::from_claims(&claims("u-1", "[admins]", None)).unwrap();
        assert_eq!(ctx.role, Role::Admin);
        assert!(ctx.require_admin().is_ok());
    }

    #[test]
    fn affiliate_group_maps_to_affiliate_role() {
        let ctx = AuthContext::from_claims(&claims("u-2", "affiliates", Some("aff-9"))).unwrap();
        assert_eq!(ctx.role, Role::Affiliate);
        assert!(ctx.require_admin().is_err());
        assert_eq!(ctx.own_affiliate_id().unwrap(), "aff-9");
    }

    #[test]
    fn admin_wins_when_both_groups_present() {
        let ctx = AuthContext::from_claims(&claims("u-3", "[affiliates admins]", None)).unwrap();
        assert_eq!(ctx.role, Role::Admin);
    }

    #[test]
    fn missing_sub_is_unauthorized() {
        let result = AuthContext::from_claims(&claims("", "[admins]", None));
        assert!(matches!(result, Err(ApiError::InvalidAuthentication)));
    }

    #[test]
    fn no_known_group_is_forbidden() {
        let result = AuthContext::from_claims(&claims("u-4", "[others]", None));
        assert!(matches!(result, Err(ApiError::PermissionDenied)));
    }

    #[test]
    fn affiliate_cannot_request_another_id() {
        let ctx = AuthContext::from_claims(&claims("u-5", "affiliates", Some("aff-1"))).unwrap();
        assert!(matches!(ctx.scoped_affiliate_id(Some("aff-2")), Err(ApiError::PermissionDenied)));
        assert_eq!(ctx.scoped_affiliate_id(None).unwrap(), "aff-1");
        assert_eq!(ctx.scoped_affiliate_id(Some("aff-1")).unwrap(), "aff-1");
    }

    #[test]
    fn comma_separated_groups_parse() {
        let ctx = AuthContext::from_claims(&claims("u-6", "\"affiliates\",\"admins\"", None)).unwrap();
        assert_eq!(ctx.role, Role::Admin);
    }
}
