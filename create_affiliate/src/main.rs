use lambda_http::{run, service_fn, tracing, Body, Error, Request, Response};
use serde::{Deserialize, Serialize};
use utils::aws_config;
use utils::aws_sdk_cognitoidentityprovider::{types::AttributeType, Client as CognitoClient};
use utils::aws_sdk_dynamodb::Client as DbClient;
use utils::chrono::{SecondsFormat, Utc};
use utils::prelude::*;
use utils::tables::affiliates::AFFILIATES_TABLE;
use utils::uuid::Uuid;
use utils::{error_log, impl_function_handler};

impl_function_handler!(CreateAffiliateRequest);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateAffiliateRequest {
    name: String,
    email: String,
    base_price: f64,
    base_monthly_pay: f64,
    #[serde(default)]
    is_influencer: bool,
    #[serde(default)]
    free_dog_tag_offer: bool,
    #[serde(default)]
    share_leads: bool,
    temporary_password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAffiliateResponse {
    id: String,
    created_at: String,
}

/// Creates the Cognito account and the affiliate row together. The two
/// writes cannot be made atomic, so a failed row put unwinds the identity
/// side instead of leaving a half-created affiliate behind.
async fn process_request(
    config: &PortalConfig,
    auth: &AuthContext,
    request: CreateAffiliateRequest,
) -> Result<Response<Body>, ApiError> {
    auth.require_admin()?;

    let email = clean_email(request.email.trim());
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::InvalidRequest("A valid email address is required".into()));
    }
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::InvalidRequest("A name is required".into()));
    }
    if request.base_price < 0.0 || request.base_monthly_pay < 0.0 {
        return Err(ApiError::InvalidRequest("Commission amounts cannot be negative".into()));
    }

    let aws_cfg = aws_config::load_from_env().await;
    let cognito_client = CognitoClient::new(&aws_cfg);
    let db_client = DbClient::new(&aws_cfg);

    let user_pool_id = config.user_pool_id()?;
    let affiliate_id = Uuid::new_v4().to_string();
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    cognito_client
        .admin_create_user()
        .user_pool_id(user_pool_id)
        .username(&email)
        .temporary_password(&request.temporary_password)
        .user_attributes(AttributeType::builder().name("email").value(&email).build()?)
        .user_attributes(
            AttributeType::builder()
                .name("custom:affiliate_id")
                .value(&affiliate_id)
                .build()?,
        )
        .send()
        .await
        .map_err(cognito_error)?;

    if let Err(e) = cognito_client
        .admin_add_user_to_group()
        .user_pool_id(user_pool_id)
        .username(&email)
        .group_name(utils::auth::AFFILIATE_GROUP)
        .send()
        .await
    {
        let mut err = cognito_error(e);
        if delete_cognito_user(&cognito_client, user_pool_id, &email).await.is_err() {
            error_log!("compensation failed: user {} exists without group membership", email);
            err._202();
        }
        return Err(err);
    }

    let mut item = AttributeValueHashMap::new();
    item.insert_item(AFFILIATES_TABLE.id, affiliate_id.clone());
    item.insert_item_into(AFFILIATES_TABLE.name, name);
    item.insert_item(AFFILIATES_TABLE.email, email.clone());
    item.insert_item(AFFILIATES_TABLE.base_price, request.base_price.to_string());
    item.insert_item(AFFILIATES_TABLE.base_monthly_pay, request.base_monthly_pay.to_string());
    item.insert_item(AFFILIATES_TABLE.created_at, created_at.clone());
    item.insert_item(AFFILIATES_TABLE.is_influencer, request.is_influencer);
    item.insert_item(AFFILIATES_TABLE.free_dog_tag_offer, request.free_dog_tag_offer);
    item.insert_item(AFFILIATES_TABLE.share_leads, request.share_leads);
    item.insert_item_into(AFFILIATES_TABLE.sales_count, "0");
    item.insert_item_into(AFFILIATES_TABLE.quotes_count, "0");

    let put_result = db_client
        .put_item()
        .table_name(&config.affiliates_table)
        .set_item(Some(item))
        .condition_expression("attribute_not_exists(id)")
        .send()
        .await;

    if let Err(e) = put_result {
        let mut err = ApiError::from(e);
        if delete_cognito_user(&cognito_client, user_pool_id, &email).await.is_err() {
            error_log!("compensation failed: Cognito user {} exists without an affiliate row", email);
            err._202();
        }
        return Err(err);
    }

    json_resp(&CreateAffiliateResponse { id: affiliate_id, created_at })
}

async fn delete_cognito_user(
    client: &CognitoClient,
    user_pool_id: &str,
    username: &str,
) -> Result<(), ApiError> {
    client
        .admin_delete_user()
        .user_pool_id(user_pool_id)
        .username(username)
        .send()
        .await
        .map_err(cognito_error)?;
    Ok(())
}
