//! Channel connection handlers

use axum::{
    extract::{Path, State},
    Json,
};

use inbox_service::{
    ChannelConnectService, ExchangeCodeRequest, TestConnectionResponse,
};

use crate::extractors::ValidatedJson;
use crate::response::ApiResult;
use crate::state::AppState;

use super::parse_id;

/// Provider connection test
///
/// POST /channels/{channel_id}/test
pub async fn test_connection(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> ApiResult<Json<TestConnectionResponse>> {
    let channel_id = parse_id(&channel_id, "channel_id")?;

    let response = ChannelConnectService::new(state.service_context())
        .test(channel_id)
        .await?;
    Ok(Json(response))
}

/// OAuth consent URL
///
/// GET /channels/{channel_id}/connect-url
pub async fn connect_url(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> ApiResult<Json<inbox_service::ConnectUrlResponse>> {
    let channel_id = parse_id(&channel_id, "channel_id")?;

    let response = ChannelConnectService::new(state.service_context())
        .connect_url(channel_id)
        .await?;
    Ok(Json(response))
}

/// OAuth code exchange
///
/// POST /channels/{channel_id}/exchange
pub async fn exchange_code(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    ValidatedJson(request): ValidatedJson<ExchangeCodeRequest>,
) -> ApiResult<Json<inbox_service::ExchangeResponse>> {
    let channel_id = parse_id(&channel_id, "channel_id")?;

    let response = ChannelConnectService::new(state.service_context())
        .exchange(channel_id, &request.code, &request.redirect_uri)
        .await?;
    Ok(Json(response))
}
