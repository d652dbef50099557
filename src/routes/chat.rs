// POST handlers: chat persona endpoints.

use std::str::FromStr;

use axum::Form;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::Deserialize;

use super::{ApiError, AppState};
use crate::chat::ChatMessage;
use crate::models::{ArnParseError, BucketedMetrics, ResourceArn};

#[derive(Debug, Deserialize)]
pub(super) struct ChatForm {
    arn: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct TalkRequest {
    arn: String,
    #[serde(default)]
    log: Vec<ChatMessage>,
}

fn parse_arn(raw: &str) -> Result<ResourceArn, ApiError> {
    ResourceArn::from_str(raw).map_err(|e| match e {
        ArnParseError::UnsupportedService { arn, .. } => ApiError::UnsupportedArn(arn),
        ArnParseError::Malformed(arn) => ApiError::BadRequest(format!("malformed arn: {arn}")),
    })
}

async fn windowed_metrics(
    state: &AppState,
    arn: &ResourceArn,
) -> Result<BucketedMetrics, ApiError> {
    let m = &state.config.metrics;
    state
        .aws
        .get_metrics_by_arn(arn, m.window_minutes, m.delay_minutes, m.bucket_width_minutes)
        .await
        .map_err(ApiError::Aggregation)?
        .ok_or_else(|| ApiError::BadRequest(format!("resource not found: {arn}")))
}

/// POST /chat — form field `arn`; the persona opens the conversation from the
/// resource's windowed metrics.
pub(super) async fn chat_handler(
    State(state): State<AppState>,
    Form(form): Form<ChatForm>,
) -> Result<impl IntoResponse, ApiError> {
    let arn = parse_arn(&form.arn)?;
    let metrics = windowed_metrics(&state, &arn).await?;
    let message = state
        .chat
        .talk(arn.service, &[], &metrics)
        .await
        .map_err(ApiError::ChatUpstream)?;
    Ok(axum::Json(serde_json::json!({
        "arn": arn.to_string(),
        "message": message,
    })))
}

/// POST /talk — JSON `{arn, log}`; replays the conversation log before asking
/// the persona to reply.
pub(super) async fn talk_handler(
    State(state): State<AppState>,
    axum::Json(request): axum::Json<TalkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let arn = parse_arn(&request.arn)?;
    let metrics = windowed_metrics(&state, &arn).await?;
    let message = state
        .chat
        .talk(arn.service, &request.log, &metrics)
        .await
        .map_err(ApiError::ChatUpstream)?;
    Ok(axum::Json(serde_json::json!({
        "arn": arn.to_string(),
        "message": message,
    })))
}
