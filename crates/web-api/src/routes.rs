use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use application::{MessageDto, ParticipantDto, PostMessageRequest};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
struct RegisterPayload {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagePayload {
    to: Option<String>,
    text: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/participants", post(register_participant).get(list_participants))
        .route("/messages", post(post_message).get(get_messages))
        .route("/status", post(heartbeat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/// `user` 头缺失或非 UTF-8 时按空串处理：
/// 发消息会因发送者未注册被拒，心跳与历史则与未知参与者同样对待。
fn user_header(headers: &HeaderMap) -> String {
    headers
        .get("user")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn register_participant(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<StatusCode, ApiError> {
    state
        .participant_service
        .register(payload.name.unwrap_or_default())
        .await?;
    Ok(StatusCode::CREATED)
}

async fn list_participants(
    State(state): State<AppState>,
) -> Result<Json<Vec<ParticipantDto>>, ApiError> {
    let participants = state.participant_service.list().await?;
    Ok(Json(participants))
}

async fn post_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<MessagePayload>,
) -> Result<StatusCode, ApiError> {
    state
        .message_service
        .post(PostMessageRequest {
            from: user_header(&headers),
            to: payload.to.unwrap_or_default(),
            text: payload.text.unwrap_or_default(),
            kind: payload.kind.unwrap_or_default(),
        })
        .await?;
    Ok(StatusCode::CREATED)
}

async fn get_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    // 无法解析的 limit 视同缺省
    let limit = query.limit.as_deref().and_then(|raw| raw.parse::<i64>().ok());
    let history = state
        .message_service
        .history(&user_header(&headers), limit)
        .await?;
    Ok(Json(history))
}

async fn heartbeat(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state
        .participant_service
        .heartbeat(&user_header(&headers))
        .await?;
    Ok(StatusCode::OK)
}
