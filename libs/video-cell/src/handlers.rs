use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{AnswerBody, OfferBody, RoomSession};
use crate::services::signaling::PeerBrokerClient;

pub async fn open_room(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(_auth): TypedHeader<Authorization<Bearer>>,
    Json(body): Json<OfferBody>,
) -> Result<Json<RoomSession>, AppError> {
    let broker = PeerBrokerClient::new(&state)?;
    let session = broker.open_room(body.sdp).await?;
    Ok(Json(session))
}

pub async fn submit_answer(
    State(state): State<Arc<AppConfig>>,
    Path(room_id): Path<String>,
    TypedHeader(_auth): TypedHeader<Authorization<Bearer>>,
    Json(body): Json<AnswerBody>,
) -> Result<Json<RoomSession>, AppError> {
    let broker = PeerBrokerClient::new(&state)?;
    let session = broker.submit_answer(&room_id, body.sdp).await?;
    Ok(Json(session))
}

pub async fn close_room(
    State(state): State<Arc<AppConfig>>,
    Path(room_id): Path<String>,
    TypedHeader(_auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let broker = PeerBrokerClient::new(&state)?;
    broker.close_room(&room_id).await?;
    Ok(Json(json!({ "closed": true })))
}
