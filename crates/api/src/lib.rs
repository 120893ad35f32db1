mod config;

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Json, Path, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chronos_agents::{ChatError, ChatInput, ChatReply, CompletionService, ReplySource, TravelAgent};
use chronos_core::catalog::QUICK_ACTIONS;
use chronos_core::faq::FAQ;
use chronos_core::quiz::{QuizResult, QUESTIONS};
use chronos_core::{
    BookingDetails, BookingSession, BookingSummary, ChatMessage, CommandOutcome, PersonalInfo,
    WizardCommand, WizardStep, DESTINATIONS,
};
use chronos_observability::{AppMetrics, MetricsSnapshot};
use chronos_storage::MemoryStore;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub use crate::config::{parse_origins, AppConfig};

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<TravelAgent<MemoryStore>>,
    pub metrics: Arc<AppMetrics>,
    pub allowed_origins: Arc<Vec<String>>,
}

pub fn build_state(config: AppConfig) -> Result<ApiState> {
    let metrics = AppMetrics::shared();
    let completion = CompletionService::from_config(config.completion)?;
    let agent = Arc::new(TravelAgent::new(
        Arc::new(MemoryStore::new()),
        completion,
        metrics.clone(),
        config.session_ttl,
    ));

    Ok(ApiState {
        agent,
        metrics,
        allowed_origins: Arc::new(config.allowed_origins),
    })
}

pub fn build_app(config: AppConfig) -> Result<Router> {
    Ok(build_router(build_state(config)?))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/destinations", get(destinations))
        .route("/v1/chat", post(chat))
        .route("/v1/chat/sessions", post(open_conversation))
        .route("/v1/chat/quick-actions", get(quick_actions))
        .route("/v1/chat/:session_id", get(conversation))
        .route("/v1/bookings", post(create_booking))
        .route("/v1/bookings/:booking_id", get(booking))
        .route("/v1/bookings/:booking_id/commands", post(booking_command))
        .route("/v1/quiz", get(quiz))
        .route("/v1/quiz/result", post(quiz_result))
        .route("/v1/faq", get(faq))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(16 * 1024))
        .with_state(state)
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn not_found(code: &'static str, id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, format!("no record for {id}"))
    }

    fn internal(error: anyhow::Error) -> Self {
        tracing::error!(error = %error, "request failed");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            error.to_string(),
        )
    }
}

impl From<ChatError> for ApiError {
    fn from(error: ChatError) -> Self {
        let message = error.to_string();
        match error {
            ChatError::EmptyUtterance => {
                Self::new(StatusCode::BAD_REQUEST, "empty_message", message)
            }
            ChatError::TurnInFlight(_) => {
                Self::new(StatusCode::CONFLICT, "turn_in_flight", message)
            }
            ChatError::UnknownSession(_) => {
                Self::new(StatusCode::NOT_FOUND, "unknown_session", message)
            }
            ChatError::UnknownBooking(_) => {
                Self::new(StatusCode::NOT_FOUND, "unknown_booking", message)
            }
            ChatError::Invalid(_) => Self::new(StatusCode::BAD_REQUEST, "invalid_input", message),
            ChatError::Storage(error) => Self::internal(error),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({
                "error": self.code,
                "message": self.message
            })),
        )
            .into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    completion_mode: &'static str,
    metrics: MetricsSnapshot,
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        completion_mode: state.agent.completion_mode(),
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

async fn destinations() -> impl IntoResponse {
    Json(serde_json::json!({ "destinations": DESTINATIONS }))
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    session_id: Option<String>,
    text: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    session_id: String,
    reply_text: String,
    reply_source: ReplySource,
    reply: ChatReply,
    message: ChatMessage,
}

async fn chat(
    State(state): State<ApiState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let turn = state
        .agent
        .handle_chat(ChatInput {
            session_id: request.session_id,
            text: request.text,
        })
        .await?;

    Ok(Json(ChatResponse {
        session_id: turn.session_id,
        reply_text: turn.reply.text.clone(),
        reply_source: turn.reply.source,
        reply: turn.reply,
        message: turn.message,
    }))
}

#[derive(Debug, Serialize)]
struct ConversationResponse {
    session_id: String,
    awaiting_reply: bool,
    transcript: Vec<ChatMessage>,
}

async fn open_conversation(State(state): State<ApiState>) -> ApiResult<impl IntoResponse> {
    let session = state
        .agent
        .open_conversation()
        .await
        .map_err(ApiError::internal)?;

    Ok((
        StatusCode::CREATED,
        Json(ConversationResponse {
            awaiting_reply: session.awaiting_reply(),
            session_id: session.session_id,
            transcript: session.transcript,
        }),
    ))
}

async fn conversation(
    State(state): State<ApiState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<ConversationResponse>> {
    let session = state
        .agent
        .conversation(&session_id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("unknown_session", &session_id))?;

    Ok(Json(ConversationResponse {
        awaiting_reply: session.awaiting_reply() || state.agent.in_flight().is_pending(&session_id),
        session_id: session.session_id,
        transcript: session.transcript,
    }))
}

async fn quick_actions() -> impl IntoResponse {
    Json(serde_json::json!({ "quick_actions": QUICK_ACTIONS }))
}

#[derive(Debug, Serialize)]
struct StepView {
    index: usize,
    step: WizardStep,
    label: &'static str,
}

#[derive(Debug, Serialize)]
struct BookingView {
    booking_id: String,
    step: StepView,
    steps: Vec<StepView>,
    step_valid: bool,
    confirmed: bool,
    destination_id: Option<String>,
    details: BookingDetails,
    info: PersonalInfo,
    total_price: u64,
    summary: Option<BookingSummary>,
}

impl From<&BookingSession> for BookingView {
    fn from(booking: &BookingSession) -> Self {
        let wizard = &booking.wizard;
        let view_of = |step: WizardStep| StepView {
            index: step.index(),
            step,
            label: step.label(),
        };

        Self {
            booking_id: booking.booking_id.clone(),
            step: view_of(wizard.step()),
            steps: WizardStep::ALL.into_iter().map(view_of).collect(),
            step_valid: wizard.is_current_step_valid(),
            confirmed: wizard.is_confirmed(),
            destination_id: wizard.selected_destination_id().map(str::to_string),
            details: wizard.details().clone(),
            info: wizard.info().clone(),
            total_price: wizard.total_price(),
            summary: wizard.summary(),
        }
    }
}

#[derive(Debug, Serialize)]
struct BookingCommandResponse {
    outcome: CommandOutcome,
    booking: BookingView,
}

async fn create_booking(State(state): State<ApiState>) -> ApiResult<impl IntoResponse> {
    let booking = state
        .agent
        .create_booking()
        .await
        .map_err(ApiError::internal)?;
    Ok((StatusCode::CREATED, Json(BookingView::from(&booking))))
}

async fn booking(
    State(state): State<ApiState>,
    Path(booking_id): Path<String>,
) -> ApiResult<Json<BookingView>> {
    let booking = state
        .agent
        .booking(&booking_id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("unknown_booking", &booking_id))?;
    Ok(Json(BookingView::from(&booking)))
}

async fn booking_command(
    State(state): State<ApiState>,
    Path(booking_id): Path<String>,
    Json(command): Json<WizardCommand>,
) -> ApiResult<Json<BookingCommandResponse>> {
    let update = state
        .agent
        .apply_booking_command(&booking_id, command)
        .await?;

    Ok(Json(BookingCommandResponse {
        outcome: update.outcome,
        booking: BookingView::from(&update.booking),
    }))
}

async fn quiz() -> impl IntoResponse {
    Json(serde_json::json!({ "questions": QUESTIONS }))
}

#[derive(Debug, Deserialize)]
struct QuizAnswersRequest {
    answers: Vec<usize>,
}

#[derive(Debug, Serialize)]
struct QuizResultResponse {
    result: &'static QuizResult,
}

async fn quiz_result(
    State(state): State<ApiState>,
    Json(request): Json<QuizAnswersRequest>,
) -> ApiResult<Json<QuizResultResponse>> {
    let result = state.agent.quiz_result(&request.answers)?;
    Ok(Json(QuizResultResponse { result }))
}

async fn faq() -> impl IntoResponse {
    Json(serde_json::json!({ "faq": FAQ }))
}

fn build_cors_layer(allowed_origins: &Arc<Vec<String>>) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();
    let origins = if origins.is_empty() {
        vec![HeaderValue::from_static(config::DEFAULT_ALLOWED_ORIGIN)]
    } else {
        origins
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
