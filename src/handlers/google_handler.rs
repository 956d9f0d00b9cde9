//! HTTP entry points for the calendar authorization flow.
//!
//! The flow has two callback variants. The event-creating callback
//! (`/api/auth/callback/google`) recovers the pending event from the echoed
//! `state`, exchanges the code, creates the event, and redirects to the
//! result page in one pass. The token-surfacing callback
//! (`/api/google/callback`) only exchanges the code; the refresh token is
//! kept server-side and the redirect carries an opaque grant id, with event
//! creation deferred to a later `create-event` call.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::{
    google::EventBody,
    models::LeaveEvent,
    AppError, AppResult, AppState,
};

/// The page both callbacks redirect back to, carrying success/error state in
/// the query string.
const RESULT_PAGE: &str = "/leave-request";

/// On the JSON endpoints a rejected credential is a provider-leg failure,
/// not a caller error: the caller supplied a well-formed request and the
/// token it referenced turned out to be revoked or expired upstream. Those
/// rejections surface as 500 like any other provider failure.
fn provider_rejection(err: AppError) -> AppError {
    match err {
        AppError::Auth(msg) => AppError::Provider(msg),
        other => other,
    }
}

fn redirect_error(message: &str) -> Response {
    Redirect::to(&format!(
        "{}?error={}",
        RESULT_PAGE,
        urlencoding::encode(message)
    ))
    .into_response()
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AuthUrlQuery {
    /// Event summary; providing it (with the dates) selects the
    /// event-carrying flow variant.
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// GET /api/google/auth
///
/// Builds the provider consent URL. When an event payload is supplied it is
/// parked server-side and only the correlation token travels as `state`.
#[utoipa::path(
    get,
    path = "/api/google/auth",
    params(AuthUrlQuery),
    responses(
        (status = 200, description = "Consent URL to redirect the user's agent to"),
        (status = 400, description = "Partial event payload")
    ),
    tag = "google"
)]
pub async fn get_auth_url(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AuthUrlQuery>,
) -> AppResult<Json<Value>> {
    let url = match (query.summary, query.start_date, query.end_date) {
        (Some(summary), Some(start_date), Some(end_date)) => {
            let event = LeaveEvent {
                summary,
                description: query.description.unwrap_or_default(),
                start_date,
                end_date,
            };
            let token = state.pending.insert(event).await;
            state.oauth.build_auth_url(Some(&token))
        }
        (None, None, None) => state.oauth.build_auth_url(None),
        _ => {
            return Err(AppError::Validation(
                "summary, startDate and endDate must be provided together".to_string(),
            ))
        }
    };

    Ok(Json(json!({ "url": url })))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /api/auth/callback/google — the event-creating callback.
///
/// Missing `code` or `state` fails fast with a 400 before any provider call;
/// failures past that point redirect to the result page with an error
/// indicator, retaining no partial state.
#[utoipa::path(
    get,
    path = "/api/auth/callback/google",
    params(CallbackQuery),
    responses(
        (status = 303, description = "Redirect to the result page with success or error state"),
        (status = 400, description = "Missing code or state parameter")
    ),
    tag = "google"
)]
pub async fn event_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    if let Some(error) = query.error {
        tracing::warn!(error, "consent denied or provider error on callback");
        return redirect_error("Failed to add event to calendar");
    }

    let (Some(code), Some(state_param)) = (query.code, query.state) else {
        return AppError::BadRequest("Missing code or state parameter".to_string())
            .into_response();
    };

    match run_event_flow(&state, &code, &state_param).await {
        Ok(link) => Redirect::to(&format!(
            "{}?success=true&eventLink={}",
            RESULT_PAGE,
            urlencoding::encode(&link)
        ))
        .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "authorization flow failed");
            redirect_error("Failed to add event to calendar")
        }
    }
}

/// Token exchange plus event creation, shared by the event-creating callback.
async fn run_event_flow(state: &AppState, code: &str, state_param: &str) -> AppResult<String> {
    let event = resolve_state(state, state_param).await?;

    let tokens = state.oauth.exchange_code(code).await?;
    if let Some(refresh_token) = tokens.refresh_token {
        let grant_id = state.grants.insert(refresh_token).await;
        tracing::debug!(grant_id, "refresh token retained");
    }

    let created = state
        .calendar
        .insert_event(&tokens.access_token, "primary", &EventBody::from(&event))
        .await?;

    Ok(created.html_link.unwrap_or_default())
}

/// Recovers the pending event from the echoed `state` parameter: first as a
/// correlation token into the pending store, falling back to the legacy
/// URL-encoded JSON payload form.
async fn resolve_state(state: &AppState, state_param: &str) -> AppResult<LeaveEvent> {
    if let Some(event) = state.pending.take(state_param).await {
        return Ok(event);
    }

    let decoded = urlencoding::decode(state_param)
        .map_err(|_| AppError::Auth("state parameter is not valid UTF-8".to_string()))?;
    serde_json::from_str(&decoded)
        .map_err(|_| AppError::Auth("unrecognized or expired state parameter".to_string()))
}

/// GET /api/google/callback — the token-surfacing callback.
///
/// Exchanges the code and redirects with an opaque grant id referencing the
/// server-side refresh token. The token itself never appears in the URL.
#[utoipa::path(
    get,
    path = "/api/google/callback",
    params(CallbackQuery),
    responses(
        (status = 303, description = "Redirect carrying a grant id, or error=auth_failed")
    ),
    tag = "google"
)]
pub async fn token_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    let Some(code) = query.code else {
        tracing::warn!("callback missing authorization code");
        return Redirect::to(&format!("{}?error=auth_failed", RESULT_PAGE));
    };

    match state.oauth.exchange_code(&code).await {
        Ok(tokens) => match tokens.refresh_token {
            Some(refresh_token) => {
                let grant_id = state.grants.insert(refresh_token).await;
                Redirect::to(&format!("{}?grant={}", RESULT_PAGE, grant_id))
            }
            None => {
                tracing::warn!("token exchange returned no refresh token");
                Redirect::to(&format!("{}?error=auth_failed", RESULT_PAGE))
            }
        },
        Err(err) => {
            tracing::error!(error = %err, "code exchange failed");
            Redirect::to(&format!("{}?error=auth_failed", RESULT_PAGE))
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    /// Opaque reference to a server-side refresh token from the
    /// token-surfacing callback.
    pub grant_id: Option<String>,
    /// Raw refresh token, accepted for the original contract.
    pub refresh_token: Option<String>,
    pub event: Option<LeaveEvent>,
}

/// POST /api/google/create-event
#[utoipa::path(
    post,
    path = "/api/google/create-event",
    request_body = CreateEventRequest,
    responses(
        (status = 200, description = "Created event representation"),
        (status = 400, description = "Missing parameters or unknown grant"),
        (status = 500, description = "Provider rejection, including a revoked refresh token")
    ),
    tag = "google"
)]
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateEventRequest>,
) -> AppResult<Json<Value>> {
    let event = body
        .event
        .ok_or_else(|| AppError::BadRequest("Missing required parameters".to_string()))?;

    let refresh_token = match (body.grant_id, body.refresh_token) {
        (Some(grant_id), _) => state
            .grants
            .get(&grant_id)
            .await
            .ok_or_else(|| AppError::Auth("unknown or expired grant".to_string()))?,
        (None, Some(refresh_token)) => refresh_token,
        (None, None) => {
            return Err(AppError::BadRequest("Missing required parameters".to_string()))
        }
    };

    let access_token = state
        .oauth
        .refresh_access_token(&refresh_token)
        .await
        .map_err(provider_rejection)?;
    let created = state
        .calendar
        .insert_event(&access_token, "primary", &EventBody::from(&event))
        .await
        .map_err(provider_rejection)?;

    Ok(Json(json!({ "data": created })))
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCalendarEventRequest {
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[schema(example = "2024-01-10", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-01-12", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub auth_code: Option<String>,
}

/// POST /api/add-calendar-event — one-shot exchange-and-create from an
/// explicit authorization code.
#[utoipa::path(
    post,
    path = "/api/add-calendar-event",
    request_body = AddCalendarEventRequest,
    responses(
        (status = 200, description = "Link to the created event"),
        (status = 400, description = "Authorization code missing"),
        (status = 500, description = "Provider rejection, including a rejected code")
    ),
    tag = "google"
)]
pub async fn add_calendar_event(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddCalendarEventRequest>,
) -> AppResult<Json<Value>> {
    let code = body
        .auth_code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Authorization code is missing".to_string()))?;

    let tokens = state
        .oauth
        .exchange_code(&code)
        .await
        .map_err(provider_rejection)?;
    if let Some(refresh_token) = tokens.refresh_token {
        let grant_id = state.grants.insert(refresh_token).await;
        tracing::debug!(grant_id, "refresh token retained");
    }

    let event = LeaveEvent {
        summary: body.summary,
        description: body.description,
        start_date: body.start_date,
        end_date: body.end_date,
    };

    let created = state
        .calendar
        .insert_event(&tokens.access_token, "primary", &EventBody::from(&event))
        .await
        .map_err(provider_rejection)?;

    Ok(Json(json!({
        "eventLink": created.html_link.unwrap_or_default()
    })))
}
