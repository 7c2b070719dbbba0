//! Event endpoints

use std::sync::Arc;

use axum::extract::{Query, State};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{ApiFailure, ApiResponse, ApiResult, JsonOrForm};
use crate::api::state::AppState;
use crate::types::{CalendarResult, Event};
use crate::validation::{parse_date, parse_reminder_time, DATE_FORMAT};

/// Body of `POST /create_event`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateEventRequest {
    pub user_id: String,
    pub date: String,
    pub event: String,
    pub reminder_time: Option<String>,
}

/// Body of `POST /update_event`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateEventRequest {
    pub user_id: String,
    pub event_id: String,
    pub date: String,
    pub event: String,
    pub reminder_time: Option<String>,
}

/// Body of `POST /delete_event`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteEventRequest {
    pub user_id: String,
    pub event_id: String,
}

/// Query of the day/week/month endpoints
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RangeParams {
    pub user_id: String,
    pub date: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserParams {
    pub user_id: String,
}

/// Event as returned to clients
#[derive(Debug, Serialize)]
pub struct EventDto {
    pub id: String,
    pub user_id: String,
    pub date: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Event> for EventDto {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.clone(),
            user_id: event.user_id.clone(),
            date: event.date.format(DATE_FORMAT).to_string(),
            text: event.text.clone(),
            reminder_time: event.reminder_at.map(rfc3339),
            created_at: rfc3339(event.created_at),
            updated_at: rfc3339(event.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventList {
    pub events: Vec<EventDto>,
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// POST /create_event
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    JsonOrForm(req): JsonOrForm<CreateEventRequest>,
) -> ApiResult<Value> {
    let date = parse_date(&req.date)?;
    let reminder_at = parse_reminder_time(req.reminder_time.as_deref())?;

    let event = state
        .service
        .create_event(&req.user_id, &req.event, date, reminder_at)?;
    state.schedule_reminder(&event);

    Ok(ApiResponse::ok(json!({
        "event_id": event.id,
        "message": "Event created successfully",
    })))
}

/// POST /update_event
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    JsonOrForm(req): JsonOrForm<UpdateEventRequest>,
) -> ApiResult<Value> {
    let date = parse_date(&req.date)?;
    let reminder_at = parse_reminder_time(req.reminder_time.as_deref())?;

    let event = state.service.update_event(
        &req.user_id,
        &req.event_id,
        &req.event,
        date,
        reminder_at,
    )?;
    state.schedule_reminder(&event);

    Ok(ApiResponse::ok(json!({ "message": "Event updated successfully" })))
}

/// POST /delete_event
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    JsonOrForm(req): JsonOrForm<DeleteEventRequest>,
) -> ApiResult<Value> {
    state.service.delete_event(&req.user_id, &req.event_id)?;
    Ok(ApiResponse::ok(json!({ "message": "Event deleted successfully" })))
}

/// GET /events_for_day
pub async fn events_for_day(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> ApiResult<EventList> {
    range_query(&params, |user, date| state.service.events_for_day(user, date))
}

/// GET /events_for_week
pub async fn events_for_week(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> ApiResult<EventList> {
    range_query(&params, |user, date| state.service.events_for_week(user, date))
}

/// GET /events_for_month
pub async fn events_for_month(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> ApiResult<EventList> {
    range_query(&params, |user, date| state.service.events_for_month(user, date))
}

/// GET /events - every active event of a user
pub async fn active_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserParams>,
) -> ApiResult<EventList> {
    if params.user_id.trim().is_empty() {
        return Err(ApiFailure::bad_request("user_id is required"));
    }
    let events = state.service.active_events(&params.user_id)?;
    Ok(ApiResponse::ok(to_list(&events)))
}

fn range_query<F>(params: &RangeParams, query: F) -> ApiResult<EventList>
where
    F: FnOnce(&str, NaiveDate) -> CalendarResult<Vec<Event>>,
{
    if params.user_id.trim().is_empty() || params.date.trim().is_empty() {
        return Err(ApiFailure::bad_request("user_id and date are required"));
    }
    let date = parse_date(&params.date)?;
    let events = query(&params.user_id, date)?;
    Ok(ApiResponse::ok(to_list(&events)))
}

fn to_list(events: &[Event]) -> EventList {
    EventList {
        events: events.iter().map(EventDto::from).collect(),
    }
}
