use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use tracing::warn;

use crate::models::ActivitiesView;
use crate::services::activities_service::{self, ActivityError, MessageView};
use crate::web::error::ApiError;
use crate::web::AppState;

type ActivityPath = Result<Path<String>, PathRejection>;
type ParticipantQuery = Result<Query<Vec<(String, String)>>, QueryRejection>;

// A name that cannot even be decoded can't be in the directory.
fn activity_name(path: ActivityPath) -> Result<String, ApiError> {
    path.map(|Path(name)| name).map_err(|rejection| {
        warn!(error = %rejection.body_text(), "activity path rejected");
        ActivityError::ActivityNotFound.into()
    })
}

/// Repeated `email` parameters resolve to the last one.
fn participant_email(query: ParticipantQuery) -> Result<String, ApiError> {
    let Query(pairs) = query.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "participant query rejected");
        ApiError::InvalidQuery(rejection.body_text())
    })?;
    pairs
        .into_iter()
        .rev()
        .find(|(key, _)| key == "email")
        .map(|(_, email)| email)
        .ok_or_else(|| {
            warn!("participant query is missing email");
            ApiError::InvalidQuery(
                "Failed to deserialize query string: missing field `email`".to_string(),
            )
        })
}

pub async fn activities_handler(State(state): State<AppState>) -> Json<ActivitiesView> {
    Json(activities_service::list_activities(&state.directory))
}

pub async fn signup_handler(
    path: ActivityPath,
    State(state): State<AppState>,
    query: ParticipantQuery,
) -> Result<Json<MessageView>, ApiError> {
    let activity_name = activity_name(path)?;
    let email = participant_email(query)?;
    activities_service::signup_participant(&state.directory, &activity_name, &email)
        .map(Json)
        .map_err(|e| {
            warn!(activity = %activity_name, email = %email, "Signup failed: {}", e);
            e.into()
        })
}

pub async fn unregister_handler(
    path: ActivityPath,
    State(state): State<AppState>,
    query: ParticipantQuery,
) -> Result<Json<MessageView>, ApiError> {
    let activity_name = activity_name(path)?;
    let email = participant_email(query)?;
    activities_service::unregister_participant(&state.directory, &activity_name, &email)
        .map(Json)
        .map_err(|e| {
            warn!(activity = %activity_name, email = %email, "Unregister failed: {}", e);
            e.into()
        })
}
