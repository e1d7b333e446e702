use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{FeedbackCreate, FeedbackDocument, MovieCreate, MovieRecord, MovieUpdate},
};

fn parse_movie_id(raw: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|err| AppError::InvalidRequest(err.to_string()))
}

pub async fn index() -> Json<Value> {
    Json(json!({ "message": "cinedex is running" }))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    found_in: Option<String>,
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ListQuery>,
) -> AppResult<Json<Vec<MovieRecord>>> {
    let movies = state.store.list_movies(q.found_in.as_deref()).await?;
    Ok(Json(movies.into_iter().map(|m| m.into_record()).collect()))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Json(movie): Json<MovieCreate>,
) -> AppResult<Json<MovieRecord>> {
    movie.validate()?;
    let id = state.store.insert_movie(&movie).await?;
    // Re-read so the response is the canonical stored shape.
    let stored =
        state.store.find_movie(id).await?.ok_or(AppError::Internal("Failed to create movie"))?;
    Ok(Json(stored.into_record()))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
    Json(update): Json<MovieUpdate>,
) -> AppResult<Json<Value>> {
    let id = parse_movie_id(&movie_id)?;
    if !state.store.update_movie(id, &update).await? {
        return Err(AppError::NotFound("Movie not found"));
    }
    Ok(Json(json!({ "message": "Movie updated successfully" })))
}

pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_movie_id(&movie_id)?;
    if !state.store.delete_movie(id).await? {
        return Err(AppError::NotFound("Movie not found."));
    }
    Ok(Json(json!({ "message": "Movie deleted successfully." })))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    query: String,
}

pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> AppResult<Json<Value>> {
    let movies = state.store.search_by_title(&q.query).await?;
    let results: Vec<MovieRecord> = movies.into_iter().map(|m| m.into_record()).collect();
    Ok(Json(json!({ "results": results })))
}

pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    Json(feedback): Json<FeedbackCreate>,
) -> AppResult<Json<Value>> {
    feedback.validate()?;
    let entry = FeedbackDocument {
        user_name: feedback.user_name,
        feedback: feedback.feedback,
        time_stamp: crate::models::feedback_timestamp(jiff::Timestamp::now())?,
    };
    let id = state.store.insert_feedback(&entry).await?;
    Ok(Json(json!({ "message": "Feedback submitted successfully", "id": id.to_hex() })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_id_is_invalid_request_not_not_found() {
        let err = parse_movie_id("not-an-id").unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[test]
    fn well_formed_id_round_trips() {
        let oid = ObjectId::new();
        assert_eq!(parse_movie_id(&oid.to_hex()).unwrap(), oid);
    }

    #[test]
    fn list_query_reads_type_parameter() {
        let q: ListQuery = serde_json::from_value(serde_json::json!({ "type": "Netflix" })).unwrap();
        assert_eq!(q.found_in.as_deref(), Some("Netflix"));

        let q: ListQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(q.found_in.is_none());
    }
}
