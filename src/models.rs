use jiff::Timestamp;
use jiff::tz::{Offset, TimeZone};
use mongodb::bson::{self, Document, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A movie as stored in the `cinema` collection. Everything except the
/// identifier and `foundIn` is optional because partial documents are
/// accepted for listing and updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub original_language: Option<String>,
    pub imdb: Option<f64>,
    pub release_date: Option<String>,
    pub run_time: Option<String>,
    pub genres: Option<Vec<String>>,
    pub episodes: Option<i64>,
    pub seasons: Option<i64>,
    pub cast: Option<Vec<Document>>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(rename = "foundIn", default)]
    pub found_in: Vec<String>,
    pub title: Option<String>,
}

impl MovieDocument {
    /// Client-facing shape: the ObjectId surfaces as a hex `id` string.
    pub fn into_record(self) -> MovieRecord {
        MovieRecord {
            id: self.id.to_hex(),
            original_title: self.original_title,
            overview: self.overview,
            original_language: self.original_language,
            imdb: self.imdb,
            release_date: self.release_date,
            run_time: self.run_time,
            genres: self.genres,
            episodes: self.episodes,
            seasons: self.seasons,
            cast: self.cast,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            found_in: self.found_in,
            title: self.title,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MovieRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episodes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasons: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<Document>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(rename = "foundIn")]
    pub found_in: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Creation payload. Serialization doubles as the insert document, so
/// absent optional fields are skipped rather than stored as null.
#[derive(Debug, Deserialize, Serialize)]
pub struct MovieCreate {
    pub original_title: String,
    pub overview: String,
    pub original_language: String,
    pub imdb: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(rename = "foundIn")]
    pub found_in: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episodes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasons: Option<i64>,
    #[serde(default)]
    pub cast: Vec<Document>,
}

impl MovieCreate {
    pub fn validate(&self) -> AppResult<()> {
        if self.found_in.is_empty() {
            return Err(AppError::InvalidRequest(
                "foundIn must contain at least one element".to_string(),
            ));
        }
        Ok(())
    }

    pub fn insert_document(&self) -> AppResult<Document> {
        Ok(bson::to_document(self)?)
    }
}

/// Partial update. A field set to null deserializes to `None` and is
/// dropped from the `$set` document, exactly like an absent field, so
/// this operation cannot blank a field out.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MovieUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episodes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasons: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<Document>>,
}

impl MovieUpdate {
    /// The `$set` body: only explicitly provided fields.
    pub fn set_document(&self) -> AppResult<Document> {
        Ok(bson::to_document(self)?)
    }
}

#[derive(Debug, Deserialize)]
pub struct FeedbackCreate {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub feedback: String,
}

impl FeedbackCreate {
    pub fn validate(&self) -> AppResult<()> {
        if self.user_name.is_empty() {
            return Err(AppError::InvalidRequest("userName must not be empty".to_string()));
        }
        if self.feedback.is_empty() {
            return Err(AppError::InvalidRequest("feedback must not be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackDocument {
    #[serde(rename = "userName")]
    pub user_name: String,
    pub feedback: String,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
}

const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

/// Wall-clock time at the fixed +05:30 offset, minute precision.
pub fn feedback_timestamp(now: Timestamp) -> AppResult<String> {
    let tz = TimeZone::fixed(Offset::from_seconds(IST_OFFSET_SECONDS)?);
    Ok(now.to_zoned(tz).strftime("%Y-%m-%d %H.%M").to_string())
}

#[cfg(test)]
mod tests {
    use mongodb::bson::doc;
    use serde_json::json;

    use super::*;

    fn minimal_create() -> serde_json::Value {
        json!({
            "original_title": "The Matrix",
            "overview": "A hacker learns the truth.",
            "original_language": "en",
            "imdb": 8.7,
            "foundIn": ["Netflix"]
        })
    }

    #[test]
    fn create_defaults_list_fields_to_empty() {
        let create: MovieCreate = serde_json::from_value(minimal_create()).unwrap();
        assert!(create.genres.is_empty());
        assert!(create.cast.is_empty());
        assert!(create.validate().is_ok());
    }

    #[test]
    fn create_requires_original_title() {
        let mut payload = minimal_create();
        payload.as_object_mut().unwrap().remove("original_title");
        assert!(serde_json::from_value::<MovieCreate>(payload).is_err());
    }

    #[test]
    fn create_rejects_empty_found_in() {
        let mut payload = minimal_create();
        payload["foundIn"] = json!([]);
        let create: MovieCreate = serde_json::from_value(payload).unwrap();
        assert!(matches!(create.validate(), Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn insert_document_omits_absent_fields() {
        let create: MovieCreate = serde_json::from_value(minimal_create()).unwrap();
        let doc = create.insert_document().unwrap();
        assert_eq!(doc.get_str("original_title").unwrap(), "The Matrix");
        assert!(!doc.contains_key("release_date"));
        assert!(!doc.contains_key("poster_path"));
        assert!(doc.contains_key("genres"));
        assert_eq!(doc.get_array("foundIn").unwrap().len(), 1);
    }

    #[test]
    fn set_document_contains_only_provided_fields() {
        let update: MovieUpdate = serde_json::from_value(json!({ "imdb": 8.1 })).unwrap();
        let doc = update.set_document().unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get_f64("imdb").unwrap(), 8.1);
    }

    #[test]
    fn set_document_treats_null_as_absent() {
        let update: MovieUpdate =
            serde_json::from_value(json!({ "overview": "new", "imdb": null })).unwrap();
        let doc = update.set_document().unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get_str("overview").unwrap(), "new");
    }

    #[test]
    fn set_document_empty_when_no_fields_given() {
        let update: MovieUpdate = serde_json::from_value(json!({})).unwrap();
        assert!(update.set_document().unwrap().is_empty());
    }

    #[test]
    fn record_surfaces_object_id_as_hex_string() {
        let oid = ObjectId::new();
        let stored = doc! { "_id": oid, "original_title": "Dune", "foundIn": ["Prime"] };
        let movie: MovieDocument = bson::from_document(stored).unwrap();
        let record = movie.into_record();
        assert_eq!(record.id, oid.to_hex());
        assert_eq!(record.found_in, vec!["Prime".to_string()]);
    }

    #[test]
    fn record_serializes_without_absent_fields() {
        let stored = doc! { "_id": ObjectId::new(), "original_title": "Dune", "foundIn": [] };
        let movie: MovieDocument = bson::from_document(stored).unwrap();
        let value = serde_json::to_value(movie.into_record()).unwrap();
        assert!(value.get("overview").is_none());
        assert_eq!(value["foundIn"], json!([]));
    }

    #[test]
    fn feedback_rejects_empty_fields() {
        let empty_user: FeedbackCreate =
            serde_json::from_value(json!({ "userName": "", "feedback": "great" })).unwrap();
        assert!(matches!(empty_user.validate(), Err(AppError::InvalidRequest(_))));

        let empty_body: FeedbackCreate =
            serde_json::from_value(json!({ "userName": "asha", "feedback": "" })).unwrap();
        assert!(matches!(empty_body.validate(), Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn timestamp_is_shifted_and_minute_precise() {
        let stamped = feedback_timestamp(Timestamp::UNIX_EPOCH).unwrap();
        assert_eq!(stamped, "1970-01-01 05.30");
    }
}
