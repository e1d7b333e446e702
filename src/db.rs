use futures::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{Document, doc, oid::ObjectId},
};

use crate::{
    error::{AppError, AppResult},
    models::{FeedbackDocument, MovieCreate, MovieDocument, MovieUpdate},
};

pub async fn connect(url: &str, database: &str) -> AppResult<Database> {
    let client = Client::with_uri_str(url).await?;
    Ok(client.database(database))
}

/// Handle to the two collections. Cloned freely; the underlying client is
/// safe for concurrent use across in-flight requests.
#[derive(Clone)]
pub struct Store {
    movies: Collection<MovieDocument>,
    feedback: Collection<FeedbackDocument>,
}

impl Store {
    pub fn new(db: &Database) -> Self {
        Self { movies: db.collection("cinema"), feedback: db.collection("feedback") }
    }

    pub async fn list_movies(&self, found_in: Option<&str>) -> AppResult<Vec<MovieDocument>> {
        let filter = match found_in {
            // Exact membership in the foundIn array, not a substring match.
            Some(tag) => doc! { "foundIn": tag },
            None => Document::new(),
        };
        Ok(self.movies.find(filter).await?.try_collect().await?)
    }

    pub async fn search_by_title(&self, query: &str) -> AppResult<Vec<MovieDocument>> {
        let filter = doc! { "original_title": { "$regex": query, "$options": "i" } };
        Ok(self.movies.find(filter).await?.try_collect().await?)
    }

    pub async fn find_movie(&self, id: ObjectId) -> AppResult<Option<MovieDocument>> {
        Ok(self.movies.find_one(doc! { "_id": id }).await?)
    }

    pub async fn insert_movie(&self, movie: &MovieCreate) -> AppResult<ObjectId> {
        let document = movie.insert_document()?;
        let result = self.movies.clone_with_type::<Document>().insert_one(document).await?;
        result.inserted_id.as_object_id().ok_or(AppError::Internal("Failed to create movie"))
    }

    /// Applies the provided fields only. Returns whether a document with
    /// that id exists.
    pub async fn update_movie(&self, id: ObjectId, update: &MovieUpdate) -> AppResult<bool> {
        let set = update.set_document()?;
        if set.is_empty() {
            // An empty $set is a server-side error; degrade to an
            // existence check so the not-found contract still holds.
            return Ok(self.find_movie(id).await?.is_some());
        }
        let result = self.movies.update_one(doc! { "_id": id }, doc! { "$set": set }).await?;
        Ok(result.matched_count == 1)
    }

    pub async fn delete_movie(&self, id: ObjectId) -> AppResult<bool> {
        let result = self.movies.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count == 1)
    }

    pub async fn insert_feedback(&self, entry: &FeedbackDocument) -> AppResult<ObjectId> {
        let result = self.feedback.insert_one(entry).await?;
        result.inserted_id.as_object_id().ok_or(AppError::Internal("Feedback not saved"))
    }
}
