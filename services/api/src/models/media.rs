//! Media models for the API service

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A tracked title owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct MediaEntry {
    pub id: i64,
    #[serde(skip_serializing)]
    #[sqlx(rename = "user_id")]
    pub owner_id: i64,
    pub title: String,
    #[serde(rename = "mediaType")]
    pub media_type: String,
    pub status: String,
    #[serde(rename = "nextReleaseDate")]
    pub next_release_date: Option<String>,
    pub tmdb_id: Option<i64>,
    pub tmdb_type: Option<String>,
    pub poster_path: Option<String>,
}

/// Validated fields for a new media entry
#[derive(Debug, Clone, PartialEq)]
pub struct NewMedia {
    pub title: String,
    pub media_type: String,
    pub status: String,
    pub next_release_date: Option<String>,
    pub tmdb_id: Option<i64>,
    pub tmdb_type: Option<String>,
    pub poster_path: Option<String>,
}

/// Validated partial update
///
/// `None` leaves a field untouched; for the nullable columns `Some(None)`
/// clears the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaPatch {
    pub title: Option<String>,
    pub media_type: Option<String>,
    pub status: Option<String>,
    pub next_release_date: Option<Option<String>>,
    pub tmdb_id: Option<Option<i64>>,
    pub tmdb_type: Option<Option<String>>,
    pub poster_path: Option<Option<String>>,
}

impl MediaPatch {
    /// Apply the patch to an entry in place
    pub fn apply(&self, entry: &mut MediaEntry) {
        if let Some(title) = &self.title {
            entry.title = title.clone();
        }
        if let Some(media_type) = &self.media_type {
            entry.media_type = media_type.clone();
        }
        if let Some(status) = &self.status {
            entry.status = status.clone();
        }
        if let Some(next_release_date) = &self.next_release_date {
            entry.next_release_date = next_release_date.clone();
        }
        if let Some(tmdb_id) = self.tmdb_id {
            entry.tmdb_id = tmdb_id;
        }
        if let Some(tmdb_type) = &self.tmdb_type {
            entry.tmdb_type = tmdb_type.clone();
        }
        if let Some(poster_path) = &self.poster_path {
            entry.poster_path = poster_path.clone();
        }
    }
}

/// Body of `POST /create_media`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateMediaRequest {
    pub title: Option<String>,
    #[serde(rename = "mediaType")]
    pub media_type: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "nextReleaseDate")]
    pub next_release_date: Option<String>,
    pub tmdb_id: Option<i64>,
    pub tmdb_type: Option<String>,
    pub poster_path: Option<String>,
}

/// Body of `PATCH /update_media/{id}`; distinguishes an absent key from an
/// explicit `null`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMediaRequest {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, rename = "mediaType", deserialize_with = "present")]
    pub media_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Option<String>>,
    #[serde(default, rename = "nextReleaseDate", deserialize_with = "present")]
    pub next_release_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub tmdb_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub tmdb_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub poster_path: Option<Option<String>>,
}

/// Marks a key that appeared in the body, with or without a value
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Response for media listing
#[derive(Debug, Clone, Serialize)]
pub struct MediaListResponse {
    pub media: Vec<MediaEntry>,
}

/// Response for create/update
#[derive(Debug, Clone, Serialize)]
pub struct MediaResponse {
    pub message: &'static str,
    pub media: MediaEntry,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry() -> MediaEntry {
        MediaEntry {
            id: 1,
            owner_id: 9,
            title: "Dune".to_string(),
            media_type: "movie".to_string(),
            status: "watching".to_string(),
            next_release_date: Some("2026-12-18".to_string()),
            tmdb_id: Some(438631),
            tmdb_type: Some("movie".to_string()),
            poster_path: None,
        }
    }

    #[test]
    fn test_entry_wire_shape() {
        let json = serde_json::to_value(entry()).unwrap();
        assert_eq!(
            json,
            json!({
                "id": 1,
                "title": "Dune",
                "mediaType": "movie",
                "status": "watching",
                "nextReleaseDate": "2026-12-18",
                "tmdb_id": 438631,
                "tmdb_type": "movie",
                "poster_path": null
            })
        );
    }

    #[test]
    fn test_update_request_tracks_presence() {
        let req: UpdateMediaRequest =
            serde_json::from_value(json!({"status": "completed", "nextReleaseDate": null}))
                .unwrap();

        assert_eq!(req.status, Some(Some("completed".to_string())));
        assert_eq!(req.next_release_date, Some(None));
        assert_eq!(req.title, None);
        assert_eq!(req.tmdb_id, None);
    }

    #[test]
    fn test_patch_apply_keeps_untouched_fields() {
        let mut target = entry();
        let patch = MediaPatch {
            status: Some("completed".to_string()),
            next_release_date: Some(None),
            ..MediaPatch::default()
        };

        patch.apply(&mut target);
        assert_eq!(target.status, "completed");
        assert_eq!(target.next_release_date, None);
        assert_eq!(target.title, "Dune");
        assert_eq!(target.tmdb_id, Some(438631));
        assert_eq!(target.owner_id, 9);
    }
}
