//! Request validation for media mutations
//!
//! Only presence is enforced: `mediaType` and `status` accept any non-empty
//! string.

use crate::{
    error::ApiError,
    models::media::{CreateMediaRequest, MediaPatch, NewMedia, UpdateMediaRequest},
};

const MISSING_FIELDS: &str = "You must include a title, type, and status";

/// Keeps the value exactly as sent; only whitespace-only input counts as
/// missing
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Validate a create request; title, type and status are mandatory
pub fn validate_create(request: CreateMediaRequest) -> Result<NewMedia, ApiError> {
    let (Some(title), Some(media_type), Some(status)) = (
        non_blank(request.title),
        non_blank(request.media_type),
        non_blank(request.status),
    ) else {
        return Err(ApiError::BadRequest(MISSING_FIELDS.to_string()));
    };

    Ok(NewMedia {
        title,
        media_type,
        status,
        next_release_date: request.next_release_date,
        tmdb_id: request.tmdb_id,
        tmdb_type: request.tmdb_type,
        poster_path: request.poster_path,
    })
}

/// Validate an update request; any subset of fields may be supplied
pub fn validate_update(request: UpdateMediaRequest) -> Result<MediaPatch, ApiError> {
    Ok(MediaPatch {
        title: required("title", request.title)?,
        media_type: required("mediaType", request.media_type)?,
        status: required("status", request.status)?,
        next_release_date: request.next_release_date,
        tmdb_id: request.tmdb_id,
        tmdb_type: request.tmdb_type,
        poster_path: request.poster_path,
    })
}

/// A mandatory column may be omitted from a patch but never nulled or blanked
fn required(field: &str, value: Option<Option<String>>) -> Result<Option<String>, ApiError> {
    match value {
        None => Ok(None),
        Some(inner) => non_blank(inner)
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest(format!("{} cannot be empty", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(title: &str, media_type: &str, status: &str) -> CreateMediaRequest {
        CreateMediaRequest {
            title: Some(title.to_string()),
            media_type: Some(media_type.to_string()),
            status: Some(status.to_string()),
            ..CreateMediaRequest::default()
        }
    }

    #[test]
    fn test_create_requires_title_type_status() {
        assert!(validate_create(create("Dune", "movie", "watching")).is_ok());

        for request in [
            create("", "movie", "watching"),
            create("Dune", "  ", "watching"),
            create("Dune", "movie", ""),
            CreateMediaRequest::default(),
        ] {
            match validate_create(request) {
                Err(ApiError::BadRequest(msg)) => assert_eq!(msg, MISSING_FIELDS),
                other => panic!("expected missing fields, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_create_accepts_arbitrary_type_and_status() {
        let media = validate_create(create(" Dune ", "podcast", "rewatching")).unwrap();
        assert_eq!(media.title, " Dune ");
        assert_eq!(media.media_type, "podcast");
        assert_eq!(media.status, "rewatching");
    }

    #[test]
    fn test_update_accepts_any_subset() {
        let patch = validate_update(UpdateMediaRequest {
            status: Some(Some("completed".to_string())),
            ..UpdateMediaRequest::default()
        })
        .unwrap();

        assert_eq!(patch.status.as_deref(), Some("completed"));
        assert_eq!(patch.title, None);
        assert_eq!(patch.next_release_date, None);

        assert_eq!(
            validate_update(UpdateMediaRequest::default()).unwrap(),
            MediaPatch::default()
        );
    }

    #[test]
    fn test_update_keeps_values_as_sent() {
        let patch = validate_update(UpdateMediaRequest {
            title: Some(Some("  Dune: Part Two".to_string())),
            ..UpdateMediaRequest::default()
        })
        .unwrap();

        assert_eq!(patch.title.as_deref(), Some("  Dune: Part Two"));
    }

    #[test]
    fn test_update_rejects_nulling_mandatory_fields() {
        for request in [
            UpdateMediaRequest {
                title: Some(None),
                ..UpdateMediaRequest::default()
            },
            UpdateMediaRequest {
                status: Some(Some("   ".to_string())),
                ..UpdateMediaRequest::default()
            },
        ] {
            assert!(matches!(
                validate_update(request),
                Err(ApiError::BadRequest(_))
            ));
        }
    }

    #[test]
    fn test_update_can_clear_optional_fields() {
        let patch = validate_update(UpdateMediaRequest {
            poster_path: Some(None),
            tmdb_id: Some(None),
            ..UpdateMediaRequest::default()
        })
        .unwrap();

        assert_eq!(patch.poster_path, Some(None));
        assert_eq!(patch.tmdb_id, Some(None));
    }
}
