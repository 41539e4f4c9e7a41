//! Notes endpoints: the browse wizard, downloads and admin edits.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{require, success, ApiResult};
use crate::browse::{BrowseOption, BrowseStep, NotesBrowser};
use crate::errors::AppError;
use crate::models::{Course, Note, NoteSource, NotesTree, Semester, Year};
use crate::AppState;

/// Browse query parameters. Keys must be given in order.
#[derive(Debug, Default, Deserialize)]
pub struct BrowseQuery {
    pub course: Option<String>,
    pub year: Option<String>,
    pub semester: Option<String>,
    /// Case-insensitive name filter
    pub q: Option<String>,
    /// Step back from the given selection, forgetting its last key
    #[serde(default)]
    pub back: bool,
}

/// Where the wizard stands and what it shows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseView {
    pub step: BrowseStep,
    pub step_number: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<Course>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<Year>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<Semester>,
    pub search: String,
    pub options: Vec<BrowseOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<Note>>,
    pub is_placeholder: bool,
}

fn parse_key<K>(
    raw: Option<&str>,
    field: &str,
    parse: fn(&str) -> Option<K>,
) -> Result<Option<K>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse(s)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Unknown {}: {}", field, s))),
    }
}

fn validate_note(note: &Note) -> Result<(), AppError> {
    require(&note.name, "Note name")?;
    match &note.source {
        NoteSource::Embedded { file_data } => require(file_data, "File data"),
        NoteSource::Link { url } => require(url, "File URL"),
    }
}

/// GET /api/notes - The whole course/year/semester tree.
pub async fn list_notes(State(state): State<AppState>) -> ApiResult<NotesTree> {
    success(state.store.get_notes().await?)
}

/// GET /api/notes/browse - Wizard state for a partial selection.
pub async fn browse_notes(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> ApiResult<BrowseView> {
    let course = parse_key(query.course.as_deref(), "course", Course::from_str)?;
    let year = parse_key(query.year.as_deref(), "year", Year::from_str)?;
    let semester = parse_key(query.semester.as_deref(), "semester", Semester::from_str)?;

    let mut browser = NotesBrowser::from_selection(course, year, semester)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if query.back {
        browser.back();
    }
    if let Some(q) = query.q {
        browser.set_search(q);
    }

    let listing = if browser.step() == BrowseStep::ViewNotes {
        let tree = state.store.get_notes().await?;
        browser.visible_notes(&tree, state.config.mock_notes)
    } else {
        None
    };

    let step = browser.step();
    success(BrowseView {
        step,
        step_number: step.number(),
        course: browser.course(),
        year: browser.year(),
        semester: browser.semester(),
        search: browser.search().to_string(),
        options: browser.options(),
        is_placeholder: listing.as_ref().is_some_and(|l| l.is_placeholder),
        notes: listing.map(|l| l.notes),
    })
}

/// POST /api/notes/:id/download - Count a download and return the note.
pub async fn download_note(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Note> {
    match state.store.record_download(id).await? {
        Some(note) => success(note),
        None => Err(AppError::NotFound(format!("Note {} not found", id))),
    }
}

/// PUT /api/admin/notes - Replace the whole tree. Each note is filed under its own keys.
pub async fn replace_notes(
    State(state): State<AppState>,
    Json(notes): Json<Vec<Note>>,
) -> ApiResult<NotesTree> {
    for note in &notes {
        validate_note(note)?;
    }

    let tree = state.store.set_notes(notes).await?;
    tracing::info!("Replaced notes ({} notes)", tree.iter().count());
    success(tree)
}

/// POST /api/admin/notes - File a new note.
pub async fn create_note(
    State(state): State<AppState>,
    Json(note): Json<Note>,
) -> ApiResult<Note> {
    validate_note(&note)?;

    let created = state.store.add_note(note).await?;
    tracing::info!(
        "Created note {} in {}/{}/{}",
        created.id,
        created.category,
        created.year,
        created.semester
    );
    success(created)
}

/// PUT /api/admin/notes/:id - Replace a note. Unknown ids change nothing.
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(mut note): Json<Note>,
) -> ApiResult<Note> {
    validate_note(&note)?;

    note.id = id;
    state.store.update_note(note.clone()).await?;
    success(note)
}

/// DELETE /api/admin/notes/:id - Remove a note.
pub async fn delete_note(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    state.store.delete_note(id).await?;
    tracing::info!("Deleted note {}", id);
    success(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        assert_eq!(
            parse_key(Some("bis"), "course", Course::from_str).unwrap(),
            Some(Course::Bis)
        );
        assert_eq!(parse_key(Some(" "), "course", Course::from_str).unwrap(), None);
        assert_eq!(parse_key::<Year>(None, "year", Year::from_str).unwrap(), None);
        assert!(parse_key(Some("year9"), "year", Year::from_str).is_err());
    }
}
