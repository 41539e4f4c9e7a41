//! Content store for every site collection.
//!
//! Each collection lives under one storage key as a single JSON value. Mutations
//! load the whole value, change it and write it back; the last write wins.

mod local;
#[cfg(test)]
mod memory;
mod remote;

pub use local::LocalStorage;
#[cfg(test)]
pub use memory::MemoryStorage;
pub use remote::RemoteStorage;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::{
    CabinetTerm, LeadershipBook, LeadershipMember, Note, NotesTree, Record, SiteSettings,
    LEADERSHIP_KEY, NOTES_KEY, SETTINGS_KEY,
};

/// Key-value persistence behind the content store.
#[async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    fn name(&self) -> &'static str;
    async fn read(&self, key: &str) -> Result<Option<Value>, AppError>;
    async fn write(&self, key: &str, value: &Value) -> Result<(), AppError>;
}

/// Millisecond timestamp used as a record id.
///
/// Two records created in the same millisecond share an id.
fn next_id() -> i64 {
    Utc::now().timestamp_millis()
}

/// Typed access to all collections over one storage backend.
pub struct ContentStore {
    backend: Arc<dyn StorageBackend>,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl ContentStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    async fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, AppError> {
        match self.backend.read(key).await? {
            None => Ok(T::default()),
            Some(value) => serde_json::from_value(value).map_err(|e| {
                tracing::error!("Stored value under {} has the wrong shape: {}", key, e);
                AppError::Storage(format!("Stored value under {} has the wrong shape: {}", key, e))
            }),
        }
    }

    async fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let value = serde_json::to_value(value)
            .map_err(|e| AppError::Internal(format!("Failed to encode {}: {}", key, e)))?;
        self.backend.write(key, &value).await
    }

    // ==================== FLAT COLLECTIONS ====================

    /// Current snapshot of a collection.
    pub async fn get_all<T: Record>(&self) -> Result<Vec<T>, AppError> {
        self.load(T::KEY).await
    }

    /// Replace a whole collection.
    pub async fn set_all<T: Record>(&self, records: &[T]) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        self.save(T::KEY, &records).await
    }

    /// Append a record under a freshly generated id.
    pub async fn add<T: Record>(&self, mut record: T) -> Result<T, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records: Vec<T> = self.load(T::KEY).await?;
        record.set_id(next_id());
        records.push(record.clone());
        self.save(T::KEY, &records).await?;
        tracing::debug!("Added {} {}", T::LABEL, record.id());
        Ok(record)
    }

    /// Replace the record with the same id in place. Absent ids are ignored.
    pub async fn update<T: Record>(&self, record: T) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records: Vec<T> = self.load(T::KEY).await?;
        let Some(slot) = records.iter_mut().find(|r| r.id() == record.id()) else {
            tracing::debug!("Update of unknown {} {} ignored", T::LABEL, record.id());
            return Ok(());
        };
        *slot = record;
        self.save(T::KEY, &records).await
    }

    /// Remove every record carrying `id`.
    pub async fn delete<T: Record>(&self, id: i64) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records: Vec<T> = self.load(T::KEY).await?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(());
        }
        self.save(T::KEY, &records).await
    }

    // ==================== NOTES ====================

    pub async fn get_notes(&self) -> Result<NotesTree, AppError> {
        self.load(NOTES_KEY).await
    }

    /// Replace every note, filing each under its own keys. Notes with id 0 get
    /// a generated id; a repeated id rejects the whole batch.
    pub async fn set_notes(&self, notes: Vec<Note>) -> Result<NotesTree, AppError> {
        let mut taken = HashSet::new();
        for note in notes.iter().filter(|n| n.id != 0) {
            if !taken.insert(note.id) {
                return Err(AppError::Validation(format!(
                    "Note id {} appears more than once",
                    note.id
                )));
            }
        }

        let mut candidate = next_id();
        let mut tree = NotesTree::new();
        for mut note in notes {
            if note.id == 0 {
                while taken.contains(&candidate) {
                    candidate += 1;
                }
                note.id = candidate;
                taken.insert(candidate);
            }
            tree.insert(note);
        }

        let _guard = self.write_lock.lock().await;
        self.save(NOTES_KEY, &tree).await?;
        Ok(tree)
    }

    /// File a note under its own course, year and semester.
    pub async fn add_note(&self, mut note: Note) -> Result<Note, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut tree: NotesTree = self.load(NOTES_KEY).await?;
        note.id = next_id();
        tree.insert(note.clone());
        self.save(NOTES_KEY, &tree).await?;
        tracing::debug!(
            "Added note {} under {}/{}/{}",
            note.id,
            note.category,
            note.year,
            note.semester
        );
        Ok(note)
    }

    /// Replace a note, moving it if its keys changed. Absent ids are ignored.
    pub async fn update_note(&self, note: Note) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut tree: NotesTree = self.load(NOTES_KEY).await?;
        let id = note.id;
        if !tree.replace(note) {
            tracing::debug!("Update of unknown note {} ignored", id);
            return Ok(());
        }
        self.save(NOTES_KEY, &tree).await
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut tree: NotesTree = self.load(NOTES_KEY).await?;
        if tree.remove(id).is_none() {
            return Ok(());
        }
        self.save(NOTES_KEY, &tree).await
    }

    /// Bump a note's download counter, returning the updated note.
    pub async fn record_download(&self, id: i64) -> Result<Option<Note>, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut tree: NotesTree = self.load(NOTES_KEY).await?;
        let Some(note) = tree.get_mut(id) else {
            return Ok(None);
        };
        note.downloads = note.downloads.saturating_add(1);
        let updated = note.clone();
        self.save(NOTES_KEY, &tree).await?;
        Ok(Some(updated))
    }

    // ==================== LEADERSHIP ====================

    pub async fn get_leadership(&self) -> Result<LeadershipBook, AppError> {
        self.load(LEADERSHIP_KEY).await
    }

    pub async fn set_leadership(&self, book: &LeadershipBook) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        self.save(LEADERSHIP_KEY, book).await
    }

    /// Load, apply `change` to the term for `year` (created if missing), and save.
    async fn modify_term<R>(
        &self,
        year: &str,
        change: impl FnOnce(&mut CabinetTerm) -> R,
    ) -> Result<R, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut book: LeadershipBook = self.load(LEADERSHIP_KEY).await?;
        let result = change(book.entry(year.to_string()).or_default());
        self.save(LEADERSHIP_KEY, &book).await?;
        Ok(result)
    }

    /// Install the president for a cabinet year. An id of 0 gets a generated one.
    pub async fn set_president(
        &self,
        year: &str,
        mut president: LeadershipMember,
    ) -> Result<LeadershipMember, AppError> {
        if president.id == 0 {
            president.id = next_id();
        }
        let stored = president.clone();
        self.modify_term(year, move |term| term.president = Some(president))
            .await?;
        Ok(stored)
    }

    /// Remove a year's president. Unknown years are ignored.
    pub async fn clear_president(&self, year: &str) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut book: LeadershipBook = self.load(LEADERSHIP_KEY).await?;
        let Some(term) = book.get_mut(year) else {
            return Ok(());
        };
        if term.president.take().is_none() {
            return Ok(());
        }
        self.save(LEADERSHIP_KEY, &book).await
    }

    pub async fn add_executive(
        &self,
        year: &str,
        mut member: LeadershipMember,
    ) -> Result<LeadershipMember, AppError> {
        member.id = next_id();
        let stored = member.clone();
        self.modify_term(year, move |term| term.executives.push(member))
            .await?;
        Ok(stored)
    }

    /// Replace an executive in place. Unknown years and ids are ignored.
    pub async fn update_executive(
        &self,
        year: &str,
        member: LeadershipMember,
    ) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut book: LeadershipBook = self.load(LEADERSHIP_KEY).await?;
        let slot = book
            .get_mut(year)
            .and_then(|term| term.executives.iter_mut().find(|m| m.id == member.id));
        let Some(slot) = slot else {
            tracing::debug!("Update of unknown executive {} in {} ignored", member.id, year);
            return Ok(());
        };
        *slot = member;
        self.save(LEADERSHIP_KEY, &book).await
    }

    pub async fn delete_executive(&self, year: &str, id: i64) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut book: LeadershipBook = self.load(LEADERSHIP_KEY).await?;
        let Some(term) = book.get_mut(year) else {
            return Ok(());
        };
        term.executives.retain(|m| m.id != id);
        self.save(LEADERSHIP_KEY, &book).await
    }

    /// Drop a whole cabinet year.
    pub async fn delete_term(&self, year: &str) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut book: LeadershipBook = self.load(LEADERSHIP_KEY).await?;
        if book.remove(year).is_none() {
            return Ok(());
        }
        self.save(LEADERSHIP_KEY, &book).await
    }

    // ==================== SETTINGS ====================

    pub async fn get_settings(&self) -> Result<SiteSettings, AppError> {
        self.load(SETTINGS_KEY).await
    }

    pub async fn set_settings(&self, settings: &SiteSettings) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        self.save(SETTINGS_KEY, settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, NoteSource, Project, Semester, Year};
    use serde_json::json;

    fn store() -> (ContentStore, Arc<MemoryStorage>) {
        let backend = Arc::new(MemoryStorage::default());
        (ContentStore::new(backend.clone()), backend)
    }

    fn project(id: i64, title: &str) -> Project {
        Project {
            id,
            title: title.to_string(),
            description: String::new(),
            technologies: vec!["Rust".to_string()],
            team: Vec::new(),
            image: None,
            github_url: None,
            live_url: None,
        }
    }

    fn note(name: &str, course: Course, year: Year, semester: Semester) -> Note {
        Note {
            id: 0,
            name: name.to_string(),
            file_type: "PDF".to_string(),
            size: "800 KB".to_string(),
            downloads: 0,
            category: course,
            year,
            semester,
            source: NoteSource::Link {
                url: "https://files.example.org/n.pdf".to_string(),
            },
        }
    }

    fn member(id: i64, name: &str, position: &str) -> LeadershipMember {
        LeadershipMember {
            id,
            name: name.to_string(),
            position: position.to_string(),
            image: None,
            bio: None,
            email: None,
            linkedin: None,
            achievements: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_empty_collections_read_as_defaults() {
        let (store, _) = store();

        assert!(store.get_all::<Project>().await.unwrap().is_empty());
        assert_eq!(store.get_notes().await.unwrap().iter().count(), 0);
        assert!(store.get_leadership().await.unwrap().is_empty());
        assert_eq!(store.get_settings().await.unwrap(), SiteSettings::default());
    }

    #[tokio::test]
    async fn test_add_assigns_id_and_persists() {
        let (store, backend) = store();

        let added = store.add(project(0, "Campus Navigator")).await.unwrap();
        assert!(added.id > 0);

        let all = store.get_all::<Project>().await.unwrap();
        assert_eq!(all, vec![added.clone()]);

        let raw = backend.raw("kyucsa_projects").await.unwrap();
        assert_eq!(raw[0]["title"], "Campus Navigator");
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let (store, _) = store();
        store
            .set_all(&[project(1, "A"), project(2, "B"), project(3, "C")])
            .await
            .unwrap();

        store.update(project(2, "B2")).await.unwrap();

        let titles: Vec<String> = store
            .get_all::<Project>()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["A", "B2", "C"]);
    }

    #[tokio::test]
    async fn test_update_unknown_id_leaves_collection_unchanged() {
        let (store, _) = store();
        let seeded = vec![project(1, "A"), project(2, "B")];
        store.set_all(&seeded).await.unwrap();

        store.update(project(99, "Ghost")).await.unwrap();

        assert_eq!(store.get_all::<Project>().await.unwrap(), seeded);
    }

    #[tokio::test]
    async fn test_delete_removes_only_that_id() {
        let (store, _) = store();
        store
            .set_all(&[project(1, "A"), project(2, "B"), project(3, "C")])
            .await
            .unwrap();

        store.delete::<Project>(2).await.unwrap();

        let ids: Vec<i64> = store
            .get_all::<Project>()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);

        // Deleting again is a no-op.
        store.delete::<Project>(2).await.unwrap();
        assert_eq!(store.get_all::<Project>().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_added_note_found_once_in_its_bucket() {
        let (store, _) = store();
        let added = store
            .add_note(note("Discrete Maths", Course::Bitc, Year::Year1, Semester::Semester1))
            .await
            .unwrap();

        let tree = store.get_notes().await.unwrap();
        let bucket = tree.bucket(Course::Bitc, Year::Year1, Semester::Semester1);
        assert_eq!(bucket.iter().filter(|n| n.id == added.id).count(), 1);
        assert!(tree
            .bucket(Course::Bitc, Year::Year1, Semester::Semester2)
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_note_moves_bucket() {
        let (store, _) = store();
        let added = store
            .add_note(note("Databases", Course::Cs, Year::Year2, Semester::Semester1))
            .await
            .unwrap();

        let mut moved = added.clone();
        moved.semester = Semester::Semester2;
        store.update_note(moved.clone()).await.unwrap();

        let tree = store.get_notes().await.unwrap();
        assert!(tree.bucket(Course::Cs, Year::Year2, Semester::Semester1).is_empty());
        assert_eq!(tree.bucket(Course::Cs, Year::Year2, Semester::Semester2), &[moved]);
    }

    #[tokio::test]
    async fn test_record_download_increments() {
        let (store, _) = store();
        let added = store
            .add_note(note("Networks", Course::Bis, Year::Year3, Semester::Semester2))
            .await
            .unwrap();

        let first = store.record_download(added.id).await.unwrap().unwrap();
        let second = store.record_download(added.id).await.unwrap().unwrap();
        assert_eq!(first.downloads, 1);
        assert_eq!(second.downloads, 2);
        assert!(store.record_download(added.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_president_leaves_other_years() {
        let (store, _) = store();
        let previous = member(7, "Previous President", "President");
        store.set_president("2024-2025", previous.clone()).await.unwrap();

        let president = member(11, "Current President", "President");
        let stored = store
            .set_president("2025-2026", president.clone())
            .await
            .unwrap();
        assert_eq!(stored, president);

        let book = store.get_leadership().await.unwrap();
        assert_eq!(book["2025-2026"].president, Some(president));
        assert_eq!(book["2024-2025"].president, Some(previous));
    }

    #[tokio::test]
    async fn test_executive_lifecycle() {
        let (store, _) = store();
        let added = store
            .add_executive("2025-2026", member(0, "Jane", "Secretary"))
            .await
            .unwrap();
        assert!(added.id > 0);

        let mut renamed = added.clone();
        renamed.position = "General Secretary".to_string();
        store.update_executive("2025-2026", renamed.clone()).await.unwrap();
        store
            .update_executive("1999-2000", renamed.clone())
            .await
            .unwrap();

        let book = store.get_leadership().await.unwrap();
        assert_eq!(book["2025-2026"].executives, vec![renamed]);
        assert!(!book.contains_key("1999-2000"));

        store.delete_executive("2025-2026", added.id).await.unwrap();
        store.clear_president("2025-2026").await.unwrap();
        let book = store.get_leadership().await.unwrap();
        assert!(book["2025-2026"].executives.is_empty());

        store.delete_term("2025-2026").await.unwrap();
        assert!(store.get_leadership().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_president_of_unknown_year_is_noop() {
        let (store, backend) = store();

        store.clear_president("1999-2000").await.unwrap();

        assert!(store.get_leadership().await.unwrap().is_empty());
        assert!(backend.raw("kyucsa_leadership").await.is_none());
    }

    #[tokio::test]
    async fn test_clear_president_keeps_executives() {
        let (store, _) = store();
        store
            .set_president("2025-2026", member(11, "Current President", "President"))
            .await
            .unwrap();
        let treasurer = store
            .add_executive("2025-2026", member(0, "Grace", "Treasurer"))
            .await
            .unwrap();

        store.clear_president("2025-2026").await.unwrap();

        let book = store.get_leadership().await.unwrap();
        assert_eq!(book["2025-2026"].president, None);
        assert_eq!(book["2025-2026"].executives, vec![treasurer]);
    }

    #[tokio::test]
    async fn test_set_notes_rejects_repeated_ids() {
        let (store, backend) = store();
        let mut first = note("Intro", Course::Bitc, Year::Year1, Semester::Semester1);
        first.id = 42;
        let mut second = note("Compilers", Course::Cs, Year::Year3, Semester::Semester2);
        second.id = 42;

        let err = store.set_notes(vec![first, second]).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(backend.raw("kyucsa_notes").await.is_none());
    }

    #[tokio::test]
    async fn test_set_notes_assigns_missing_ids() {
        let (store, _) = store();
        let mut kept = note("Kept", Course::Bis, Year::Year2, Semester::Semester1);
        kept.id = 7;
        let fresh_a = note("Fresh A", Course::Bis, Year::Year2, Semester::Semester1);
        let fresh_b = note("Fresh B", Course::Bis, Year::Year2, Semester::Semester2);

        let tree = store.set_notes(vec![kept, fresh_a, fresh_b]).await.unwrap();

        let mut ids: Vec<i64> = tree.iter().map(|n| n.id).collect();
        assert!(ids.contains(&7));
        assert!(ids.iter().all(|id| *id != 0));
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
        assert_eq!(store.get_notes().await.unwrap(), tree);
    }

    #[tokio::test]
    async fn test_download_counter_saturates() {
        let (store, _) = store();
        let mut popular = note("Popular", Course::Cs, Year::Year1, Semester::Semester1);
        popular.id = 5;
        popular.downloads = u64::MAX;
        store.set_notes(vec![popular]).await.unwrap();

        let note = store.record_download(5).await.unwrap().unwrap();
        assert_eq!(note.downloads, u64::MAX);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_storage_error() {
        let (store, backend) = store();
        backend
            .write("kyucsa_projects", &json!({ "not": "a list" }))
            .await
            .unwrap();

        let err = store.get_all::<Project>().await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let (store, backend) = store();
        backend.fail_next();

        let err = store.add(project(0, "Offline")).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let (store, _) = store();
        let mut settings = SiteSettings::default();
        settings.contact_email = "hello@kyucsa.org".to_string();
        settings
            .social_links
            .insert("x".to_string(), "https://x.com/kyucsa".to_string());

        store.set_settings(&settings).await.unwrap();
        assert_eq!(store.get_settings().await.unwrap(), settings);
    }
}
