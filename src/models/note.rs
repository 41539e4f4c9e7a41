//! Course notes and the course → year → semester tree that holds them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Academic programme a note belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Course {
    Bitc,
    Bis,
    Blis,
    Cs,
}

impl Course {
    pub const ALL: [Course; 4] = [Course::Bitc, Course::Bis, Course::Blis, Course::Cs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Course::Bitc => "bitc",
            Course::Bis => "bis",
            Course::Blis => "blis",
            Course::Cs => "cs",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Short code shown on course cards.
    pub fn code(&self) -> &'static str {
        match self {
            Course::Bitc => "BITC",
            Course::Bis => "BIS",
            Course::Blis => "BLIS",
            Course::Cs => "CS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Course::Bitc => "Bachelor of Information Technology and Computing",
            Course::Bis => "Bachelor of Information Systems",
            Course::Blis => "Bachelor of Library and Information Science",
            Course::Cs => "Bachelor of Science in Computer Science",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Year {
    Year1,
    Year2,
    Year3,
}

impl Year {
    pub const ALL: [Year; 3] = [Year::Year1, Year::Year2, Year::Year3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Year::Year1 => "year1",
            Year::Year2 => "year2",
            Year::Year3 => "year3",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|y| y.as_str() == s)
    }

    pub fn number(&self) -> u8 {
        match self {
            Year::Year1 => 1,
            Year::Year2 => 2,
            Year::Year3 => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Year::Year1 => "Year 1",
            Year::Year2 => "Year 2",
            Year::Year3 => "Year 3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semester {
    Semester1,
    Semester2,
}

impl Semester {
    pub const ALL: [Semester; 2] = [Semester::Semester1, Semester::Semester2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Semester::Semester1 => "semester1",
            Semester::Semester2 => "semester2",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s2| s2.as_str() == s)
    }

    pub fn number(&self) -> u8 {
        match self {
            Semester::Semester1 => 1,
            Semester::Semester2 => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Semester::Semester1 => "Semester 1",
            Semester::Semester2 => "Semester 2",
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the document bytes live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NoteSource {
    /// Base64 data URL uploaded through the admin form
    Embedded {
        #[serde(rename = "fileData")]
        file_data: String,
    },
    /// Externally hosted document
    Link { url: String },
}

/// A downloadable course document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    /// File type tag, e.g. "PDF"
    #[serde(rename = "type", default = "default_file_type")]
    pub file_type: String,
    /// Free-text size label, e.g. "2.4 MB"
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub downloads: u64,
    pub category: Course,
    pub year: Year,
    pub semester: Semester,
    #[serde(flatten)]
    pub source: NoteSource,
}

fn default_file_type() -> String {
    "PDF".to_string()
}

impl Note {
    pub fn keys(&self) -> (Course, Year, Semester) {
        (self.category, self.year, self.semester)
    }
}

type SemesterMap = BTreeMap<Semester, Vec<Note>>;
type YearMap = BTreeMap<Year, SemesterMap>;

/// Notes bucketed by course, year and semester.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotesTree(BTreeMap<Course, YearMap>);

impl NotesTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notes stored under one (course, year, semester) path, in insertion order.
    pub fn bucket(&self, course: Course, year: Year, semester: Semester) -> &[Note] {
        self.0
            .get(&course)
            .and_then(|years| years.get(&year))
            .and_then(|semesters| semesters.get(&semester))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn bucket_mut(&mut self, course: Course, year: Year, semester: Semester) -> &mut Vec<Note> {
        self.0
            .entry(course)
            .or_default()
            .entry(year)
            .or_default()
            .entry(semester)
            .or_default()
    }

    /// Every note in the tree, walking courses, years and semesters in order.
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.0
            .values()
            .flat_map(|years| years.values())
            .flat_map(|semesters| semesters.values())
            .flat_map(|notes| notes.iter())
    }

    /// Append a note to the bucket named by its own keys.
    pub fn insert(&mut self, note: Note) {
        let (course, year, semester) = note.keys();
        self.bucket_mut(course, year, semester).push(note);
    }

    /// Remove every note with `id` from all buckets, returning the first removed.
    pub fn remove(&mut self, id: i64) -> Option<Note> {
        let mut removed = None;
        for years in self.0.values_mut() {
            for semesters in years.values_mut() {
                for notes in semesters.values_mut() {
                    if let Some(pos) = notes.iter().position(|n| n.id == id) {
                        let note = notes.remove(pos);
                        removed.get_or_insert(note);
                        notes.retain(|n| n.id != id);
                    }
                }
            }
        }
        removed
    }

    /// Replace the note with the same id. Moves it when its keys changed.
    /// Returns false when no such note exists.
    pub fn replace(&mut self, note: Note) -> bool {
        let (course, year, semester) = note.keys();
        let slot = self
            .0
            .get_mut(&course)
            .and_then(|years| years.get_mut(&year))
            .and_then(|semesters| semesters.get_mut(&semester))
            .and_then(|notes| notes.iter_mut().find(|n| n.id == note.id));
        if let Some(slot) = slot {
            *slot = note;
            return true;
        }

        if self.remove(note.id).is_some() {
            self.insert(note);
            return true;
        }
        false
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut Note> {
        self.0
            .values_mut()
            .flat_map(|years| years.values_mut())
            .flat_map(|semesters| semesters.values_mut())
            .flat_map(|notes| notes.iter_mut())
            .find(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: i64, name: &str, course: Course, year: Year, semester: Semester) -> Note {
        Note {
            id,
            name: name.to_string(),
            file_type: "PDF".to_string(),
            size: "1.2 MB".to_string(),
            downloads: 0,
            category: course,
            year,
            semester,
            source: NoteSource::Link {
                url: format!("https://files.example.org/{}.pdf", id),
            },
        }
    }

    #[test]
    fn test_tree_json_shape() {
        let mut tree = NotesTree::new();
        tree.insert(note(1, "Data Structures", Course::Bitc, Year::Year1, Semester::Semester1));

        let value = serde_json::to_value(&tree).unwrap();
        let stored = &value["bitc"]["year1"]["semester1"][0];
        assert_eq!(stored["name"], "Data Structures");
        assert_eq!(stored["type"], "PDF");
        assert_eq!(stored["category"], "bitc");
        assert_eq!(stored["url"], "https://files.example.org/1.pdf");
        assert!(stored.get("fileData").is_none());

        let back: NotesTree = serde_json::from_value(value).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_embedded_source_parses() {
        let json = serde_json::json!({
            "id": 9,
            "name": "Networks",
            "type": "PDF",
            "size": "300 KB",
            "downloads": 4,
            "category": "cs",
            "year": "year2",
            "semester": "semester2",
            "fileData": "data:application/pdf;base64,JVBERi0="
        });
        let parsed: Note = serde_json::from_value(json).unwrap();
        assert!(matches!(parsed.source, NoteSource::Embedded { .. }));
        assert_eq!(parsed.keys(), (Course::Cs, Year::Year2, Semester::Semester2));
    }

    #[test]
    fn test_replace_moves_between_buckets() {
        let mut tree = NotesTree::new();
        tree.insert(note(1, "OOP", Course::Bis, Year::Year1, Semester::Semester1));

        let mut moved = note(1, "OOP II", Course::Bis, Year::Year2, Semester::Semester1);
        moved.downloads = 3;
        assert!(tree.replace(moved.clone()));

        assert!(tree.bucket(Course::Bis, Year::Year1, Semester::Semester1).is_empty());
        assert_eq!(tree.bucket(Course::Bis, Year::Year2, Semester::Semester1), &[moved]);
        assert_eq!(tree.iter().count(), 1);
    }

    #[test]
    fn test_replace_missing_is_noop() {
        let mut tree = NotesTree::new();
        tree.insert(note(1, "OOP", Course::Bis, Year::Year1, Semester::Semester1));
        let before = tree.clone();

        assert!(!tree.replace(note(2, "Ghost", Course::Cs, Year::Year3, Semester::Semester2)));
        assert_eq!(tree, before);
    }

    #[test]
    fn test_remove_only_matching_id() {
        let mut tree = NotesTree::new();
        tree.insert(note(1, "A", Course::Cs, Year::Year1, Semester::Semester1));
        tree.insert(note(2, "B", Course::Cs, Year::Year1, Semester::Semester1));
        tree.insert(note(3, "C", Course::Blis, Year::Year3, Semester::Semester2));

        let removed = tree.remove(2).unwrap();
        assert_eq!(removed.name, "B");
        let ids: Vec<i64> = tree.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(tree.remove(2).is_none());
    }

    #[test]
    fn test_key_parsing() {
        assert_eq!(Course::from_str("blis"), Some(Course::Blis));
        assert_eq!(Course::from_str("BLIS"), None);
        assert_eq!(Year::from_str("year3"), Some(Year::Year3));
        assert_eq!(Semester::from_str("semester2"), Some(Semester::Semester2));
        assert_eq!(Semester::from_str("semester3"), None);
    }
}
