//! Notes browser: course → year → semester → documents.
//!
//! A linear wizard. Each step fixes one key; `back` forgets the last key chosen.
//! The final step lists the matching bucket, optionally narrowed by a search term.

use std::fmt;

use serde::Serialize;

use crate::models::{Course, Note, NoteSource, NotesTree, Semester, Year};

/// Wizard position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BrowseStep {
    SelectCourse,
    SelectYear,
    SelectSemester,
    ViewNotes,
}

impl BrowseStep {
    pub fn number(&self) -> u8 {
        match self {
            BrowseStep::SelectCourse => 1,
            BrowseStep::SelectYear => 2,
            BrowseStep::SelectSemester => 3,
            BrowseStep::ViewNotes => 4,
        }
    }
}

/// A selection made at the wrong step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationError {
    pub expected: BrowseStep,
    pub at: BrowseStep,
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot make a step {} choice while at step {}",
            self.expected.number(),
            self.at.number()
        )
    }
}

impl std::error::Error for NavigationError {}

/// One choice offered at the current step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrowseOption {
    pub key: &'static str,
    pub label: &'static str,
}

/// Visible documents at the final step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListing {
    pub notes: Vec<Note>,
    /// True when the bucket was empty and placeholders were generated.
    pub is_placeholder: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesBrowser {
    course: Option<Course>,
    year: Option<Year>,
    semester: Option<Semester>,
    search: String,
}

impl NotesBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the wizard from a partial selection. A later key without the
    /// earlier ones is rejected.
    pub fn from_selection(
        course: Option<Course>,
        year: Option<Year>,
        semester: Option<Semester>,
    ) -> Result<Self, NavigationError> {
        let mut browser = Self::new();
        if let Some(course) = course {
            browser.select_course(course)?;
        }
        if let Some(year) = year {
            browser.select_year(year)?;
        }
        if let Some(semester) = semester {
            browser.select_semester(semester)?;
        }
        Ok(browser)
    }

    pub fn step(&self) -> BrowseStep {
        match (self.course, self.year, self.semester) {
            (None, _, _) => BrowseStep::SelectCourse,
            (Some(_), None, _) => BrowseStep::SelectYear,
            (Some(_), Some(_), None) => BrowseStep::SelectSemester,
            (Some(_), Some(_), Some(_)) => BrowseStep::ViewNotes,
        }
    }

    pub fn course(&self) -> Option<Course> {
        self.course
    }

    pub fn year(&self) -> Option<Year> {
        self.year
    }

    pub fn semester(&self) -> Option<Semester> {
        self.semester
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    fn expect(&self, expected: BrowseStep) -> Result<(), NavigationError> {
        let at = self.step();
        if at != expected {
            return Err(NavigationError { expected, at });
        }
        Ok(())
    }

    pub fn select_course(&mut self, course: Course) -> Result<(), NavigationError> {
        self.expect(BrowseStep::SelectCourse)?;
        self.course = Some(course);
        Ok(())
    }

    pub fn select_year(&mut self, year: Year) -> Result<(), NavigationError> {
        self.expect(BrowseStep::SelectYear)?;
        self.year = Some(year);
        Ok(())
    }

    pub fn select_semester(&mut self, semester: Semester) -> Result<(), NavigationError> {
        self.expect(BrowseStep::SelectSemester)?;
        self.semester = Some(semester);
        Ok(())
    }

    /// Forget the most recent choice. Does nothing at the first step.
    pub fn back(&mut self) {
        if self.semester.take().is_some() {
            return;
        }
        if self.year.take().is_some() {
            return;
        }
        self.course = None;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Choices for the current step; empty once notes are shown.
    pub fn options(&self) -> Vec<BrowseOption> {
        match self.step() {
            BrowseStep::SelectCourse => Course::ALL
                .iter()
                .map(|c| BrowseOption {
                    key: c.as_str(),
                    label: c.label(),
                })
                .collect(),
            BrowseStep::SelectYear => Year::ALL
                .iter()
                .map(|y| BrowseOption {
                    key: y.as_str(),
                    label: y.label(),
                })
                .collect(),
            BrowseStep::SelectSemester => Semester::ALL
                .iter()
                .map(|s| BrowseOption {
                    key: s.as_str(),
                    label: s.label(),
                })
                .collect(),
            BrowseStep::ViewNotes => Vec::new(),
        }
    }

    /// The notes for the chosen keys whose names contain the search term,
    /// ignoring case. `None` before all three keys are chosen.
    pub fn visible_notes(&self, tree: &NotesTree, placeholders: bool) -> Option<NoteListing> {
        let (Some(course), Some(year), Some(semester)) = (self.course, self.year, self.semester)
        else {
            return None;
        };

        let bucket = tree.bucket(course, year, semester);
        let (source, is_placeholder) = if bucket.is_empty() && placeholders {
            (placeholder_notes(course, year, semester), true)
        } else {
            (bucket.to_vec(), false)
        };

        // A blank term shows the whole bucket; any other term is matched as typed.
        let needle = self.search.to_lowercase();
        let unfiltered = needle.trim().is_empty();
        let notes = source
            .into_iter()
            .filter(|n| unfiltered || n.name.to_lowercase().contains(&needle))
            .collect();

        Some(NoteListing {
            notes,
            is_placeholder,
        })
    }
}

const PLACEHOLDER_TOPICS: [&str; 5] = [
    "Lecture Notes",
    "Course Outline",
    "Past Paper",
    "Tutorial Sheet",
    "Revision Guide",
];

/// Stand-in documents for a semester with no uploads. Same keys, same output.
pub fn placeholder_notes(course: Course, year: Year, semester: Semester) -> Vec<Note> {
    let base = (course as i64 + 1) * 10_000 + i64::from(year.number()) * 100
        + i64::from(semester.number()) * 10;

    PLACEHOLDER_TOPICS
        .iter()
        .enumerate()
        .map(|(i, topic)| {
            let id = base + i as i64;
            Note {
                id,
                name: format!(
                    "{} Y{}S{} {}",
                    course.code(),
                    year.number(),
                    semester.number(),
                    topic
                ),
                file_type: "PDF".to_string(),
                size: format!("{}.{} MB", 1 + (id % 4), id % 10),
                downloads: (id % 97) as u64,
                category: course,
                year,
                semester,
                source: NoteSource::Link {
                    url: "#".to_string(),
                },
            }
        })
        .collect()
}
