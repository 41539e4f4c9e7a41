//! Flat content records edited from the admin dashboard.

use serde::{Deserialize, Serialize};

use super::Record;

/// A student project showcased on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub team: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
}

/// A tutorial or mentorship session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub venue: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facilitator: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
}

/// An association event (hackathon, seminar, trip).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_link: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// A short notice shown in the home page ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub date: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// An organisation partnering with the association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// Official message from the president, shown on the about page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresidentMessage {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cabinet_year: Option<String>,
}

fn default_true() -> bool {
    true
}

macro_rules! impl_record {
    ($ty:ty, $key:literal, $label:literal, $field:ident) => {
        impl Record for $ty {
            const KEY: &'static str = $key;
            const LABEL: &'static str = $label;

            fn id(&self) -> i64 {
                self.id
            }

            fn set_id(&mut self, id: i64) {
                self.id = id;
            }

            fn title(&self) -> &str {
                &self.$field
            }
        }
    };
}

impl_record!(Project, "kyucsa_projects", "Project", title);
impl_record!(Session, "kyucsa_sessions", "Session", title);
impl_record!(Event, "kyucsa_events", "Event", title);
impl_record!(Announcement, "kyucsa_announcements", "Announcement", title);
impl_record!(Partner, "kyucsa_partners", "Partner", name);
impl_record!(PresidentMessage, "kyucsa_messages", "Message", name);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_defaults_from_minimal_json() {
        let project: Project = serde_json::from_value(serde_json::json!({
            "title": "Campus Navigator"
        }))
        .unwrap();

        assert_eq!(project.id, 0);
        assert!(project.technologies.is_empty());
        assert!(project.github_url.is_none());
        assert_eq!(project.title(), "Campus Navigator");
    }

    #[test]
    fn test_announcement_active_by_default() {
        let a: Announcement = serde_json::from_value(serde_json::json!({
            "title": "Exam timetable out"
        }))
        .unwrap();
        assert!(a.active);
    }

    #[test]
    fn test_camel_case_fields() {
        let event = Event {
            id: 5,
            title: "Hackathon".to_string(),
            description: String::new(),
            date: "2025-03-14".to_string(),
            location: "Main Hall".to_string(),
            image: None,
            registration_link: Some("https://forms.example.org/hack".to_string()),
            highlights: vec!["48 hours".to_string()],
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["registrationLink"], "https://forms.example.org/hack");
        assert!(value.get("image").is_none());
    }

    #[test]
    fn test_collection_keys() {
        assert_eq!(Project::KEY, "kyucsa_projects");
        assert_eq!(Session::KEY, "kyucsa_sessions");
        assert_eq!(Event::KEY, "kyucsa_events");
        assert_eq!(Partner::LABEL, "Partner");
    }
}
