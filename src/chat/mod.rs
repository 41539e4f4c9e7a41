//! Canned-answer matcher behind the site's help chat.
//!
//! Lookup order: exact answer key, then the first keyword (in table order)
//! found in the message, then the default reply.

/// Answers keyed by the phrase that triggers them verbatim.
const ANSWERS: &[(&str, &str)] = &[
    (
        "hello",
        "Hello! Welcome to KYUCSA. Ask me about notes, events, leadership, membership or how to contact us.",
    ),
    (
        "hi",
        "Hi there! I can help you find course notes, upcoming events and information about the association.",
    ),
    (
        "contact",
        "You can reach KYUCSA at info@kyucsa.org, visit us at the Faculty of Computing and Information Science, Kyambogo University, or use the form on the Contact page.",
    ),
    (
        "notes",
        "Course notes are on the Notes page. Pick your course, then your year and semester to see and download the documents.",
    ),
    (
        "events",
        "Upcoming hackathons, seminars and tech talks are listed on the Events page. Registration links are on each event card.",
    ),
    (
        "leadership",
        "The current cabinet and past leaders are on the Leadership page, grouped by cabinet year.",
    ),
    (
        "membership",
        "Every student in BITC, BIS, BLIS or CS at Kyambogo University can join KYUCSA. Register at any association meeting or through the Contact page.",
    ),
    (
        "projects",
        "Student projects are showcased on the Home page. Want yours featured? Send the details through the Contact page.",
    ),
    (
        "about",
        "KYUCSA is the Kyambogo University Computing Students' Association, bringing together students of computing and information science.",
    ),
    (
        "thanks",
        "You're welcome! Let me know if there is anything else you need.",
    ),
];

/// Keyword to answer key. The first keyword contained in the message wins.
const KEYWORDS: &[(&str, &str)] = &[
    ("contact", "contact"),
    ("email", "contact"),
    ("phone", "contact"),
    ("location", "contact"),
    ("note", "notes"),
    ("past paper", "notes"),
    ("download", "notes"),
    ("material", "notes"),
    ("event", "events"),
    ("hackathon", "events"),
    ("seminar", "events"),
    ("leader", "leadership"),
    ("president", "leadership"),
    ("cabinet", "leadership"),
    ("join", "membership"),
    ("member", "membership"),
    ("register", "membership"),
    ("project", "projects"),
    ("about", "about"),
    ("kyucsa", "about"),
    ("thank", "thanks"),
    ("hello", "hello"),
    ("hey", "hello"),
];

pub const DEFAULT_REPLY: &str =
    "Sorry, I don't have an answer for that yet. Try asking about notes, events, leadership, membership or contact details.";

fn answer(key: &str) -> Option<&'static str> {
    ANSWERS.iter().find(|(k, _)| *k == key).map(|(_, a)| *a)
}

/// Reply to a chat message.
pub fn reply(message: &str) -> &'static str {
    let normalized = message.trim().to_lowercase();

    if let Some(exact) = answer(&normalized) {
        return exact;
    }

    KEYWORDS
        .iter()
        .find(|(keyword, _)| normalized.contains(keyword))
        .and_then(|(_, key)| answer(key))
        .unwrap_or(DEFAULT_REPLY)
}
