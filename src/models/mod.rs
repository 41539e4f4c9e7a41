//! Data models for the KYUCSA website content.
//!
//! Field names serialize in camelCase to match the JSON the site already keeps in storage.

mod content;
mod leadership;
mod note;
mod settings;

pub use content::*;
pub use leadership::*;
pub use note::*;
pub use settings::*;

use serde::{de::DeserializeOwned, Serialize};

pub const NOTES_KEY: &str = "kyucsa_notes";
pub const LEADERSHIP_KEY: &str = "kyucsa_leadership";

/// A record kept in a flat, id-addressed collection.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Storage key holding the whole collection
    const KEY: &'static str;
    /// Human-readable name used in messages
    const LABEL: &'static str;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
    /// The field an admin form must not leave blank.
    fn title(&self) -> &str;
}
