//! Raw shape of the `malappinfo.php` list export.
//!
//! Every field is kept as text; interpretation happens in the parser so that
//! malformed values can be handled field by field.

use serde::Deserialize;

/// Root `<myanimelist>` element
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListDocument {
    #[serde(rename = "anime", default)]
    pub entries: Vec<UserListEntry>,
}

/// One `<anime>` element of a user's list
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserListEntry {
    #[serde(default)]
    pub series_animedb_id: Option<String>,
    #[serde(default)]
    pub series_title: Option<String>,
    #[serde(default)]
    pub my_watched_episodes: Option<String>,
    #[serde(default)]
    pub my_start_date: Option<String>,
    #[serde(default)]
    pub my_finish_date: Option<String>,
    #[serde(default)]
    pub my_status: Option<String>,
    #[serde(default)]
    pub my_tags: Option<String>,
}

impl UserListEntry {
    /// Title of the series, empty when the element is missing
    pub fn title(&self) -> &str {
        self.series_title.as_deref().unwrap_or_default()
    }
}

impl UserListDocument {
    /// Deserialize a list export
    pub fn from_xml(content: &str) -> Result<Self, quick_xml::DeError> {
        quick_xml::de::from_str(content)
    }
}
