// Social data model
// Identities and the read-only records fetched from the provider API

use serde::{Serialize, Serializer};
use std::fmt;

/// Opaque identifier of the local user on whose behalf API calls are made
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self(user_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A Twitter user profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: String,
    pub screen_name: String,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub profile_image_url: Option<String>,
    pub url: Option<String>,
    pub followers_count: u64,
    pub friends_count: u64,
}

impl Profile {
    /// Profile carrying only a display name
    #[cfg(test)]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One page of a cursor-paginated collection
///
/// Serializes as the bare item sequence; the continuation cursor stays on the
/// Rust side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursoredList<T> {
    pub items: Vec<T>,
    /// Opaque token of the following page, `None` on the last page
    pub next_cursor: Option<String>,
}

impl<T> CursoredList<T> {
    pub const fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    pub const fn has_next(&self) -> bool {
        self.next_cursor.is_some()
    }
}

impl<T: Serialize> Serialize for CursoredList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cursored_list_serializes_as_items() {
        let page = CursoredList::new(
            vec![Profile::named("Bob"), Profile::named("Carol")],
            Some("7140dibdnow9c7btw3w29grvxfcgvpb9n9coehpk7xz5i".to_string()),
        );
        assert!(page.has_next());

        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["name"], "Carol");
    }

    #[test]
    fn test_last_page_has_no_next() {
        let page: CursoredList<Profile> = CursoredList::new(Vec::new(), None);
        assert!(!page.has_next());
        assert_eq!(serde_json::to_value(&page).unwrap(), json!([]));
    }
}
