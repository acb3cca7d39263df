use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short link as stored in the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub slug: String,
    pub url: String,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Link {
    /// Hash field names used for the link record
    pub const FIELD_URL: &'static str = "url";
    pub const FIELD_CLICKS: &'static str = "clicks";
    pub const FIELD_CREATED_AT: &'static str = "created_at";

    pub fn new(slug: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            url: url.into(),
            clicks: 0,
            created_at: Some(Utc::now()),
        }
    }

    pub(crate) fn to_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            (Self::FIELD_URL, self.url.clone()),
            (Self::FIELD_CLICKS, self.clicks.to_string()),
        ];
        if let Some(created_at) = self.created_at {
            fields.push((Self::FIELD_CREATED_AT, created_at.to_rfc3339()));
        }
        fields
    }
}

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} has {} clicks", self.slug, self.url, self.clicks)
    }
}
