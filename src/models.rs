//! Account, post and candidate types shared by the fetcher, gate and stores

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix used for numeric candidates in frontier keys
const ID_PREFIX: &str = "id:";

/// A reference to an account awaiting evaluation
///
/// Seeds usually arrive as handles; followers are only known by numeric ID
/// until their profile is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Candidate {
    Id(u64),
    Handle(String),
}

impl Candidate {
    /// Builds a handle candidate, stripping a leading `@` and surrounding whitespace
    pub fn handle(raw: &str) -> Self {
        Self::Handle(raw.trim().trim_start_matches('@').to_string())
    }

    /// The frontier key for this candidate
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Query parameter name and value used by the remote API
    pub fn query_param(&self) -> (&'static str, String) {
        match self {
            Self::Id(id) => ("user_id", id.to_string()),
            Self::Handle(handle) => ("screen_name", handle.clone()),
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}{}", ID_PREFIX, id),
            Self::Handle(handle) => write!(f, "{}", handle),
        }
    }
}

impl FromStr for Candidate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(id) = s.strip_prefix(ID_PREFIX) {
            return id
                .parse::<u64>()
                .map(Self::Id)
                .map_err(|_| format!("invalid numeric candidate '{}'", s));
        }

        let handle = s.trim_start_matches('@');
        if handle.is_empty() {
            return Err("empty handle".to_string());
        }
        if !handle.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(format!("invalid handle '{}'", s));
        }

        Ok(Self::Handle(handle.to_string()))
    }
}

/// Snapshot of a remote profile
///
/// Only the fields the crawl needs are typed; everything else rides along in
/// `raw` and is stored as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountRecord {
    pub id: u64,
    pub handle: String,
    pub protected: bool,
    pub raw: serde_json::Value,
}

impl AccountRecord {
    /// Parses a profile object as returned by the users endpoint
    pub fn from_json(raw: serde_json::Value) -> Option<Self> {
        let profile: ProfileFields = serde_json::from_value(raw.clone()).ok()?;
        Some(Self {
            id: profile.id,
            handle: profile.screen_name,
            protected: profile.protected,
            raw,
        })
    }
}

/// A single post with the identifier used for store-level dedup
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: String,
    pub account_id: Option<u64>,
    pub text: String,
    pub raw: serde_json::Value,
}

impl Post {
    /// Parses a post object as returned by the timeline endpoint
    ///
    /// Extended posts carry their body in `full_text`; older payloads use `text`.
    pub fn from_json(raw: serde_json::Value) -> Option<Self> {
        let fields: PostFields = serde_json::from_value(raw.clone()).ok()?;
        let id = fields
            .id_str
            .or_else(|| fields.id.map(|id| id.to_string()))?;
        let text = fields.full_text.or(fields.text).unwrap_or_default();

        Some(Self {
            id,
            account_id: fields.user.map(|u| u.id),
            text,
            raw,
        })
    }
}

/// Posts of one account, in the order the API returned them
pub type PostBatch = Vec<Post>;

#[derive(Debug, Deserialize, Serialize)]
struct ProfileFields {
    id: u64,
    screen_name: String,
    #[serde(default)]
    protected: bool,
}

#[derive(Debug, Deserialize)]
struct PostFields {
    id: Option<u64>,
    id_str: Option<String>,
    text: Option<String>,
    full_text: Option<String>,
    user: Option<PostAuthor>,
}

#[derive(Debug, Deserialize)]
struct PostAuthor {
    id: u64,
}
