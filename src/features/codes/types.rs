use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};

/// Opaque invite code identifier. The server sends numbers; strings are
/// accepted as well and both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CodeId(String);

impl CodeId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for CodeId {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

impl From<u64> for CodeId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for CodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(number) => Ok(Self(number.to_string())),
            Value::String(text) if !text.trim().is_empty() => Ok(Self(text)),
            other => Err(de::Error::custom(format!(
                "expected a number or non-empty string id, got {other}"
            ))),
        }
    }
}

/// Deserialize ISO-8601 timestamps with or without an offset. Offset-less
/// values are taken as UTC.
fn timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    parse_timestamp(&raw).map(Some).map_err(de::Error::custom)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|err| format!("invalid timestamp {raw:?}: {err}"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteCode {
    pub id: CodeId,
    pub code: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub batch_id: Option<String>,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<String>,
}

fn default_active() -> bool {
    true
}

impl InviteCode {
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.active {
            "active"
        } else {
            "disabled"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    #[serde(default)]
    pub id: Option<CodeId>,
    #[serde(default)]
    pub invite_code: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default, deserialize_with = "timestamp")]
    pub used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub count: u32,
    pub description: String,
}

/// Column the code listing is ordered by. Only persisted columns sort;
/// `usageCount` is derived server-side and is not offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Code,
    Active,
    BatchId,
    CreatedAt,
    CreatedBy,
}

impl SortField {
    pub const ALL: [Self; 6] = [
        Self::Id,
        Self::Code,
        Self::Active,
        Self::BatchId,
        Self::CreatedAt,
        Self::CreatedBy,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Code => "code",
            Self::Active => "isActive",
            Self::BatchId => "batchId",
            Self::CreatedAt => "createdAt",
            Self::CreatedBy => "createdBy",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "id" => Ok(Self::Id),
            "code" => Ok(Self::Code),
            "active" | "isActive" => Ok(Self::Active),
            "batchId" | "batch-id" => Ok(Self::BatchId),
            "createdAt" | "created-at" => Ok(Self::CreatedAt),
            "createdBy" | "created-by" => Ok(Self::CreatedBy),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page, size and ordering of a code listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeQuery {
    pub page: u32,
    pub size: u32,
    pub sort_by: SortField,
    pub direction: SortDirection,
}

impl Default for CodeQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort_by: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl CodeQuery {
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sortBy", self.sort_by.as_str().to_string()),
            ("direction", self.direction.as_str().to_string()),
        ]
    }
}

/// Page and size of a usage record listing. The server orders by `usedAt`
/// descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageQuery {
    pub page: u32,
    pub size: u32,
}

impl Default for UsageQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl UsageQuery {
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
        ]
    }
}
