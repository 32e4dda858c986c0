use std::fmt;

use bytes::Bytes;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-session identity. Sent as `user_id` to the remote service and used as
/// the partition key for every call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClothingItem {
    pub id: String,
    #[serde(rename = "image_base64")]
    pub image_data: String,
    pub category: String, // tops, bottoms, shoes, ... (free-form)
    pub color: String,
    pub style: String,
    pub description: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeneratedOutfit {
    #[serde(default)]
    pub id: Option<String>,
    pub description: String,
    #[serde(rename = "outfit_image_base64")]
    pub outfit_image: String,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default, rename = "clothing_items")]
    pub item_ids: Vec<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnalyzeRequest {
    pub user_id: SessionId,
    pub image_base64: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutfitRequest {
    pub user_id: SessionId,
    pub style: String, // catalog identifier, e.g. "casual"
    pub clothing_items: Vec<String>,
}

/// Raw photo bytes as captured by the camera or picked from disk.
#[derive(Debug, Clone)]
pub struct ImagePayload(Bytes);

impl ImagePayload {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
