use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::models::{AnalyzeRequest, ClothingItem, GeneratedOutfit, OutfitRequest, SessionId};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("service returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("decode error: {0}")]
    Decode(String),
}

/// The remote analysis, generation and item store collaborators.
#[async_trait]
pub trait OutfitService: Send + Sync {
    async fn list_items(&self, session: &SessionId) -> Result<Vec<ClothingItem>, ServiceError>;

    async fn analyze_item(
        &self,
        session: &SessionId,
        image_base64: String,
    ) -> Result<ClothingItem, ServiceError>;

    /// Deleting an id the store no longer has is not an error.
    async fn delete_item(&self, item_id: &str, session: &SessionId) -> Result<(), ServiceError>;

    async fn generate_outfit(
        &self,
        session: &SessionId,
        style: &str,
        item_ids: Vec<String>,
    ) -> Result<GeneratedOutfit, ServiceError>;

    async fn list_outfits(
        &self,
        session: &SessionId,
    ) -> Result<Vec<GeneratedOutfit>, ServiceError>;

    async fn ping(&self) -> Result<(), ServiceError>;
}

// Shortens base64 blobs so they can go into log lines.
pub(crate) fn preview(data: &str) -> String {
    if data.len() > 50 {
        format!("{}...[{} chars total]", &data[..50], data.len())
    } else {
        data.to_string()
    }
}

/// Talks to the wardrobe backend over its JSON API.
pub struct HttpOutfitService {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

impl HttpOutfitService {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        // No request timeout: generation can legitimately take about a minute.
        Self { client: Client::new(), base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn check(response: Response) -> Result<Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.detail)
            .unwrap_or(body);
        error!("❌ Service error response {}: {}", status, detail);
        if status == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound(detail));
        }
        Err(ServiceError::Status { status: status.as_u16(), detail })
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
        let text = Self::check(response)
            .await?
            .text()
            .await
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl OutfitService for HttpOutfitService {
    async fn list_items(&self, session: &SessionId) -> Result<Vec<ClothingItem>, ServiceError> {
        let response = self
            .client
            .get(self.url(&format!("clothing/{}", session)))
            .send()
            .await
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        let items: Vec<ClothingItem> = Self::read_json(response).await?;
        info!("📥 Loaded {} clothing items for session {}", items.len(), session);
        Ok(items)
    }

    async fn analyze_item(
        &self,
        session: &SessionId,
        image_base64: String,
    ) -> Result<ClothingItem, ServiceError> {
        info!("📤 Submitting photo for analysis: {}", preview(&image_base64));
        let body = AnalyzeRequest { user_id: session.clone(), image_base64 };
        let response = self
            .client
            .post(self.url("clothing/analyze"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        let item: ClothingItem = Self::read_json(response).await?;
        info!("✅ Analyzed item {} ({} {})", item.id, item.color, item.category);
        Ok(item)
    }

    async fn delete_item(&self, item_id: &str, session: &SessionId) -> Result<(), ServiceError> {
        let response = self
            .client
            .delete(self.url(&format!("clothing/{}", item_id)))
            .query(&[("user_id", session.as_str())])
            .send()
            .await
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        match Self::check(response).await {
            Ok(_) => Ok(()),
            Err(ServiceError::NotFound(detail)) => {
                warn!("Item {} already gone from the store: {}", item_id, detail);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn generate_outfit(
        &self,
        session: &SessionId,
        style: &str,
        item_ids: Vec<String>,
    ) -> Result<GeneratedOutfit, ServiceError> {
        info!("🎯 Requesting {} outfit from {} items", style, item_ids.len());
        let body = OutfitRequest {
            user_id: session.clone(),
            style: style.to_string(),
            clothing_items: item_ids,
        };
        let response = self
            .client
            .post(self.url("outfit/generate"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        let outfit: GeneratedOutfit = Self::read_json(response).await?;
        info!("🖼️ Outfit generated: {}", preview(&outfit.outfit_image));
        Ok(outfit)
    }

    async fn list_outfits(
        &self,
        session: &SessionId,
    ) -> Result<Vec<GeneratedOutfit>, ServiceError> {
        let response = self
            .client
            .get(self.url(&format!("outfit/{}", session)))
            .send()
            .await
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        let response = self
            .client
            .get(self.url(""))
            .send()
            .await
            .map_err(|e| ServiceError::Http(e.to_string()))?;
        Self::check(response).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let service = HttpOutfitService::new("http://localhost:8001/");
        assert_eq!(service.url("clothing/analyze"), "http://localhost:8001/api/clothing/analyze");
    }

    #[test]
    fn preview_truncates_long_payloads() {
        let long = "A".repeat(120);
        assert_eq!(preview(&long), format!("{}...[120 chars total]", "A".repeat(50)));
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn wire_item_maps_base64_field() {
        let json = r#"{
            "id": "abc",
            "user_id": "u1",
            "image_base64": "iVBORw0KGgo=",
            "category": "tops",
            "color": "blue",
            "style": "casual",
            "description": "A casual blue shirt",
            "created_at": "2025-01-02T03:04:05.123456"
        }"#;
        let item: ClothingItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.image_data, "iVBORw0KGgo=");
        assert!(item.created_at.is_some());
    }

    #[test]
    fn wire_outfit_tolerates_missing_optional_fields() {
        let json = r#"{"description": "d", "outfit_image_base64": "xyz"}"#;
        let outfit: GeneratedOutfit = serde_json::from_str(json).unwrap();
        assert_eq!(outfit.outfit_image, "xyz");
        assert!(outfit.item_ids.is_empty());
    }
}
