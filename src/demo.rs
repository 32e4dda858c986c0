use std::collections::HashMap;

use async_trait::async_trait;
use base64::Engine;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::catalog::StyleId;
use crate::models::{ClothingItem, GeneratedOutfit, SessionId};
use crate::service::{OutfitService, ServiceError};

/// In-process stand-in for the wardrobe backend, used when no service URL is
/// configured. Items live in memory per session; generation renders an SVG
/// placeholder instead of calling an image model.
#[derive(Default)]
pub struct DemoOutfitService {
    items: RwLock<HashMap<SessionId, Vec<ClothingItem>>>,
    outfits: RwLock<HashMap<SessionId, Vec<GeneratedOutfit>>>,
}

impl DemoOutfitService {
    pub fn new() -> Self {
        Self::default()
    }

    fn placeholder_image(style: &str, item_count: usize) -> String {
        let style_colors = [
            "#3B82F6", "#EF4444", "#10B981", "#F59E0B", "#8B5CF6", "#EC4899", "#14B8A6",
        ];
        let (color, title) = match style.parse::<StyleId>() {
            Ok(id) => (style_colors[id as usize], id.category().name),
            Err(_) => (style_colors[0], "Outfit"),
        };

        let svg = format!(r#"<svg width="400" height="500" xmlns="http://www.w3.org/2000/svg">
            <defs>
                <linearGradient id="grad" x1="0%" y1="0%" x2="100%" y2="100%">
                    <stop offset="0%" style="stop-color:{color};stop-opacity:1" />
                    <stop offset="100%" style="stop-color:{color};stop-opacity:0.6" />
                </linearGradient>
            </defs>
            <rect width="400" height="500" fill="url(#grad)" />
            <text x="200" y="240" font-family="Arial, sans-serif" font-size="28" font-weight="bold"
                  text-anchor="middle" fill="white">{title} look</text>
            <text x="200" y="280" font-family="Arial, sans-serif" font-size="14"
                  text-anchor="middle" fill="white" opacity="0.8">{item_count} pieces from your wardrobe</text>
        </svg>"#);

        base64::engine::general_purpose::STANDARD.encode(svg.as_bytes())
    }
}

#[async_trait]
impl OutfitService for DemoOutfitService {
    async fn list_items(&self, session: &SessionId) -> Result<Vec<ClothingItem>, ServiceError> {
        Ok(self.items.read().get(session).cloned().unwrap_or_default())
    }

    async fn analyze_item(
        &self,
        session: &SessionId,
        image_base64: String,
    ) -> Result<ClothingItem, ServiceError> {
        info!("Using demo mode - returning canned analysis");
        let item = ClothingItem {
            id: Uuid::new_v4().to_string(),
            image_data: image_base64,
            category: "tops".into(),
            color: "blue".into(),
            style: "casual".into(),
            description: "A casual blue shirt perfect for everyday wear".into(),
            created_at: Some(Utc::now().naive_utc()),
        };
        self.items.write().entry(session.clone()).or_default().push(item.clone());
        Ok(item)
    }

    async fn delete_item(&self, item_id: &str, session: &SessionId) -> Result<(), ServiceError> {
        if let Some(items) = self.items.write().get_mut(session) {
            items.retain(|i| i.id != item_id);
        }
        Ok(())
    }

    async fn generate_outfit(
        &self,
        session: &SessionId,
        style: &str,
        item_ids: Vec<String>,
    ) -> Result<GeneratedOutfit, ServiceError> {
        let selected: Vec<ClothingItem> = {
            let guard = self.items.read();
            let owned = guard.get(session).map(Vec::as_slice).unwrap_or_default();
            item_ids
                .iter()
                .filter_map(|id| owned.iter().find(|i| &i.id == id).cloned())
                .collect()
        };
        if selected.is_empty() {
            return Err(ServiceError::NotFound("No clothing items found".into()));
        }

        let pieces: Vec<&str> = selected.iter().map(|i| i.description.as_str()).collect();
        let outfit = GeneratedOutfit {
            id: Some(Uuid::new_v4().to_string()),
            description: format!(
                "A {} outfit featuring {} items: {}",
                style,
                selected.len(),
                pieces.join(", ")
            ),
            outfit_image: Self::placeholder_image(style, selected.len()),
            style: Some(style.to_string()),
            item_ids,
            created_at: Some(Utc::now().naive_utc()),
        };
        info!("📦 Generated demo outfit for session {}", session);
        self.outfits.write().entry(session.clone()).or_default().push(outfit.clone());
        Ok(outfit)
    }

    async fn list_outfits(
        &self,
        session: &SessionId,
    ) -> Result<Vec<GeneratedOutfit>, ServiceError> {
        Ok(self.outfits.read().get(session).cloned().unwrap_or_default())
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn analyzed_items_are_scoped_to_their_session() {
        let service = DemoOutfitService::new();
        let alice = SessionId::from("alice".to_string());
        let bob = SessionId::from("bob".to_string());

        let item = service.analyze_item(&alice, "aGVsbG8=".into()).await.unwrap();
        assert_eq!(item.image_data, "aGVsbG8=");
        assert_eq!(service.list_items(&alice).await.unwrap().len(), 1);
        assert!(service.list_items(&bob).await.unwrap().is_empty());

        service.delete_item(&item.id, &alice).await.unwrap();
        assert!(service.list_items(&alice).await.unwrap().is_empty());
        // Second delete of the same id is fine.
        service.delete_item(&item.id, &alice).await.unwrap();
    }

    #[tokio::test]
    async fn generation_describes_items_and_records_history() {
        let service = DemoOutfitService::new();
        let session = SessionId::generate();
        let item = service.analyze_item(&session, "aGVsbG8=".into()).await.unwrap();

        let outfit = service
            .generate_outfit(&session, "party", vec![item.id.clone()])
            .await
            .unwrap();
        assert!(outfit.description.starts_with("A party outfit featuring 1 items"));
        assert_eq!(outfit.item_ids, vec![item.id]);
        assert!(!outfit.outfit_image.is_empty());
        assert_eq!(service.list_outfits(&session).await.unwrap(), vec![outfit]);
    }

    #[tokio::test]
    async fn generation_without_known_items_fails() {
        let service = DemoOutfitService::new();
        let err = service
            .generate_outfit(&SessionId::generate(), "casual", vec!["missing".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
