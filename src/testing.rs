//! Scripted remote service for controller and route tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::models::{ClothingItem, GeneratedOutfit, ImagePayload, SessionId};
use crate::service::{OutfitService, ServiceError};
use crate::session::Session;

// 1x1 PNG.
const TINY_PNG_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub(crate) fn tiny_png() -> ImagePayload {
    ImagePayload::new(base64::engine::general_purpose::STANDARD.decode(TINY_PNG_B64).unwrap())
}

pub(crate) fn item(id: &str, category: &str, color: &str) -> ClothingItem {
    ClothingItem {
        id: id.into(),
        image_data: TINY_PNG_B64.into(),
        category: category.into(),
        color: color.into(),
        style: "casual".into(),
        description: format!("{color} {category}"),
        created_at: None,
    }
}

#[derive(Default)]
pub(crate) struct ScriptedService {
    pub store: Mutex<Vec<ClothingItem>>,
    pub analyze_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub delete_calls: Mutex<Vec<String>>,
    pub generate_calls: Mutex<Vec<(String, Vec<String>)>>,
    pub fail_analyze: AtomicBool,
    pub fail_list: AtomicBool,
    pub fail_delete: AtomicBool,
    pub fail_generate: AtomicBool,
    analyze_gate: Option<Semaphore>,
    generate_gate: Option<Semaphore>,
}

impl ScriptedService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_items(items: Vec<ClothingItem>) -> Arc<Self> {
        let service = Self::default();
        *service.store.lock() = items;
        Arc::new(service)
    }

    /// Analysis requests stay in flight until
    /// [`release_analysis`](Self::release_analysis).
    pub fn holding_analysis() -> Arc<Self> {
        Arc::new(Self {
            analyze_gate: Some(Semaphore::new(0)),
            ..Self::default()
        })
    }

    /// Generation requests stay in flight until
    /// [`release_generation`](Self::release_generation).
    pub fn holding_generation(items: Vec<ClothingItem>) -> Arc<Self> {
        let service = Self {
            generate_gate: Some(Semaphore::new(0)),
            ..Self::default()
        };
        *service.store.lock() = items;
        Arc::new(service)
    }

    /// Both analysis and generation requests are held.
    pub fn holding_both(items: Vec<ClothingItem>) -> Arc<Self> {
        let service = Self {
            analyze_gate: Some(Semaphore::new(0)),
            generate_gate: Some(Semaphore::new(0)),
            ..Self::default()
        };
        *service.store.lock() = items;
        Arc::new(service)
    }

    pub fn release_analysis(&self) {
        if let Some(gate) = &self.analyze_gate {
            gate.add_permits(1);
        }
    }

    pub fn release_generation(&self) {
        if let Some(gate) = &self.generate_gate {
            gate.add_permits(1);
        }
    }

    pub fn generations(&self) -> Vec<(String, Vec<String>)> {
        self.generate_calls.lock().clone()
    }

    pub fn session(self: &Arc<Self>) -> Session {
        Session::new(self.clone())
    }

    fn unavailable() -> ServiceError {
        ServiceError::Status {
            status: 503,
            detail: "service unavailable".into(),
        }
    }
}

#[async_trait]
impl OutfitService for ScriptedService {
    async fn list_items(&self, _session: &SessionId) -> Result<Vec<ClothingItem>, ServiceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(self.store.lock().clone())
    }

    async fn analyze_item(
        &self,
        _session: &SessionId,
        image_base64: String,
    ) -> Result<ClothingItem, ServiceError> {
        let n = self.analyze_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(gate) = &self.analyze_gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.fail_analyze.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        let mut analyzed = item(&format!("item-{n}"), "shirt", "blue");
        analyzed.image_data = image_base64;
        self.store.lock().push(analyzed.clone());
        Ok(analyzed)
    }

    async fn delete_item(&self, item_id: &str, _session: &SessionId) -> Result<(), ServiceError> {
        self.delete_calls.lock().push(item_id.to_string());
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.store.lock().retain(|i| i.id != item_id);
        Ok(())
    }

    async fn generate_outfit(
        &self,
        _session: &SessionId,
        style: &str,
        item_ids: Vec<String>,
    ) -> Result<GeneratedOutfit, ServiceError> {
        let n = {
            let mut calls = self.generate_calls.lock();
            calls.push((style.to_string(), item_ids.clone()));
            calls.len()
        };
        if let Some(gate) = &self.generate_gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.fail_generate.load(Ordering::SeqCst) {
            return Err(ServiceError::Http("timed out".into()));
        }
        Ok(GeneratedOutfit {
            id: Some(format!("outfit-{n}")),
            description: format!("{style} look #{n}"),
            outfit_image: format!("image-{n}"),
            style: Some(style.to_string()),
            item_ids,
            created_at: None,
        })
    }

    async fn list_outfits(
        &self,
        _session: &SessionId,
    ) -> Result<Vec<GeneratedOutfit>, ServiceError> {
        Ok(Vec::new())
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// Yields to the runtime until `cond` holds for the session.
pub(crate) async fn wait_until(
    session: &Session,
    cond: impl Fn(&crate::workflow::WorkflowView) -> bool,
) {
    for _ in 0..1000 {
        if cond(&session.view()) {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never reached: {:?}", session.view());
}
