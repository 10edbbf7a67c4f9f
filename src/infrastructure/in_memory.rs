use crate::domain::document::DocumentReference;
use crate::domain::ports::{ContactsPicker, DocumentPicker, NavigationHost, Permission, PickOutcome};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A document picker that replays queued outcomes.
///
/// Uses `Arc<RwLock<VecDeque<PickOutcome>>>` so the CLI and tests can queue
/// the next pick while the engine holds a shared handle. An empty queue
/// behaves like the user dismissing the picker.
#[derive(Default, Clone)]
pub struct ScriptedDocumentPicker {
    queue: Arc<RwLock<VecDeque<PickOutcome>>>,
}

impl ScriptedDocumentPicker {
    /// Creates a picker with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, outcome: PickOutcome) {
        self.queue.write().await.push_back(outcome);
    }

    pub async fn push_file(&self, doc: DocumentReference) {
        self.push(PickOutcome::Picked(doc)).await;
    }

    /// Drops anything still queued.
    pub async fn clear(&self) {
        self.queue.write().await.clear();
    }
}

#[async_trait]
impl DocumentPicker for ScriptedDocumentPicker {
    async fn pick(&self, _allowed_extensions: &[&str]) -> PickOutcome {
        self.queue
            .write()
            .await
            .pop_front()
            .unwrap_or(PickOutcome::Cancelled)
    }
}

/// A contacts book with a fixed permission answer and number list.
#[derive(Clone)]
pub struct StaticContactsPicker {
    permission: Permission,
    numbers: Arc<RwLock<Vec<String>>>,
}

impl StaticContactsPicker {
    pub fn new(permission: Permission, numbers: Vec<String>) -> Self {
        Self {
            permission,
            numbers: Arc::new(RwLock::new(numbers)),
        }
    }

    pub async fn set_numbers(&self, numbers: Vec<String>) {
        *self.numbers.write().await = numbers;
    }
}

impl Default for StaticContactsPicker {
    fn default() -> Self {
        Self::new(Permission::Granted, Vec::new())
    }
}

#[async_trait]
impl ContactsPicker for StaticContactsPicker {
    async fn request_permission(&self) -> Permission {
        self.permission
    }

    async fn phone_numbers(&self) -> Vec<String> {
        self.numbers.read().await.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    Back,
    Push(String),
    Replace(String),
}

/// Records navigation requests instead of performing them.
#[derive(Debug, Default, Clone)]
pub struct RecordingNavigator {
    pub events: Vec<NavEvent>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NavigationHost for RecordingNavigator {
    fn back(&mut self) {
        self.events.push(NavEvent::Back);
    }

    fn push(&mut self, route: &str) {
        self.events.push(NavEvent::Push(route.to_string()));
    }

    fn replace(&mut self, route: &str) {
        self.events.push(NavEvent::Replace(route.to_string()));
    }
}
