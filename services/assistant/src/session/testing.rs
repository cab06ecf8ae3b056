//! Stub collaborators shared by the session tests.

use crate::adapters::{consent_store::MemoryConsentStore, style::StyleSheet};
use crate::session::{
    consent::ConsentGate,
    controller::{SessionController, SessionOptions},
};
use async_trait::async_trait;
use sena_core::{PortError, PortResult, ResponseResolver, SpeechCapability};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

pub fn test_options() -> SessionOptions {
    SessionOptions {
        auto_read_delay: Duration::from_millis(10),
        ..Default::default()
    }
}

/// A session whose consent has already been given.
pub async fn active_controller(
    resolver: Arc<dyn ResponseResolver>,
) -> (SessionController, Arc<StyleSheet>) {
    let gate = ConsentGate::load(Arc::new(MemoryConsentStore::new())).await;
    gate.accept().await.unwrap();
    let sheet = Arc::new(StyleSheet::new());
    let controller = SessionController::new(gate, resolver, sheet.clone(), test_options());
    (controller, sheet)
}

pub async fn gated_controller() -> SessionController {
    let gate = ConsentGate::load(Arc::new(MemoryConsentStore::new())).await;
    SessionController::new(
        gate,
        Arc::new(FixedResolver::new("x")),
        Arc::new(StyleSheet::new()),
        test_options(),
    )
}

//=========================================================================================
// Speech
//=========================================================================================

#[derive(Default)]
pub struct RecordingSpeech {
    spoken: Mutex<Vec<String>>,
}

/// Keeps the capability alive for as long as the test holds it.
pub struct SpeechHandle {
    recorder: Arc<RecordingSpeech>,
    _capability: Arc<dyn SpeechCapability>,
}

impl SpeechHandle {
    pub fn spoken(&self) -> Vec<String> {
        self.recorder.spoken.lock().unwrap().clone()
    }
}

impl RecordingSpeech {
    pub fn register(controller: &SessionController) -> SpeechHandle {
        let recorder = Arc::new(RecordingSpeech::default());
        let capability: Arc<dyn SpeechCapability> = recorder.clone();
        controller.speech().register(&capability);
        SpeechHandle {
            recorder,
            _capability: capability,
        }
    }
}

impl SpeechCapability for RecordingSpeech {
    fn speak(&self, text: &str) -> PortResult<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

//=========================================================================================
// Resolvers
//=========================================================================================

pub struct FixedResolver {
    reply: String,
}

impl FixedResolver {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
        }
    }
}

#[async_trait]
impl ResponseResolver for FixedResolver {
    async fn resolve(&self, _action_id: &str, _utterance: Option<&str>) -> PortResult<String> {
        Ok(self.reply.clone())
    }
}

pub struct FailingResolver;

#[async_trait]
impl ResponseResolver for FailingResolver {
    async fn resolve(&self, _action_id: &str, _utterance: Option<&str>) -> PortResult<String> {
        Err(PortError::Unavailable("resolver offline".to_string()))
    }
}

pub struct PanickingResolver;

#[async_trait]
impl ResponseResolver for PanickingResolver {
    async fn resolve(&self, _action_id: &str, _utterance: Option<&str>) -> PortResult<String> {
        panic!("resolver blew up");
    }
}

#[derive(Default)]
pub struct RecordingResolver {
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl RecordingResolver {
    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResponseResolver for RecordingResolver {
    async fn resolve(&self, action_id: &str, utterance: Option<&str>) -> PortResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((action_id.to_string(), utterance.map(str::to_string)));
        Ok("ok".to_string())
    }
}

/// Holds every call open until the test releases it, oldest first.
#[derive(Default)]
pub struct PendingResolver {
    pending: Mutex<VecDeque<oneshot::Sender<PortResult<String>>>>,
}

impl PendingResolver {
    pub fn release(&self, result: PortResult<String>) {
        let sender = self
            .pending
            .lock()
            .unwrap()
            .pop_front()
            .expect("no pending resolution to release");
        let _ = sender.send(result);
    }

    pub async fn wait_for_calls(&self, count: usize) {
        while self.pending.lock().unwrap().len() < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl ResponseResolver for PendingResolver {
    async fn resolve(&self, _action_id: &str, _utterance: Option<&str>) -> PortResult<String> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().push_back(tx);
        rx.await
            .map_err(|_| PortError::Unexpected("released without a result".to_string()))?
    }
}
