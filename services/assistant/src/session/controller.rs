//! services/assistant/src/session/controller.rs
//!
//! The session orchestration controller. It owns the conversation log, the
//! accessibility settings and the transient UI flags, and mediates every
//! side effect (styling, speech) those produce.

use crate::session::{
    consent::{ConsentGate, GateState},
    effects::SettingsApplier,
    error::SessionError,
    events::SessionEvent,
    message_log::MessageLog,
    phrases,
    speech::SpeechRegistry,
};
use sena_core::{
    container_classes, AccessibilitySettings, Message, MessageId, Panel, QuickAction,
    ResponseResolver, ScrollBehavior, SessionUiState, SettingsPatch, SpeechCapability,
    StyleEnvironment, QUICK_ACTIONS,
};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Deferral between appending a bot message and auto-reading it.
pub const DEFAULT_AUTO_READ_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub auto_read_delay: Duration,
    /// Buffered events per subscriber before slow receivers start lagging.
    pub event_capacity: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            auto_read_delay: DEFAULT_AUTO_READ_DELAY,
            event_capacity: 64,
        }
    }
}

/// Everything the presentation layer needs to render the session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub consent_accepted: bool,
    pub messages: Vec<Message>,
    pub settings: AccessibilitySettings,
    pub ui: SessionUiState,
    pub quick_actions_visible: bool,
    pub quick_actions: &'static [QuickAction],
    pub container_classes: Vec<&'static str>,
    pub scroll_behavior: ScrollBehavior,
    pub speech_registered: bool,
}

pub(super) struct SessionState {
    pub(super) log: MessageLog,
    pub(super) settings: AccessibilitySettings,
    pub(super) ui: SessionUiState,
    /// Resolutions currently awaiting the resolver.
    pub(super) in_flight: usize,
}

pub struct SessionController {
    state: Mutex<SessionState>,
    consent: ConsentGate,
    pub(super) resolver: Arc<dyn ResponseResolver>,
    pub(super) speech: SpeechRegistry,
    applier: SettingsApplier,
    events: broadcast::Sender<SessionEvent>,
    options: SessionOptions,
}

impl SessionController {
    /// Builds a fresh session and applies the default settings once.
    pub fn new(
        consent: ConsentGate,
        resolver: Arc<dyn ResponseResolver>,
        environment: Arc<dyn StyleEnvironment>,
        options: SessionOptions,
    ) -> Self {
        let settings = AccessibilitySettings::default();
        let applier = SettingsApplier::new(environment);
        applier.apply(&settings);

        let (events, _) = broadcast::channel(options.event_capacity.max(1));

        Self {
            state: Mutex::new(SessionState {
                log: MessageLog::with_greeting(phrases::INITIAL_GREETING),
                settings,
                ui: SessionUiState::default(),
                in_flight: 0,
            }),
            consent,
            resolver,
            speech: SpeechRegistry::new(),
            applier,
            events,
            options,
        }
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(super) fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn speech(&self) -> &SpeechRegistry {
        &self.speech
    }

    //=====================================================================================
    // Consent
    //=====================================================================================

    pub fn consent_state(&self) -> GateState {
        self.consent.state()
    }

    pub fn is_consent_accepted(&self) -> bool {
        self.consent.is_accepted()
    }

    pub(super) fn ensure_active(&self) -> Result<(), SessionError> {
        if self.consent.is_accepted() {
            Ok(())
        } else {
            Err(SessionError::ConsentRequired)
        }
    }

    /// Accepts the terms, unlocking the conversation for the rest of the session.
    pub async fn accept_consent(&self) {
        if self.consent.is_accepted() {
            return;
        }
        if let Err(e) = self.consent.accept().await {
            warn!(error = %e, "Consent flag could not be persisted; it will be asked again next time.");
        }
        self.emit(SessionEvent::ConsentAccepted);
    }

    //=====================================================================================
    // Reads
    //=====================================================================================

    pub fn messages(&self) -> Vec<Message> {
        self.lock().log.messages().to_vec()
    }

    pub fn settings(&self) -> AccessibilitySettings {
        self.lock().settings
    }

    pub fn ui(&self) -> SessionUiState {
        self.lock().ui
    }

    pub fn is_typing(&self) -> bool {
        self.lock().ui.is_typing
    }

    /// Quick actions are offered only on a fresh conversation with no reply pending.
    pub fn quick_actions_visible(&self) -> bool {
        let state = self.lock();
        !state.ui.is_typing && state.log.len() == 1
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            consent_accepted: self.consent.is_accepted(),
            messages: state.log.messages().to_vec(),
            settings: state.settings,
            ui: state.ui,
            quick_actions_visible: !state.ui.is_typing && state.log.len() == 1,
            quick_actions: QUICK_ACTIONS,
            container_classes: container_classes(&state.settings, state.ui.is_dark_mode),
            scroll_behavior: ScrollBehavior::for_settings(&state.settings),
            speech_registered: self.speech.is_registered(),
        }
    }

    //=====================================================================================
    // Message Log
    //=====================================================================================

    /// Appends a message to the log.
    ///
    /// Bot messages are read aloud after a short deferral when auto-read is
    /// enabled and a speech capability is registered, so the log update is
    /// observed before speech starts.
    pub fn append(&self, text: impl Into<String>, is_bot: bool) -> MessageId {
        let (message, settings) = {
            let mut state = self.lock();
            let message = state.log.append(text, is_bot).clone();
            (message, state.settings)
        };
        let id = message.id;

        if is_bot && settings.auto_read_messages && self.speech.is_registered() {
            self.schedule_speech(message.text.clone());
        }
        self.emit(SessionEvent::MessageAppended(message));
        id
    }

    fn schedule_speech(&self, text: String) {
        let speech = self.speech.clone();
        let delay = self.options.auto_read_delay;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    speech.invoke(&text);
                });
            }
            Err(_) => {
                debug!("No async runtime available; reading message immediately.");
                speech.invoke(&text);
            }
        }
    }

    /// Starts a new conversation, replacing the log with a single greeting.
    pub fn reset_conversation(&self) -> Result<(), SessionError> {
        self.ensure_active()?;
        let (messages, tts_enabled) = {
            let mut state = self.lock();
            state.log.reset(phrases::RESET_GREETING);
            (state.log.messages().to_vec(), state.settings.tts_enabled)
        };
        info!("Conversation reset.");
        self.emit(SessionEvent::ConversationReset(messages));

        if tts_enabled {
            self.speech.invoke(phrases::CONVERSATION_RESET_ANNOUNCEMENT);
        }
        Ok(())
    }

    /// Makes `capability` the session's speech engine, replacing any previous one.
    pub fn register_speech(&self, capability: &Arc<dyn SpeechCapability>) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.speech.register(capability);
        Ok(())
    }

    pub fn unregister_speech(&self) -> Result<(), SessionError> {
        self.ensure_active()?;
        self.speech.unregister();
        Ok(())
    }

    /// Reads an existing message aloud. Returns whether anything was spoken.
    pub fn speak_message(&self, id: MessageId) -> Result<bool, SessionError> {
        self.ensure_active()?;
        let text = self.lock().log.get(id).map(|m| m.text.clone());
        Ok(text.is_some_and(|text| self.speech.invoke(&text)))
    }

    //=====================================================================================
    // Settings
    //=====================================================================================

    /// Derives the next settings from `patch` and re-applies every effect.
    pub fn update_settings(&self, patch: SettingsPatch) -> Result<AccessibilitySettings, SessionError> {
        self.ensure_active()?;
        let next = {
            let mut state = self.lock();
            let next = state.settings.apply(&patch);
            state.settings = next;
            // Applied under the lock so the environment follows settings order.
            self.applier.apply(&next);
            next
        };
        self.emit(SessionEvent::SettingsChanged(next));
        Ok(next)
    }

    /// Flips text-to-speech and announces the new state whenever speech is available.
    pub fn toggle_tts(&self) -> Result<bool, SessionError> {
        self.ensure_active()?;
        let enabled = !self.settings().tts_enabled;
        self.update_settings(SettingsPatch {
            tts_enabled: Some(enabled),
            ..Default::default()
        })?;

        self.speech
            .invoke(if enabled { phrases::TTS_ON } else { phrases::TTS_OFF });
        Ok(enabled)
    }

    pub fn toggle_dark_mode(&self) -> Result<bool, SessionError> {
        self.ensure_active()?;
        let (ui, tts_enabled) = {
            let mut state = self.lock();
            state.ui.is_dark_mode = !state.ui.is_dark_mode;
            self.applier.apply_dark_mode(state.ui.is_dark_mode);
            (state.ui, state.settings.tts_enabled)
        };
        self.emit(SessionEvent::UiChanged(ui));

        if tts_enabled {
            self.speech.invoke(if ui.is_dark_mode {
                phrases::DARK_MODE_ON
            } else {
                phrases::DARK_MODE_OFF
            });
        }
        Ok(ui.is_dark_mode)
    }

    //=====================================================================================
    // Panels
    //=====================================================================================

    pub fn open_panel(&self, panel: Panel) -> Result<(), SessionError> {
        self.set_panel(panel, true)
    }

    pub fn close_panel(&self, panel: Panel) -> Result<(), SessionError> {
        self.set_panel(panel, false)
    }

    fn set_panel(&self, panel: Panel, open: bool) -> Result<(), SessionError> {
        self.ensure_active()?;
        let changed = {
            let mut state = self.lock();
            state.ui.set_open(panel, open).then_some(state.ui)
        };
        if let Some(ui) = changed {
            debug!(?panel, open, "Panel visibility changed.");
            self.emit(SessionEvent::UiChanged(ui));
        }
        Ok(())
    }
}
