//! services/assistant/src/session/gateway.rs
//!
//! The asynchronous bridge between user input (free text or a quick action)
//! and the external response resolver. This is the only place the session
//! suspends.

use crate::session::{
    controller::SessionController, error::SessionError, events::SessionEvent, phrases,
};
use futures::FutureExt;
use sena_core::acknowledgement_for;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{error, info};

/// What the user asked for.
#[derive(Debug, Clone, Copy)]
enum Request<'a> {
    FreeText(&'a str),
    Action(&'a str),
}

impl<'a> Request<'a> {
    fn action_id(&self) -> &'a str {
        match *self {
            Request::FreeText(_) => "",
            Request::Action(id) => id,
        }
    }

    fn utterance(&self) -> Option<&'a str> {
        match *self {
            Request::FreeText(text) => Some(text),
            Request::Action(_) => None,
        }
    }

    fn acknowledgement(&self) -> &'static str {
        match *self {
            Request::FreeText(_) => phrases::FREE_TEXT_ACKNOWLEDGEMENT,
            Request::Action(id) => acknowledgement_for(id),
        }
    }

    fn apology(&self) -> &'static str {
        match self {
            Request::FreeText(_) => phrases::FREE_TEXT_APOLOGY,
            Request::Action(_) => phrases::ACTION_APOLOGY,
        }
    }
}

/// Keeps the typing indicator raised while at least one resolution is pending.
///
/// Lowering happens on drop, so it runs whether the resolution succeeded,
/// failed, panicked or was abandoned mid-flight.
struct TypingGuard<'a> {
    controller: &'a SessionController,
}

impl<'a> TypingGuard<'a> {
    fn raise(controller: &'a SessionController) -> Self {
        let started = {
            let mut state = controller.lock();
            state.in_flight += 1;
            !std::mem::replace(&mut state.ui.is_typing, true)
        };
        if started {
            controller.emit(SessionEvent::TypingChanged(true));
        }
        Self { controller }
    }
}

impl Drop for TypingGuard<'_> {
    fn drop(&mut self) {
        let stopped = {
            let mut state = self.controller.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
            state.in_flight == 0 && std::mem::replace(&mut state.ui.is_typing, false)
        };
        if stopped {
            self.controller.emit(SessionEvent::TypingChanged(false));
        }
    }
}

impl SessionController {
    /// Appends the user's text to the log and answers it.
    pub async fn send_message(&self, text: &str) -> Result<String, SessionError> {
        self.ensure_active()?;
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        self.append(text, false);
        self.resolve(Request::FreeText(text)).await
    }

    /// Answers free text without logging it as a user message first.
    pub async fn resolve_free_text(&self, utterance: &str) -> Result<String, SessionError> {
        self.ensure_active()?;
        self.resolve(Request::FreeText(utterance)).await
    }

    /// Answers a quick-action selection. Unknown ids are still forwarded.
    pub async fn resolve_action(&self, action_id: &str) -> Result<String, SessionError> {
        self.ensure_active()?;
        self.resolve(Request::Action(action_id)).await
    }

    /// Runs one resolution and appends its outcome as a bot message.
    ///
    /// Returns the appended text: the reply on success, the fixed apology
    /// on any failure.
    async fn resolve(&self, request: Request<'_>) -> Result<String, SessionError> {
        let _typing = TypingGuard::raise(self);

        if self.settings().tts_enabled {
            self.speech.invoke(request.acknowledgement());
        }

        let started = Instant::now();
        let outcome = AssertUnwindSafe(async {
            self.resolver
                .resolve(request.action_id(), request.utterance())
                .await
        })
        .catch_unwind()
        .await;

        let text = match outcome {
            Ok(Ok(reply)) => {
                info!(
                    action_id = request.action_id(),
                    elapsed = ?started.elapsed(),
                    "Resolver replied."
                );
                reply
            }
            Ok(Err(e)) => {
                error!(action_id = request.action_id(), error = %e, "Resolver failed.");
                request.apology().to_string()
            }
            Err(_) => {
                error!(action_id = request.action_id(), "Resolver panicked.");
                request.apology().to_string()
            }
        };

        self.append(text.clone(), true);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::{
        active_controller, FailingResolver, FixedResolver, PanickingResolver, PendingResolver,
        RecordingResolver, RecordingSpeech,
    };
    use sena_core::{SettingsPatch, GENERIC_ACKNOWLEDGEMENT};
    use std::sync::Arc;
    use std::time::Duration;

    fn enable_tts(controller: &SessionController) {
        controller
            .update_settings(SettingsPatch {
                tts_enabled: Some(true),
                ..Default::default()
            })
            .unwrap();
    }

    #[tokio::test]
    async fn test_successful_resolution_appends_one_bot_message() {
        let (controller, _) = active_controller(Arc::new(FixedResolver::new("X"))).await;

        let reply = controller.resolve_action("wifi").await.unwrap();
        assert_eq!(reply, "X");

        let messages = controller.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[1].is_bot);
        assert_eq!(messages[1].text, "X");
        assert!(!controller.is_typing());
    }

    #[tokio::test]
    async fn test_send_message_appends_user_then_reply() {
        let (controller, _) = active_controller(Arc::new(FixedResolver::new("resposta"))).await;

        controller.send_message("  Como uso o WhatsApp?  ").await.unwrap();

        let messages = controller.messages();
        assert_eq!(messages.len(), 3);
        assert!(!messages[1].is_bot);
        assert_eq!(messages[1].text, "Como uso o WhatsApp?");
        assert!(messages[2].is_bot);
        assert_eq!(messages[2].text, "resposta");
    }

    #[tokio::test]
    async fn test_send_blank_message_is_rejected() {
        let (controller, _) = active_controller(Arc::new(FixedResolver::new("x"))).await;
        assert_eq!(
            controller.send_message("   ").await,
            Err(SessionError::EmptyMessage)
        );
        assert_eq!(controller.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_free_text_passes_empty_action_and_utterance() {
        let resolver = Arc::new(RecordingResolver::default());
        let (controller, _) = active_controller(resolver.clone()).await;

        controller.send_message("oi").await.unwrap();
        controller.resolve_action("banco").await.unwrap();

        assert_eq!(
            resolver.calls(),
            vec![
                (String::new(), Some("oi".to_string())),
                ("banco".to_string(), None),
            ]
        );
    }

    #[tokio::test]
    async fn test_rejecting_resolver_appends_apology_and_clears_typing() {
        let (controller, _) = active_controller(Arc::new(FailingResolver)).await;

        let reply = controller.send_message("oi").await.unwrap();
        assert_eq!(reply, phrases::FREE_TEXT_APOLOGY);
        assert!(!controller.is_typing());

        let reply = controller.resolve_action("email").await.unwrap();
        assert_eq!(reply, phrases::ACTION_APOLOGY);
        assert!(!controller.is_typing());

        let texts: Vec<String> = controller.messages().into_iter().map(|m| m.text).collect();
        assert_eq!(texts[2], phrases::FREE_TEXT_APOLOGY);
        assert_eq!(texts[3], phrases::ACTION_APOLOGY);
    }

    #[tokio::test]
    async fn test_panicking_resolver_is_recovered() {
        let (controller, _) = active_controller(Arc::new(PanickingResolver)).await;

        let reply = controller.resolve_free_text("oi").await.unwrap();
        assert_eq!(reply, phrases::FREE_TEXT_APOLOGY);
        assert!(!controller.is_typing());

        // The session stays usable afterwards.
        controller.reset_conversation().unwrap();
        assert_eq!(controller.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_action_without_speech_capability_completes() {
        let (controller, _) = active_controller(Arc::new(FixedResolver::new("ok"))).await;
        enable_tts(&controller);

        assert_eq!(controller.resolve_action("whatsapp").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_panicking_speech_engine_does_not_lose_the_reply() {
        let (controller, _) = active_controller(Arc::new(FixedResolver::new("X"))).await;
        enable_tts(&controller);
        let capability: Arc<dyn sena_core::SpeechCapability> =
            Arc::new(|_: &str| panic!("speech engine crashed"));
        controller.speech().register(&capability);

        let controller = Arc::new(controller);
        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.resolve_action("whatsapp").await }
        });
        assert_eq!(task.await.unwrap(), Ok("X".to_string()));

        let messages = controller.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].text, "X");
        assert!(!controller.is_typing());
    }

    #[tokio::test]
    async fn test_acknowledgement_phrases() {
        let (controller, _) = active_controller(Arc::new(FixedResolver::new("ok"))).await;
        let speech = RecordingSpeech::register(&controller);

        controller.resolve_action("whatsapp").await.unwrap();
        assert!(speech.spoken().is_empty());

        enable_tts(&controller);
        controller.resolve_action("whatsapp").await.unwrap();
        controller.resolve_action("desconhecido").await.unwrap();
        controller.send_message("oi").await.unwrap();

        assert_eq!(
            speech.spoken(),
            vec![
                "Vou te ajudar com o WhatsApp".to_string(),
                GENERIC_ACKNOWLEDGEMENT.to_string(),
                phrases::FREE_TEXT_ACKNOWLEDGEMENT.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_typing_is_raised_while_pending() {
        let resolver = Arc::new(PendingResolver::default());
        let (controller, _) = active_controller(resolver.clone()).await;
        let controller = Arc::new(controller);
        let mut events = controller.subscribe();

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.resolve_action("wifi").await })
        };

        assert_eq!(events.recv().await.unwrap(), SessionEvent::TypingChanged(true));
        assert!(controller.is_typing());
        assert!(!controller.quick_actions_visible());

        resolver.wait_for_calls(1).await;
        resolver.release(Ok("pronto".to_string()));
        assert_eq!(task.await.unwrap().unwrap(), "pronto");
        assert!(!controller.is_typing());
    }

    #[tokio::test]
    async fn test_overlapping_requests_keep_typing_until_last_settles() {
        let resolver = Arc::new(PendingResolver::default());
        let (controller, _) = active_controller(resolver.clone()).await;
        let controller = Arc::new(controller);

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.resolve_action("wifi").await })
        };
        let second = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.resolve_action("email").await })
        };
        resolver.wait_for_calls(2).await;

        resolver.release(Ok("primeira".to_string()));
        let settled = tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                if controller.messages().len() == 2 {
                    break;
                }
                tokio::task::yield_now().await;
            }
        })
        .await;
        assert!(settled.is_ok());
        assert!(controller.is_typing());

        resolver.release(Err(sena_core::PortError::Unexpected("boom".to_string())));
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        assert!(!controller.is_typing());
        let texts: Vec<String> = controller.messages().into_iter().map(|m| m.text).collect();
        assert_eq!(texts[1], "primeira");
        assert_eq!(texts[2], phrases::ACTION_APOLOGY);
    }

    #[tokio::test]
    async fn test_abandoned_resolution_clears_typing() {
        let resolver = Arc::new(PendingResolver::default());
        let (controller, _) = active_controller(resolver.clone()).await;
        let controller = Arc::new(controller);

        let task = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.resolve_action("wifi").await })
        };
        resolver.wait_for_calls(1).await;
        assert!(controller.is_typing());

        task.abort();
        let _ = task.await;
        assert!(!controller.is_typing());
        assert_eq!(controller.messages().len(), 1);
    }
}
