//! services/assistant/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a WebSocket connection.
//! One connection mounts one chat session: it owns the `SessionController`,
//! the keyboard dispatcher, and (once registered) the speech capability.

use crate::{
    adapters::StyleSheet,
    session::{
        ConsentGate, SessionController, SessionError, SessionEvent, SessionOptions,
        ShortcutDispatcher,
    },
    web::{
        protocol::{ClientMessage, ServerMessage},
        socket_speech::SocketSpeech,
        state::AppState,
    },
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{Sink, SinkExt, StreamExt};
use sena_core::SpeechCapability;
use std::sync::Arc;
use std::time::Duration;
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinSet,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| {
        let connection_id = Uuid::new_v4();
        handle_socket(socket, app_state)
            .instrument(tracing::info_span!("session", %connection_id))
    })
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    info!("New WebSocket connection established.");

    let (sender, mut receiver) = socket.split();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<ServerMessage>();

    // --- 1. Outbound writer ---
    // Every frame goes through this one task, so ordering is preserved.
    let mut writer = tokio::spawn(write_frames(sender, outbound_rx).in_current_span());

    // --- 2. Session Initialization ---
    let style_tx = outbound_tx.clone();
    let style = Arc::new(StyleSheet::with_observer(move |change| {
        let _ = style_tx.send(ServerMessage::from(change));
    }));

    let gate = ConsentGate::load(app_state.consent_store.clone()).await;
    let options = SessionOptions {
        auto_read_delay: app_state.config.auto_read_delay,
        ..Default::default()
    };
    let controller = Arc::new(SessionController::new(
        gate,
        app_state.resolver.clone(),
        style,
        options,
    ));

    info!(consent = %controller.consent_state(), "Session mounted.");

    // Subscribe before the first snapshot so nothing falls between the two.
    let events = controller.subscribe();
    let _ = outbound_tx.send(ServerMessage::Snapshot(controller.snapshot()));
    if !controller.is_consent_accepted() {
        let _ = outbound_tx.send(ServerMessage::ConsentRequired);
    }

    let shutdown = CancellationToken::new();
    let forwarder = tokio::spawn(
        forward_events(
            controller.clone(),
            events,
            outbound_tx.clone(),
            shutdown.clone(),
        )
        .in_current_span(),
    );

    let mut connection = Connection {
        dispatcher: ShortcutDispatcher::attach(controller.clone()),
        controller,
        outbound: outbound_tx,
        speech_holder: None,
        pending: JoinSet::new(),
    };

    // --- 3. Main Message Loop ---
    loop {
        let frame = tokio::select! {
            frame = receiver.next() => frame,
            Some(joined) = connection.pending.join_next(), if !connection.pending.is_empty() => {
                if let Err(e) = joined {
                    if e.is_panic() {
                        error!("A resolution task panicked: {:?}", e);
                    }
                }
                continue;
            }
        };

        match frame {
            Some(Ok(Message::Text(text))) => connection.handle_text(text.as_str()).await,
            Some(Ok(Message::Close(_))) => {
                info!("Client closed the connection.");
                break;
            }
            Some(Ok(_)) => debug!("Ignoring non-text frame."),
            Some(Err(e)) => {
                warn!("WebSocket receive error: {:?}", e);
                break;
            }
            None => {
                info!("Client disconnected.");
                break;
            }
        }
    }

    // --- 4. Teardown ---
    shutdown.cancel();
    connection.close();
    if let Err(e) = forwarder.await {
        error!("Event forwarder failed: {:?}", e);
    }
    // Every sender is gone once the session is dropped, so the writer drains
    // what is still queued and then stops on its own.
    match tokio::time::timeout(WRITER_DRAIN_TIMEOUT, &mut writer).await {
        Ok(Err(e)) => error!("Outbound writer failed: {:?}", e),
        Ok(Ok(())) => {}
        Err(_) => {
            warn!("Outbound writer did not drain in time.");
            writer.abort();
        }
    }
    info!("Session closed.");
}

/// Serializes queued frames onto the socket until every sender is dropped
/// or the client stops receiving.
async fn write_frames<S>(mut sink: S, mut outbound_rx: mpsc::UnboundedReceiver<ServerMessage>)
where
    S: Sink<Message> + Unpin,
{
    while let Some(frame) = outbound_rx.recv().await {
        let json = match serde_json::to_string(&frame) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize frame: {:?}", e);
                continue;
            }
        };
        if sink.send(Message::Text(json.into())).await.is_err() {
            debug!("Client stopped receiving frames.");
            break;
        }
    }
}

/// Per-connection state driven by the read loop.
struct Connection {
    controller: Arc<SessionController>,
    dispatcher: ShortcutDispatcher,
    outbound: mpsc::UnboundedSender<ServerMessage>,
    /// The strong reference behind the registry's weak one.
    speech_holder: Option<Arc<dyn SpeechCapability>>,
    /// In-flight resolutions; aborted when the connection ends.
    pending: JoinSet<()>,
}

impl Connection {
    async fn handle_text(&mut self, text: &str) {
        let message = match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => message,
            Err(e) => {
                warn!("Received an invalid client message: {}", e);
                self.send(ServerMessage::Error {
                    message: format!("Invalid message: {}", e),
                });
                return;
            }
        };

        match message {
            ClientMessage::AcceptConsent => self.controller.accept_consent().await,
            ClientMessage::SendMessage { text } => {
                let controller = self.controller.clone();
                let outbound = self.outbound.clone();
                self.pending.spawn(
                    async move {
                        if let Err(e) = controller.send_message(&text).await {
                            let _ = outbound.send(ServerMessage::error(&e));
                        }
                    }
                    .in_current_span(),
                );
            }
            ClientMessage::QuickAction { action_id } => {
                let controller = self.controller.clone();
                let outbound = self.outbound.clone();
                self.pending.spawn(
                    async move {
                        if let Err(e) = controller.resolve_action(&action_id).await {
                            let _ = outbound.send(ServerMessage::error(&e));
                        }
                    }
                    .in_current_span(),
                );
            }
            ClientMessage::UpdateSettings { patch } => {
                self.report(self.controller.update_settings(patch).map(drop))
            }
            ClientMessage::KeyDown(event) => {
                let outcome = self.dispatcher.on_key_down(&event);
                self.send(outcome.into());
            }
            ClientMessage::ToggleDarkMode => self.report(self.controller.toggle_dark_mode().map(drop)),
            ClientMessage::ToggleTts => self.report(self.controller.toggle_tts().map(drop)),
            ClientMessage::NewConversation => self.report(self.controller.reset_conversation()),
            ClientMessage::SpeakMessage { message_id } => {
                self.report(self.controller.speak_message(message_id).map(drop))
            }
            ClientMessage::OpenPanel { panel } => self.report(self.controller.open_panel(panel)),
            ClientMessage::ClosePanel { panel } => self.report(self.controller.close_panel(panel)),
            ClientMessage::RegisterSpeech => {
                let capability: Arc<dyn SpeechCapability> = Arc::new(SocketSpeech::new(
                    self.outbound.clone(),
                    Arc::downgrade(&self.controller),
                ));
                match self.controller.register_speech(&capability) {
                    Ok(()) => {
                        self.speech_holder = Some(capability);
                        info!("Client registered as the speech engine.");
                    }
                    Err(e) => self.send(ServerMessage::error(&e)),
                }
            }
            ClientMessage::UnregisterSpeech => match self.controller.unregister_speech() {
                Ok(()) => {
                    self.speech_holder = None;
                    info!("Client unregistered its speech engine.");
                }
                Err(e) => self.send(ServerMessage::error(&e)),
            },
        }
    }

    fn send(&self, frame: ServerMessage) {
        if self.outbound.send(frame).is_err() {
            debug!("Dropping frame; writer has stopped.");
        }
    }

    fn report(&self, result: Result<(), SessionError>) {
        if let Err(e) = result {
            self.send(ServerMessage::error(&e));
        }
    }

    fn close(mut self) {
        self.pending.abort_all();
        self.dispatcher.detach();
        self.controller.speech().unregister();
        self.speech_holder = None;
    }
}

/// Relays session events to the client until the connection shuts down.
async fn forward_events(
    controller: Arc<SessionController>,
    mut events: broadcast::Receiver<SessionEvent>,
    outbound: mpsc::UnboundedSender<ServerMessage>,
    shutdown: CancellationToken,
) {
    loop {
        let event = tokio::select! {
            _ = shutdown.cancelled() => break,
            event = events.recv() => event,
        };

        let frame = match event {
            Ok(SessionEvent::ConsentAccepted) => Some(ServerMessage::Snapshot(controller.snapshot())),
            Ok(event) => ServerMessage::from_event(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Event receiver lagged; resending snapshot.");
                Some(ServerMessage::Snapshot(controller.snapshot()))
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        if let Some(frame) = frame {
            if outbound.send(frame).is_err() {
                break;
            }
        }
    }
}
