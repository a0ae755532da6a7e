// The two cooperating loops and the channels between them - no Tauri imports.
//
// The Coordinator loop is an async task that exclusively owns the Coordinator,
// so the registry needs no lock: inputs are applied one at a time, in arrival
// order. The UI loop is a plain thread, because its navigation-state query
// blocks until the Coordinator answers.

use log::{debug, info, warn};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

use crate::modules::host::{Host, HostSignal};
use crate::modules::protocol::{Command, Event, GET_NAVIGATION_STATE};
use crate::modules::tabs::Coordinator;
use crate::modules::ui::{CoordinatorLink, Gesture, Surface, UiController};
use crate::state::{NavigationState, TabId};

/// Everything the Coordinator loop reacts to.
#[derive(Debug)]
pub enum CoordinatorInput {
    Command(Command),
    NavigationStateQuery {
        tab_id: TabId,
        reply: oneshot::Sender<NavigationState>,
    },
    Host { tab_id: TabId, signal: HostSignal },
    WindowResized,
}

/// Everything the UI loop reacts to.
#[derive(Debug)]
pub enum UiInput {
    Gesture(Gesture),
    Event(Event),
    /// The surface (re)loaded and needs a full frame.
    Redraw,
}

/// Where the Coordinator pushes its events.
pub trait EventSink {
    fn emit(&self, event: Event);
}

impl EventSink for UnboundedSender<UiInput> {
    fn emit(&self, event: Event) {
        if self.send(UiInput::Event(event)).is_err() {
            debug!("[Coordinator] UI loop gone, dropping event");
        }
    }
}

pub async fn run_coordinator<H, S>(
    mut coordinator: Coordinator<H>,
    mut inbox: UnboundedReceiver<CoordinatorInput>,
    sink: S,
) where
    H: Host,
    S: EventSink,
{
    info!("[Coordinator] Loop started");
    while let Some(input) = inbox.recv().await {
        match input {
            CoordinatorInput::Command(command) => {
                debug!("[Coordinator] {:?}", command);
                coordinator.handle_command(command);
            }
            CoordinatorInput::NavigationStateQuery { tab_id, reply } => {
                let state = coordinator.navigation_state(tab_id);
                if reply.send(state).is_err() {
                    debug!("[Coordinator] {} asker went away", GET_NAVIGATION_STATE);
                }
            }
            CoordinatorInput::Host { tab_id, signal } => coordinator.handle_signal(tab_id, signal),
            CoordinatorInput::WindowResized => coordinator.resized(),
        }
        for event in coordinator.drain_events() {
            debug!("[Coordinator] -> {} for tab {}", event.name(), event.tab_id());
            sink.emit(event);
        }
    }
    info!("[Coordinator] Inbox closed, loop finished");
}

/// The UI side of the Coordinator inbox.
#[derive(Clone)]
pub struct ChannelLink {
    outbox: UnboundedSender<CoordinatorInput>,
}

impl ChannelLink {
    pub fn new(outbox: UnboundedSender<CoordinatorInput>) -> Self {
        Self { outbox }
    }
}

impl CoordinatorLink for ChannelLink {
    fn send(&mut self, command: Command) {
        let tab_id = command.tab_id();
        if self.outbox.send(CoordinatorInput::Command(command)).is_err() {
            warn!("[UI] Coordinator loop gone, command for tab {} dropped", tab_id);
        }
    }

    /// Blocks the UI thread until the Coordinator answers. Must not be called
    /// from inside an async runtime.
    fn navigation_state(&mut self, tab_id: TabId) -> NavigationState {
        let (reply, answer) = oneshot::channel();
        if self
            .outbox
            .send(CoordinatorInput::NavigationStateQuery { tab_id, reply })
            .is_err()
        {
            return NavigationState::default();
        }
        answer.blocking_recv().unwrap_or_default()
    }
}

/// Drives the UI Controller until every sender of `inbox` is dropped.
pub fn run_ui<L, S>(mut ui: UiController<L, S>, mut inbox: UnboundedReceiver<UiInput>)
where
    L: CoordinatorLink,
    S: Surface,
{
    ui.start();
    while let Some(input) = inbox.blocking_recv() {
        match input {
            UiInput::Gesture(gesture) => ui.handle_gesture(gesture),
            UiInput::Event(event) => ui.handle_event(event),
            UiInput::Redraw => ui.render(),
        }
    }
    info!("[UI] Inbox closed, loop finished");
}
