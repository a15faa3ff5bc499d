use crate::{
    core::map::MapState,
    input::{
        events::{EventHandled, MapEvent, PointerEvent},
        pointer::PointerTracker,
    },
    prelude::HashMap,
};
use crossbeam_channel::{Receiver, Sender};

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Handle returned by [`EventManager::on`], used to remove the listener
pub type ListenerId = u64;

struct Listener {
    id: ListenerId,
    once: bool,
    callback: EventCallback,
}

/// Named event bus for the map.
///
/// Events are delivered synchronously, in registration order, to callbacks
/// registered for the event's [`MapEvent::event_type`] and to channel
/// subscribers of that type.
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<String, Vec<Listener>>,
    /// Channel subscribers by event type
    subscribers: HashMap<String, Vec<Sender<MapEvent>>>,
    next_id: ListenerId,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F) -> ListenerId
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.add_listener(event_type, false, Box::new(callback))
    }

    /// Register a listener that is removed after its first call
    pub fn once<F>(&mut self, event_type: &str, callback: F) -> ListenerId
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.add_listener(event_type, true, Box::new(callback))
    }

    /// Remove a listener. Returns `false` when the id is unknown.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let mut removed = false;
        for listeners in self.listeners.values_mut() {
            let before = listeners.len();
            listeners.retain(|listener| listener.id != id);
            removed |= listeners.len() != before;
        }
        removed
    }

    /// Receive every event of `event_type` on a channel
    pub fn subscribe(&mut self, event_type: &str) -> Receiver<MapEvent> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.subscribers
            .entry(event_type.to_string())
            .or_default()
            .push(sender);
        receiver
    }

    /// Whether anything listens for `event_type`
    pub fn listens(&self, event_type: &str) -> bool {
        self.listeners
            .get(event_type)
            .is_some_and(|listeners| !listeners.is_empty())
            || self
                .subscribers
                .get(event_type)
                .is_some_and(|subscribers| !subscribers.is_empty())
    }

    /// Deliver an event to its listeners and subscribers
    pub fn fire(&mut self, event: MapEvent) {
        let event_type = event.event_type();
        log::trace!("fire {} {:?}", event_type, event);

        if let Some(listeners) = self.listeners.get_mut(event_type) {
            for listener in listeners.iter() {
                (listener.callback)(&event);
            }
            listeners.retain(|listener| !listener.once);
        }

        if let Some(subscribers) = self.subscribers.get_mut(event_type) {
            // drop subscribers whose receiver is gone
            subscribers.retain(|sender| sender.send(event.clone()).is_ok());
        }
    }

    fn add_listener(&mut self, event_type: &str, once: bool, callback: EventCallback) -> ListenerId {
        self.next_id += 1;
        let id = self.next_id;
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Listener { id, once, callback });
        id
    }
}

/// A map interaction handler that can be switched on and off at runtime.
///
/// The map routes every accepted pointer event to each handler after the
/// [`PointerTracker`] has been updated.
pub trait Handler {
    fn enabled(&self) -> bool;

    fn enable(&mut self);

    /// Stops intercepting pointer downs. A gesture in progress is cancelled
    /// on the next pointer event; use [`Handler::cancel`] to end it now.
    fn disable(&mut self);

    fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        contacts: &PointerTracker,
        map: &mut MapState,
    ) -> EventHandled;

    /// Ends any gesture in progress immediately, without inertia or animation
    fn cancel(&mut self, map: &mut MapState);
}
