//! Host lifecycle events.
//!
//! Topics are written `name[.namespace]`, e.g. `error.pvjson` is the
//! `error` event in the `pvjson` namespace. A listener registered for a
//! bare name hears every namespace; a namespaced listener only hears its
//! own namespace and un-namespaced triggers.
//!
//! [`EventBus::trigger`] queues the event until [`EventBus::flush_events`]
//! runs; [`EventBus::trigger_now`] delivers it immediately.

use std::{collections::VecDeque, fmt};

use log::trace;

/// A delivered event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    name: String,
    namespace: Option<String>,
    message: Option<String>,
}

impl Event {
    fn new(topic: &str, message: Option<&str>) -> Self {
        let (name, namespace) = split_topic(topic);
        Self {
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            message: message.map(str::to_string),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{}.{namespace}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Handle returned by [`EventBus::on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&Event)>;

struct Listener {
    id: ListenerId,
    name: String,
    namespace: Option<String>,
    callback: Callback,
}

impl Listener {
    fn hears(&self, event: &Event) -> bool {
        if self.name != event.name {
            return false;
        }
        match (&self.namespace, &event.namespace) {
            (Some(own), Some(triggered)) => own == triggered,
            _ => true,
        }
    }
}

fn split_topic(topic: &str) -> (&str, Option<&str>) {
    match topic.split_once('.') {
        Some((name, namespace)) => (name, Some(namespace)),
        None => (topic, None),
    }
}

/// Named, namespaced listeners plus a queue of pending events.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
    queue: VecDeque<Event>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("queue", &self.queue)
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for `topic`.
    pub fn on(&mut self, topic: &str, callback: impl FnMut(&Event) + 'static) -> ListenerId {
        let (name, namespace) = split_topic(topic);
        let id = ListenerId(self.next_id);
        self.next_id += 1;

        self.listeners.push(Listener {
            id,
            name: name.to_string(),
            namespace: namespace.map(str::to_string),
            callback: Box::new(callback),
        });
        id
    }

    /// Removes every listener of the topic's name, only those in its
    /// namespace when one is given. Returns how many were removed.
    pub fn off(&mut self, topic: &str) -> usize {
        let (name, namespace) = split_topic(topic);
        let before = self.listeners.len();
        self.listeners.retain(|listener| {
            let matches = listener.name == name
                && namespace.is_none_or(|namespace| listener.namespace.as_deref() == Some(namespace));
            !matches
        });
        before - self.listeners.len()
    }

    /// Removes a single listener. Returns `false` if it was already gone.
    pub fn off_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id != id);
        before != self.listeners.len()
    }

    /// Removes every listener and drops pending events.
    pub fn clear(&mut self) {
        self.listeners.clear();
        self.queue.clear();
    }

    /// Returns `true` when any listener is registered for the topic's name.
    pub fn has_listeners(&self, topic: &str) -> bool {
        let (name, _) = split_topic(topic);
        self.listeners.iter().any(|listener| listener.name == name)
    }

    /// Number of queued events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queues an event for the next [`flush_events`](Self::flush_events).
    ///
    /// Returns whether anyone listens to the event's name; events nobody
    /// listens to are not queued.
    pub fn trigger(&mut self, topic: &str, message: Option<&str>) -> bool {
        if !self.has_listeners(topic) {
            return false;
        }
        self.queue.push_back(Event::new(topic, message));
        true
    }

    /// Delivers an event right away. Returns whether anyone listens to the
    /// event's name.
    pub fn trigger_now(&mut self, topic: &str, message: Option<&str>) -> bool {
        if !self.has_listeners(topic) {
            return false;
        }
        self.deliver(&Event::new(topic, message));
        true
    }

    /// Delivers every queued event, oldest first. Returns how many events
    /// were delivered.
    pub fn flush_events(&mut self) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.queue.pop_front() {
            self.deliver(&event);
            delivered += 1;
        }
        delivered
    }

    fn deliver(&mut self, event: &Event) {
        trace!(event:%; "Delivering event");
        for listener in self.listeners.iter_mut().filter(|listener| listener.hears(event)) {
            (listener.callback)(event);
        }
    }
}
