//! Frame scheduling between an engine and its host.
//!
//! The host owns the display refresh. An engine asks for exactly one future
//! frame at a time and subscribes to the event channels it needs; on teardown
//! it hands both back.

use std::collections::{BTreeMap, BTreeSet};

use crate::input::ListenerKind;

/// Handle of one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

/// Handle of one event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Lifecycle of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    /// Constructed, not mounted.
    #[default]
    Idle,
    /// Frame requested and firing continuously.
    Running,
    /// Torn down. Never runs again.
    Destroyed,
}

/// The environment an engine runs in.
pub trait FrameHost {
    /// Ask for a one-shot callback on the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;
    /// Cancel a pending request. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId;
    /// Remove a subscription. Unknown ids are ignored.
    fn remove_listener(&mut self, id: ListenerId);
}

/// A host driven by a fixed-rate refresh tick.
#[derive(Debug, Default)]
pub struct RefreshLoop {
    next_id: u64,
    pending: BTreeSet<FrameHandle>,
    listeners: BTreeMap<ListenerId, ListenerKind>,
}

impl RefreshLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start one refresh: every pending request becomes due and is removed.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Whether anyone subscribed to `kind`.
    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl FrameHost for RefreshLoop {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next());
        self.pending.insert(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.remove(&handle);
    }

    fn add_listener(&mut self, kind: ListenerKind) -> ListenerId {
        let id = ListenerId(self.next());
        self.listeners.insert(id, kind);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}
