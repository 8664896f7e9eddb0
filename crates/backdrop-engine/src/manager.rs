//! Background selection: at most one mounted engine at a time.

use std::collections::BTreeMap;
use std::fmt;

use backdrop_core::{BackgroundKind, Settings, Viewport};

use crate::animations;
use crate::background::Background;
use crate::engine::Engine;
use crate::scheduler::FrameHost;

/// Builds a background from its settings.
pub type Constructor = Box<dyn Fn(&Settings) -> Box<dyn Background>>;

/// Maps string keys to background constructors and owns the active engine.
#[derive(Default)]
pub struct BackgroundManager {
    registry: BTreeMap<&'static str, Constructor>,
    current: Option<(&'static str, Engine)>,
}

impl fmt::Debug for BackgroundManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundManager")
            .field("keys", &self.registry.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .finish()
    }
}

impl BackgroundManager {
    /// An empty manager with no registered backgrounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// A manager with every built-in background registered under its key.
    pub fn with_builtins() -> Self {
        let mut manager = Self::new();
        for kind in BackgroundKind::ALL {
            manager.register(kind.key(), move |s| animations::build(kind, s));
        }
        manager
    }

    pub fn register(
        &mut self,
        key: &'static str,
        constructor: impl Fn(&Settings) -> Box<dyn Background> + 'static,
    ) {
        self.registry.insert(key, Box::new(constructor));
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.registry.keys().copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.registry.contains_key(key)
    }

    /// Key of the mounted background.
    pub fn current_key(&self) -> Option<&'static str> {
        self.current.as_ref().map(|(key, _)| *key)
    }

    pub fn current(&self) -> Option<&Engine> {
        self.current.as_ref().map(|(_, engine)| engine)
    }

    pub fn current_mut(&mut self) -> Option<&mut Engine> {
        self.current.as_mut().map(|(_, engine)| engine)
    }

    /// Tear down the current engine, then build and mount `key`.
    ///
    /// An unknown key leaves the current engine running and returns `false`.
    pub fn switch(
        &mut self,
        key: &str,
        settings: &Settings,
        host: &mut dyn FrameHost,
        viewport: Viewport,
    ) -> bool {
        if !self.registry.contains_key(key) {
            tracing::warn!(key, "unknown background");
            return false;
        }
        self.destroy(host);
        let Some((&key, constructor)) = self.registry.get_key_value(key) else {
            return false;
        };
        let mut engine = Engine::new(constructor(settings));
        engine.mount(host, viewport);
        tracing::info!(background = key, "background switched");
        self.current = Some((key, engine));
        true
    }

    /// Destroy and drop the current engine, if any.
    pub fn destroy(&mut self, host: &mut dyn FrameHost) {
        if let Some((_, mut engine)) = self.current.take() {
            engine.destroy(host);
        }
    }
}
