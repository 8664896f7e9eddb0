//! Pointer-reactive animated backgrounds.
//!
//! An [`Engine`] owns one [`Background`] strategy and drives it once per frame
//! through a fixed pipeline: advance, pointer interaction, cull, spawn, then
//! paint onto a [`Surface`]. Frames are requested from a [`FrameHost`] one at a
//! time, so a destroyed engine never leaves work behind.
//!
//! [`BackgroundManager`] keeps at most one engine mounted and swaps between
//! registered backgrounds by key.

pub mod animations;
pub mod background;
pub mod engine;
pub mod input;
pub mod interaction;
pub mod manager;
pub mod scheduler;
pub mod store;
pub mod surface;

pub use animations::build;
pub use background::{Background, FrameContext};
pub use engine::Engine;
pub use input::{CoordinateSpace, InputTracker, ListenerKind, Pointer, PointerEvent};
pub use interaction::{Influence, falloff, for_each_link, link_opacity};
pub use manager::{BackgroundManager, Constructor};
pub use scheduler::{EngineState, FrameHandle, FrameHost, ListenerId, RefreshLoop};
pub use store::{ElementStore, Lifetime, SpawnPolicy, SpawnTimer};
pub use surface::{DOT_PX, PixelBuffer, Surface};
