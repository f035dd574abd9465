//! Arbor: a retained-mode GUI scene graph.
//!
//! Arbor owns a tree of nodes in a generational arena and drives the
//! machinery every widget set needs: dock-based layout, dual-path
//! rendering (direct or cached to backend textures), hit-tested mouse
//! routing, keyboard bubbling, and a forward-only tab chain. Widget
//! behavior, skinning, and the pixel backend plug in through traits;
//! arbor itself ships no concrete widgets.
//!
//! The main entry points are:
//! - [`Canvas`] - the arena and every operation on it
//! - [`Widget`] - the trait implemented by node behaviors
//! - [`RenderBackend`] - the drawing surface contract

// Core modules
mod canvas;
mod context;
mod focus;
mod id;
mod input;
mod layout;
mod node;
mod observers;
mod tree;
mod widget;

pub mod cursor;
pub mod dock;
pub mod dump;
pub mod error;
pub mod event;
pub mod render;
pub mod skin;
pub mod tutils;

pub use geom;

// Public exports
pub use canvas::Canvas;
pub use context::{Context, RenderContext};
pub use cursor::Cursor;
pub use dock::Dock;
pub use error::{Error, Result};
pub use event::{Key, MouseButton};
pub use id::NodeId;
pub use node::{Node, NodeName};
pub use observers::{Observer, ObserverId, Observers};
pub use render::{Color, Render, RenderBackend, TextureCache};
pub use skin::{SimpleSkin, Skin, SkinColors};
pub use widget::{EventOutcome, Widget};

// Export commonly used geometry types at the root
pub use geom::{Margin, Padding, Point, Rect};
