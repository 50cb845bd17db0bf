#![forbid(unsafe_code)]

//! Drawable tree, compositor and terminal presenter.
//!
//! Producers implement [`Drawable`] and attach shared handles to a
//! [`SceneTree`]. The tree owns z-order, focus and the buffered compositing
//! of overlapping regions; a [`Screen`] diffs the composited surface and
//! writes the minimal escape-sequence stream to a terminal.

pub mod drawable;
pub mod error;
pub mod screen;
pub mod tree;

pub use drawable::{CursorMode, Drawable, SharedDrawable, WeakDrawable, share};
pub use error::TreeError;
pub use screen::Screen;
pub use tree::{AttachOptions, NodeId, Priority, SceneTree, TreeConfig};
