#![forbid(unsafe_code)]

//! The contract between the tree and the things it paints.
//!
//! A drawable is owned by whoever created it, never by the tree. Producers
//! hand the tree a [`SharedDrawable`]; the tree keeps only a weak reference,
//! so dropping the last strong handle makes the node paint nothing and get
//! detached on the next render rather than keeping the drawable alive.

use std::sync::{Arc, Mutex, Weak};

use wintk_core::{Rect, Size};
use wintk_grid::TextGrid;

/// How a drawable wants the cursor shown while it holds focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    /// No cursor.
    #[default]
    None,
    /// The terminal's native cursor, positioned by the presenter.
    TerminalRendered,
    /// The drawable paints its own cursor into its grid.
    ToolkitRendered,
}

/// A paintable unit supplied by a producer.
///
/// `text_grid` must return a grid whose size equals `rect().size` exactly.
/// A mismatch is a contract violation: the tree detaches the offending
/// drawable instead of propagating a recoverable error.
pub trait Drawable: Send {
    /// Whether this drawable accepts input focus.
    fn is_focusable(&self) -> bool;

    /// Cursor handling while focused.
    fn cursor_mode(&self) -> CursorMode {
        CursorMode::None
    }

    /// Whether absent cell fields show through to whatever is underneath.
    fn is_transparent(&self) -> bool {
        false
    }

    /// Whether this drawable hosts children of its own.
    fn is_container(&self) -> bool {
        false
    }

    /// Current rectangle, relative to the parent container.
    fn rect(&self) -> Rect;

    /// Render the current contents. The grid size must match `rect().size`.
    fn text_grid(&self) -> TextGrid;

    /// Called before a repaint when the tree learns the drawable changed
    /// size, so buffers can be reallocated.
    fn on_resize(&mut self, _old: Size, _new: Size) {}
}

/// A drawable as shared between its producer and the tree.
pub type SharedDrawable = Arc<Mutex<dyn Drawable>>;

/// The tree's non-owning view of a drawable.
pub type WeakDrawable = Weak<Mutex<dyn Drawable>>;

/// Wrap a concrete drawable for sharing with a tree.
pub fn share<D: Drawable + 'static>(drawable: D) -> SharedDrawable {
    Arc::new(Mutex::new(drawable))
}
