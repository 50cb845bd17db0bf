#![forbid(unsafe_code)]

//! The drawable tree and its compositor.
//!
//! Nodes live in an arena keyed by stable [`NodeId`]s. Branches hold child
//! id lists ordered bottom-to-top, so killing a subtree is plain data
//! removal with no cyclic references to untangle. The tree also keeps a
//! per-instance reverse registry from drawable to node, so producers can
//! recover the node they attached without holding the id themselves.
//!
//! All tree state sits behind one mutex. Render, attach and input dispatch
//! run on independently scheduled tasks in a host, and every one of their
//! entry points locks the same way, so cross-container walks (detach
//! repaints through ancestors) cannot deadlock. Nothing here blocks on I/O
//! while holding the lock; callers serialize the composited surface to
//! bytes after taking a snapshot.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use wintk_core::{Point, Rect, Size};
use wintk_grid::{Cell, TextGrid};

use crate::drawable::{CursorMode, Drawable, SharedDrawable, WeakDrawable};
use crate::error::TreeError;

/// Stable handle to a tree node.
///
/// Ids are never reused; a stale id simply fails lookup with
/// [`TreeError::NodeNotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

/// Z-order tier. Within a tier, insertion order decides stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Priority {
    /// Behind everything else.
    Low,
    /// The common tier.
    #[default]
    Default,
    /// In front of everything else.
    High,
}

/// Tree-wide configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeConfig {
    /// When set, attaching a drawable whose rect leaves its parent, or
    /// rendering a rect fully outside a container, is an error instead of
    /// being clipped or ignored.
    pub strict_bounds: bool,
}

/// Placement choices for [`SceneTree::attach_with`].
#[derive(Debug, Clone, Copy)]
pub struct AttachOptions {
    /// Z-order tier for the new node.
    pub priority: Priority,
    /// Front of the equal-priority group (on top) or back of it.
    pub to_front: bool,
    /// Move input focus to the new node if it accepts focus.
    pub focus: bool,
}

impl Default for AttachOptions {
    fn default() -> Self {
        Self {
            priority: Priority::Default,
            to_front: true,
            focus: false,
        }
    }
}

struct BranchData {
    /// Children in paint order: index 0 is the bottom, the last child is
    /// painted on top.
    children: Vec<NodeId>,
    /// The child this container last gave focus to, remembered even while
    /// global focus is elsewhere.
    local_focus: Option<NodeId>,
    back: TextGrid,
    front: TextGrid,
}

impl BranchData {
    fn new(size: Size) -> Self {
        Self {
            children: Vec::new(),
            local_focus: None,
            back: TextGrid::new(size),
            front: TextGrid::new(size),
        }
    }
}

struct NodeData {
    /// `None` only for the root surface, which has no producer.
    drawable: Option<WeakDrawable>,
    registry_key: Option<usize>,
    parent: Option<NodeId>,
    priority: Priority,
    /// Last rect reported by the drawable, relative to the parent. Kept so
    /// detach can repaint the hole even after the producer dropped the
    /// drawable.
    rect: Rect,
    branch: Option<BranchData>,
}

struct TreeInner {
    nodes: HashMap<NodeId, NodeData>,
    registry: HashMap<usize, NodeId>,
    next_id: u64,
    focus: Option<NodeId>,
    config: TreeConfig,
}

/// One session's scene graph: a root surface plus attached drawables.
pub struct SceneTree {
    root: NodeId,
    inner: Mutex<TreeInner>,
}

impl SceneTree {
    /// Create a tree whose root surface has the given size.
    pub fn new(size: Size) -> Self {
        Self::with_config(size, TreeConfig::default())
    }

    /// Create a tree with explicit configuration.
    pub fn with_config(size: Size, config: TreeConfig) -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            NodeData {
                drawable: None,
                registry_key: None,
                parent: None,
                priority: Priority::Default,
                rect: Rect::from_size(size),
                branch: Some(BranchData::new(size)),
            },
        );
        Self {
            root,
            inner: Mutex::new(TreeInner {
                nodes,
                registry: HashMap::new(),
                next_id: 1,
                focus: None,
                config,
            }),
        }
    }

    /// The root surface node.
    #[inline]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Current size of the root surface.
    pub fn size(&self) -> Size {
        let inner = self.lock();
        root_size(&inner, self.root)
    }

    /// Attach a drawable under `parent` with default placement.
    pub fn attach(
        &self,
        parent: NodeId,
        drawable: &SharedDrawable,
    ) -> Result<NodeId, TreeError> {
        self.attach_with(parent, drawable, AttachOptions::default())
    }

    /// Attach a drawable under `parent`.
    ///
    /// The parent must be a container. With strict bounds enabled, the
    /// drawable's rect must fit entirely inside the parent. A drawable can
    /// be attached to a tree at most once; a second attach is rejected
    /// until the first node is detached. The new node's area is repainted
    /// before this returns, and focus is moved if requested and the
    /// drawable accepts it.
    pub fn attach_with(
        &self,
        parent: NodeId,
        drawable: &SharedDrawable,
        opts: AttachOptions,
    ) -> Result<NodeId, TreeError> {
        let mut inner = self.lock();

        let (rect, is_container, focusable) = {
            let guard = lock_drawable(drawable);
            (guard.rect(), guard.is_container(), guard.is_focusable())
        };

        let bounds = match inner.nodes.get(&parent) {
            Some(node) => match &node.branch {
                Some(branch) => branch.back.bounds(),
                None => return Err(TreeError::NotABranch(parent)),
            },
            None => return Err(TreeError::NodeNotFound(parent)),
        };
        if inner.config.strict_bounds && !bounds.contains_rect(&rect) {
            return Err(TreeError::OutOfBounds { rect, bounds });
        }

        let key = std::sync::Arc::as_ptr(drawable) as *const () as usize;
        if let Some(existing) = inner.registry.get(&key).copied() {
            return Err(TreeError::AlreadyAttached(existing));
        }

        let id = NodeId(inner.next_id);
        inner.next_id += 1;

        inner.nodes.insert(
            id,
            NodeData {
                drawable: Some(std::sync::Arc::downgrade(drawable)),
                registry_key: Some(key),
                parent: Some(parent),
                priority: opts.priority,
                rect,
                branch: is_container.then(|| BranchData::new(rect.size)),
            },
        );
        inner.registry.insert(key, id);

        let index = insert_index(&inner, parent, opts.priority, opts.to_front);
        if let Some(branch) = inner.nodes.get_mut(&parent).and_then(|n| n.branch.as_mut()) {
            branch.children.insert(index, id);
        }

        render_locked(&mut inner, parent, rect)?;
        if opts.focus && focusable && inner.nodes.contains_key(&id) {
            set_focus_locked(&mut inner, Some(id))?;
        }
        Ok(id)
    }

    /// Detach a node, repaint the area it occupied, and move focus to the
    /// sibling that took its place when the detached subtree held it.
    ///
    /// The root surface cannot be detached.
    pub fn detach(&self, id: NodeId) -> Result<(), TreeError> {
        let mut inner = self.lock();
        let (parent, rect) = match inner.nodes.get(&id) {
            Some(node) => match node.parent {
                Some(parent) => (parent, node.rect),
                None => return Err(TreeError::IsRoot(id)),
            },
            None => return Err(TreeError::NodeNotFound(id)),
        };

        let had_focus = inner
            .focus
            .is_some_and(|f| is_descendant_or_self(&inner, f, id));
        let index = inner
            .nodes
            .get(&parent)
            .and_then(|n| n.branch.as_ref())
            .and_then(|b| b.children.iter().position(|c| *c == id));

        kill_locked(&mut inner, id);
        render_locked(&mut inner, parent, rect)?;

        if had_focus {
            let successor = index.and_then(|i| {
                let siblings = inner
                    .nodes
                    .get(&parent)
                    .and_then(|n| n.branch.as_ref())
                    .map(|b| b.children.as_slice())
                    .unwrap_or(&[]);
                siblings.get(i).or(siblings.last()).copied()
            });
            let target = successor.filter(|s| is_focusable_node(&inner, *s));
            set_focus_locked(&mut inner, target)?;
        }
        Ok(())
    }

    /// Repaint `rect` (in `id`'s own coordinates) and propagate the change
    /// up to the root surface.
    ///
    /// Repainting is idempotent: rendering the same rect twice produces the
    /// same visible result, so duplicate or coalesced requests are safe.
    pub fn render(&self, id: NodeId, rect: Rect) -> Result<(), TreeError> {
        let mut inner = self.lock();
        render_locked(&mut inner, id, rect)
    }

    /// Move global focus.
    ///
    /// Focusing a node also updates the local-focus pointer of every
    /// container on the path to the root, so nested containers remember
    /// their last-focused child. Focusing a container resolves to the
    /// deepest remembered child, which is how focus returns to the same
    /// field when a whole window is re-focused.
    pub fn set_focus(&self, id: Option<NodeId>) -> Result<(), TreeError> {
        let mut inner = self.lock();
        set_focus_locked(&mut inner, id)
    }

    /// The globally focused node, if any.
    pub fn focused(&self) -> Option<NodeId> {
        self.lock().focus
    }

    /// The child this container last gave focus to.
    ///
    /// The pointer survives global focus moving elsewhere, and is cleared
    /// when the remembered child dies.
    pub fn local_focus(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        let inner = self.lock();
        match inner.nodes.get(&id) {
            Some(node) => match &node.branch {
                Some(branch) => Ok(branch.local_focus),
                None => Err(TreeError::NotABranch(id)),
            },
            None => Err(TreeError::NodeNotFound(id)),
        }
    }

    /// Change a node's z-order tier and position within it.
    pub fn set_priority(
        &self,
        id: NodeId,
        priority: Priority,
        to_front: bool,
    ) -> Result<(), TreeError> {
        let mut inner = self.lock();
        let (parent, rect) = match inner.nodes.get(&id) {
            Some(node) => match node.parent {
                Some(parent) => (parent, node.rect),
                None => return Err(TreeError::IsRoot(id)),
            },
            None => return Err(TreeError::NodeNotFound(id)),
        };

        if let Some(node) = inner.nodes.get_mut(&id) {
            node.priority = priority;
        }
        if let Some(branch) = inner.nodes.get_mut(&parent).and_then(|n| n.branch.as_mut()) {
            branch.children.retain(|c| *c != id);
        }
        let index = insert_index(&inner, parent, priority, to_front);
        if let Some(branch) = inner.nodes.get_mut(&parent).and_then(|n| n.branch.as_mut()) {
            branch.children.insert(index, id);
        }
        render_locked(&mut inner, parent, rect)
    }

    /// Whether `id` names a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.lock().nodes.contains_key(&id)
    }

    /// Reverse lookup from a drawable to its node in this tree.
    pub fn node_of(&self, drawable: &SharedDrawable) -> Option<NodeId> {
        let key = std::sync::Arc::as_ptr(drawable) as *const () as usize;
        self.lock().registry.get(&key).copied()
    }

    /// Tell the tree a drawable's rect changed.
    ///
    /// Calls the drawable's resize hook when the size changed, reallocates
    /// container buffers, and repaints the union of the old and new areas.
    pub fn node_resized(&self, id: NodeId) -> Result<(), TreeError> {
        let mut inner = self.lock();
        let (weak, parent, old) = match inner.nodes.get(&id) {
            Some(node) => match (&node.drawable, node.parent) {
                (Some(weak), Some(parent)) => (weak.clone(), parent, node.rect),
                _ => return Err(TreeError::IsRoot(id)),
            },
            None => return Err(TreeError::NodeNotFound(id)),
        };
        let Some(strong) = weak.upgrade() else {
            kill_locked(&mut inner, id);
            return Err(TreeError::DrawableGone(id));
        };

        let new = {
            let mut guard = lock_drawable(&strong);
            let new = guard.rect();
            if new.size != old.size {
                guard.on_resize(old.size, new.size);
            }
            new
        };

        if let Some(node) = inner.nodes.get_mut(&id) {
            node.rect = new;
            if let Some(branch) = node.branch.as_mut() {
                branch.back.resize(new.size);
                branch.front.resize(new.size);
            }
        }
        render_locked(&mut inner, parent, old.combine(&new))
    }

    /// Resize the root surface, preserving the top-left-anchored content,
    /// and repaint everything.
    pub fn resize(&self, size: Size) -> Result<(), TreeError> {
        let mut inner = self.lock();
        if let Some(node) = inner.nodes.get_mut(&self.root) {
            node.rect = Rect::from_size(size);
            if let Some(branch) = node.branch.as_mut() {
                branch.back.resize(size);
                branch.front.resize(size);
            }
        }
        render_locked(&mut inner, self.root, Rect::from_size(size))
    }

    /// A copy of the visible surface, taken under the lock so a presenter
    /// can diff and serialize it outside.
    pub fn snapshot(&self) -> TextGrid {
        let inner = self.lock();
        inner
            .nodes
            .get(&self.root)
            .and_then(|n| n.branch.as_ref())
            .map(|b| b.front.clone())
            .unwrap_or_else(|| TextGrid::new(root_size(&inner, self.root)))
    }

    /// Where the terminal's native cursor should sit: the focused node's
    /// absolute origin, when it asks for a terminal-rendered cursor.
    pub fn cursor_hint(&self) -> Option<Point> {
        let inner = self.lock();
        let id = inner.focus?;
        let node = inner.nodes.get(&id)?;
        let drawable = node.drawable.as_ref()?.upgrade()?;
        let mode = lock_drawable(&drawable).cursor_mode();
        if mode != CursorMode::TerminalRendered {
            return None;
        }
        Some(absolute_origin(&inner, id))
    }

    fn lock(&self) -> MutexGuard<'_, TreeInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn lock_drawable(m: &Mutex<dyn Drawable>) -> MutexGuard<'_, dyn Drawable + 'static> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn root_size(inner: &TreeInner, root: NodeId) -> Size {
    // The root always exists and always has a rect.
    inner
        .nodes
        .get(&root)
        .map(|n| n.rect.size)
        .unwrap_or_else(|| Rect::from_size(fallback_size()).size)
}

fn fallback_size() -> Size {
    match Size::new(1, 1) {
        Ok(s) => s,
        Err(_) => unreachable!("1x1 is a valid size"),
    }
}

fn priority_of(inner: &TreeInner, id: NodeId) -> Priority {
    inner
        .nodes
        .get(&id)
        .map(|n| n.priority)
        .unwrap_or_default()
}

/// Index at which to insert a node of tier `priority` into `parent`'s child
/// list. Children are ordered bottom-to-top; `to_front` places the node on
/// top of its equal-priority group, otherwise at the bottom of it. Linear
/// scan, child counts are small.
fn insert_index(inner: &TreeInner, parent: NodeId, priority: Priority, to_front: bool) -> usize {
    let children: &[NodeId] = inner
        .nodes
        .get(&parent)
        .and_then(|n| n.branch.as_ref())
        .map(|b| b.children.as_slice())
        .unwrap_or(&[]);

    if to_front {
        let mut i = children.len();
        while i > 0 {
            if priority_of(inner, children[i - 1]) <= priority {
                return i;
            }
            i -= 1;
        }
        0
    } else {
        for (i, child) in children.iter().enumerate() {
            if priority_of(inner, *child) >= priority {
                return i;
            }
        }
        children.len()
    }
}

/// Remove `id` and every descendant from the arena and all lookup indexes.
/// Killing an already-dead node is a no-op.
fn kill_locked(inner: &mut TreeInner, id: NodeId) {
    let Some(node) = inner.nodes.remove(&id) else {
        return;
    };
    if let Some(key) = node.registry_key {
        inner.registry.remove(&key);
    }
    if inner.focus == Some(id) {
        inner.focus = None;
    }
    if let Some(branch) = node.branch {
        for child in branch.children {
            kill_locked(inner, child);
        }
    }
    if let Some(parent) = node.parent {
        if let Some(branch) = inner.nodes.get_mut(&parent).and_then(|n| n.branch.as_mut()) {
            branch.children.retain(|c| *c != id);
            if branch.local_focus == Some(id) {
                branch.local_focus = None;
            }
        }
    }
}

fn is_descendant_or_self(inner: &TreeInner, mut id: NodeId, ancestor: NodeId) -> bool {
    loop {
        if id == ancestor {
            return true;
        }
        match inner.nodes.get(&id).and_then(|n| n.parent) {
            Some(parent) => id = parent,
            None => return false,
        }
    }
}

fn is_focusable_node(inner: &TreeInner, id: NodeId) -> bool {
    inner
        .nodes
        .get(&id)
        .and_then(|n| n.drawable.as_ref())
        .and_then(|w| w.upgrade())
        .is_some_and(|d| lock_drawable(&d).is_focusable())
}

fn absolute_origin(inner: &TreeInner, id: NodeId) -> Point {
    let mut origin = Point::ZERO;
    let mut cursor = Some(id);
    while let Some(current) = cursor {
        match inner.nodes.get(&current) {
            Some(node) => {
                origin = origin.translate(node.rect.origin);
                cursor = node.parent;
            }
            None => break,
        }
    }
    origin
}

fn set_focus_locked(inner: &mut TreeInner, target: Option<NodeId>) -> Result<(), TreeError> {
    let Some(mut id) = target else {
        inner.focus = None;
        return Ok(());
    };
    if !inner.nodes.contains_key(&id) {
        return Err(TreeError::NodeNotFound(id));
    }
    // A container target descends through its remembered children, so
    // focusing a window again restores the field that held focus inside
    // it. The pointers only ever name live children.
    while let Some(child) = inner
        .nodes
        .get(&id)
        .and_then(|n| n.branch.as_ref())
        .and_then(|b| b.local_focus)
    {
        id = child;
    }
    if !is_focusable_node(inner, id) {
        return Err(TreeError::NotFocusable(id));
    }

    inner.focus = Some(id);
    let mut child = id;
    while let Some(parent) = inner.nodes.get(&child).and_then(|n| n.parent) {
        if let Some(branch) = inner.nodes.get_mut(&parent).and_then(|n| n.branch.as_mut()) {
            branch.local_focus = Some(child);
        }
        child = parent;
    }
    Ok(())
}

/// Merge `grid` (positioned at `at` in container coordinates) into `back`,
/// touching only cells inside `area`.
fn composite_region(
    back: &mut TextGrid,
    area: &Rect,
    grid: &TextGrid,
    at: Point,
    transparent: bool,
) {
    for y in area.min_y()..=area.max_y() {
        for x in area.min_x()..=area.max_x() {
            let Some(src) = grid.get(x - at.x, y - at.y).copied() else {
                continue;
            };
            let Some(dst) = back.get_mut(x, y) else {
                continue;
            };
            if transparent {
                if src.ch.is_some() {
                    dst.ch = src.ch;
                }
                if src.style.is_some() {
                    dst.style = src.style;
                }
            } else {
                *dst = src;
            }
        }
    }
}

fn copy_region(src: &TextGrid, dst: &mut TextGrid, area: &Rect) {
    for y in area.min_y()..=area.max_y() {
        for x in area.min_x()..=area.max_x() {
            if let (Some(cell), Some(slot)) = (src.get(x, y).copied(), dst.get_mut(x, y)) {
                *slot = cell;
            }
        }
    }
}

/// Repaint `rect` of `id` and propagate upward.
///
/// For a container: clip the rect to the container's bounds, clear it in
/// the back buffer, composite every intersecting child bottom-to-top (a
/// container child contributes its front buffer, a leaf renders fresh),
/// publish by copying the region from back to front, then repaint the same
/// region in the parent. For a leaf: repaint its area in the parent.
///
/// A child whose producer dropped the drawable, or whose grid does not
/// match its rect, is detached here; the first such failure is reported
/// after the frame completes so no error is swallowed.
fn render_locked(inner: &mut TreeInner, id: NodeId, rect: Rect) -> Result<(), TreeError> {
    let (parent, node_rect, is_branch) = match inner.nodes.get(&id) {
        Some(node) => (node.parent, node.rect, node.branch.is_some()),
        None => return Err(TreeError::NodeNotFound(id)),
    };

    if !is_branch {
        let Some(parent) = parent else {
            return Err(TreeError::NotABranch(id));
        };
        return render_locked(inner, parent, rect.translate(node_rect.origin));
    }

    let bounds = node_rect.zero();
    let Some(clipped) = bounds.intersection(&rect) else {
        if inner.config.strict_bounds {
            return Err(TreeError::OutOfBounds { rect, bounds });
        }
        return Ok(());
    };

    if let Some(branch) = inner.nodes.get_mut(&id).and_then(|n| n.branch.as_mut()) {
        branch.back.fill_region(&clipped, Cell::EMPTY);
    }

    let children: Vec<NodeId> = inner
        .nodes
        .get(&id)
        .and_then(|n| n.branch.as_ref())
        .map(|b| b.children.clone())
        .unwrap_or_default();

    let mut violation: Option<TreeError> = None;
    let mut casualties: Vec<NodeId> = Vec::new();

    for child_id in children {
        let (weak, child_is_branch) = match inner.nodes.get(&child_id) {
            Some(child) => (child.drawable.clone(), child.branch.is_some()),
            None => continue,
        };
        let Some(strong) = weak.and_then(|w| w.upgrade()) else {
            casualties.push(child_id);
            if violation.is_none() {
                violation = Some(TreeError::DrawableGone(child_id));
            }
            continue;
        };

        let (child_rect, transparent, grid) = {
            let guard = lock_drawable(&strong);
            let child_rect = guard.rect();
            if !child_rect.intersects(&clipped) {
                if let Some(child) = inner.nodes.get_mut(&child_id) {
                    child.rect = child_rect;
                }
                continue;
            }
            let transparent = guard.is_transparent();
            let grid = if child_is_branch {
                None
            } else {
                Some(guard.text_grid())
            };
            (child_rect, transparent, grid)
        };
        if let Some(child) = inner.nodes.get_mut(&child_id) {
            child.rect = child_rect;
        }

        let grid = match grid {
            Some(grid) => grid,
            None => {
                // Buffered container: its front buffer is its content.
                match inner.nodes.get_mut(&child_id).and_then(|n| n.branch.as_mut()) {
                    Some(branch) => {
                        if branch.front.size() != child_rect.size {
                            branch.back.resize(child_rect.size);
                            branch.front.resize(child_rect.size);
                        }
                        branch.front.clone()
                    }
                    None => continue,
                }
            }
        };

        if grid.size() != child_rect.size {
            casualties.push(child_id);
            if violation.is_none() {
                violation = Some(TreeError::ContractViolation {
                    node: child_id,
                    expected: child_rect.size,
                    got: grid.size(),
                });
            }
            continue;
        }

        let Some(area) = clipped.intersection(&child_rect) else {
            continue;
        };
        if let Some(branch) = inner.nodes.get_mut(&id).and_then(|n| n.branch.as_mut()) {
            composite_region(&mut branch.back, &area, &grid, child_rect.origin, transparent);
        }
    }

    for casualty in casualties {
        wintk_core::logging::warn!(node = ?casualty, "detaching drawable after contract failure");
        kill_locked(inner, casualty);
    }

    // Publish: the front buffer changes in one step.
    if let Some(node) = inner.nodes.get_mut(&id) {
        if let Some(branch) = node.branch.as_mut() {
            let BranchData {
                ref back,
                ref mut front,
                ..
            } = *branch;
            copy_region(back, front, &clipped);
        }
    }

    let propagated = match parent {
        Some(parent) => render_locked(inner, parent, clipped.translate(node_rect.origin)),
        None => Ok(()),
    };
    match violation {
        Some(err) => Err(err),
        None => propagated,
    }
}
