#![forbid(unsafe_code)]

//! Retained document model standing in for the host page.
//!
//! The trap engine does not own the page: it borrows this model to query
//! element structure, move focus, and toggle page-wide interaction state.
//! The rendering layer builds the tree (`append`/`detach`) and the engine
//! only reads it, except for the three resources it explicitly manages:
//! focus, overflow, and the inert root.
//!
//! # Invariants
//!
//! - `body()` is always attached and can always receive focus.
//! - The focused node is always attached; detaching its subtree moves focus
//!   back to `body`.
//! - At most one key listener is installed at a time; a held slot must be
//!   released with the exact token that acquired it.
//!
//! # Failure Modes
//!
//! - `append` under a detached parent returns `None` (no panic).
//! - `focus` on a detached, hidden, or disabled node is a no-op returning
//!   `false`.
//! - `detach(body)` is rejected.

use ahash::AHashMap;

/// Unique identifier for a node in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Get the raw ID value.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Background overflow state, mirroring the CSS overflow keywords the host
/// page may already have set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Content overflows freely.
    Visible,
    /// Overflowing content is clipped; the page cannot scroll.
    Hidden,
    /// Scrollbars are always shown.
    Scroll,
    /// Scrollbars appear when necessary.
    #[default]
    Auto,
}

/// Element properties relevant to focus and interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    visible: bool,
    disabled: bool,
    tab_index: Option<i32>,
    action_control: bool,
}

impl Default for Element {
    fn default() -> Self {
        Self::new()
    }
}

impl Element {
    /// Create a plain, non-focusable element (a generic container).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            visible: true,
            disabled: false,
            tab_index: None,
            action_control: false,
        }
    }

    /// Create an element in the default tab order (tab index 0).
    #[must_use]
    pub const fn focusable() -> Self {
        Self::new().with_tab_index(0)
    }

    /// Set the tab index. Non-negative values join the tab order; negative
    /// values are programmatically focusable only.
    #[must_use]
    pub const fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    /// Mark as hidden (display-suppressed). Hides the whole subtree.
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Mark as disabled.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Mark as a designated action control (e.g. a close button).
    #[must_use]
    pub const fn action_control(mut self) -> Self {
        self.action_control = true;
        self
    }

    /// Whether the element is visible.
    #[inline]
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the element is disabled.
    #[inline]
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The element's tab index, if it has one.
    #[inline]
    #[must_use]
    pub const fn tab_index(&self) -> Option<i32> {
        self.tab_index
    }

    /// Whether this is a designated action control.
    #[inline]
    #[must_use]
    pub const fn is_action_control(&self) -> bool {
        self.action_control
    }

    /// Whether the element participates in keyboard tab traversal.
    #[must_use]
    pub fn is_tabbable(&self) -> bool {
        self.visible && !self.disabled && self.tab_index.is_some_and(|t| t >= 0)
    }

    /// Show or hide the element.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Enable or disable the element.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }
}

/// Token proving ownership of the document's single key-listener slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerToken(u64);

#[derive(Debug)]
struct Node {
    element: Element,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// The host page: an element tree plus the page-wide state a focus trap
/// coordinates with (focus, overflow, inertness, the keydown listener slot).
#[derive(Debug)]
pub struct Document {
    nodes: AHashMap<NodeId, Node>,
    body: NodeId,
    active: NodeId,
    overflow: Overflow,
    inert_root: Option<NodeId>,
    key_listener: Option<ListenerToken>,
    next_node: u64,
    next_token: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the body.
    #[must_use]
    pub fn new() -> Self {
        let body = NodeId(0);
        let mut nodes = AHashMap::new();
        nodes.insert(
            body,
            Node {
                element: Element::new(),
                parent: None,
                children: Vec::new(),
            },
        );
        Self {
            nodes,
            body,
            active: body,
            overflow: Overflow::default(),
            inert_root: None,
            key_listener: None,
            next_node: 1,
            next_token: 1,
        }
    }

    /// The permanent document root.
    #[inline]
    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    // --- Tree Structure ---

    /// Append a new child element under `parent`.
    ///
    /// Returns `None` if the parent is not attached.
    pub fn append(&mut self, parent: NodeId, element: Element) -> Option<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(
            id,
            Node {
                element,
                parent: Some(parent),
                children: Vec::new(),
            },
        );
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        Some(id)
    }

    /// Detach a subtree from the document.
    ///
    /// If the focused node is inside the subtree, focus falls back to the
    /// body. If the inert root is inside, inertness is lifted. Returns
    /// `false` for the body or an already-detached node.
    pub fn detach(&mut self, id: NodeId) -> bool {
        if id == self.body || !self.nodes.contains_key(&id) {
            return false;
        }

        if self.is_within(self.active, id) {
            self.active = self.body;
        }
        if self.inert_root.is_some_and(|root| self.is_within(root, id)) {
            self.inert_root = None;
        }

        if let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent)
            && let Some(parent_node) = self.nodes.get_mut(&parent)
        {
            parent_node.children.retain(|c| *c != id);
        }

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children);
            }
        }
        true
    }

    /// Whether a node is attached to the document.
    #[must_use]
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Whether `id` is `ancestor` or lies inside its subtree.
    #[must_use]
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes.get(&current).and_then(|n| n.parent);
        }
        false
    }

    /// Element properties for an attached node.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(&id).map(|n| &n.element)
    }

    /// Mutable element properties for an attached node.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(&id).map(|n| &mut n.element)
    }

    /// Direct children of a node in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    /// Descendants of `root` in depth-first document order, excluding `root`
    /// itself. Empty if the root is detached or a leaf.
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(node) = self.nodes.get(&root) else {
            return out;
        };
        // Children are pushed in reverse so pop order matches document order.
        let mut stack: Vec<NodeId> = node.children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(n) = self.nodes.get(&next) {
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    // --- Focus ---

    /// The node currently holding focus. Defaults to the body.
    #[inline]
    #[must_use]
    pub const fn active(&self) -> NodeId {
        self.active
    }

    /// Move focus to a node (programmatic focus, any tab index).
    ///
    /// Succeeds only for attached, visible, enabled nodes; otherwise a no-op
    /// returning `false`.
    pub fn focus(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        if !node.element.visible || node.element.disabled {
            return false;
        }
        self.active = id;
        true
    }

    /// Remove focus from the current node, returning it to the body.
    pub fn blur(&mut self) {
        self.active = self.body;
    }

    // --- Page-wide interaction state ---

    /// Current background overflow state.
    #[inline]
    #[must_use]
    pub const fn overflow(&self) -> Overflow {
        self.overflow
    }

    /// Set the background overflow state.
    pub fn set_overflow(&mut self, overflow: Overflow) {
        self.overflow = overflow;
    }

    /// The subtree currently exempt from background inertness, if any.
    #[inline]
    #[must_use]
    pub const fn inert_root(&self) -> Option<NodeId> {
        self.inert_root
    }

    /// Mark everything outside `root`'s subtree as inert.
    pub fn set_inert_root(&mut self, root: Option<NodeId>) {
        self.inert_root = root;
    }

    /// Whether a node can receive pointer or assistive-technology
    /// interaction right now.
    #[must_use]
    pub fn can_interact(&self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        if !node.element.visible || node.element.disabled {
            return false;
        }
        match self.inert_root {
            None => true,
            Some(root) => self.is_within(id, root),
        }
    }

    // --- Key listener slot ---

    /// Acquire the document-level key listener slot.
    ///
    /// Returns `None` while another holder has it.
    pub fn install_key_listener(&mut self) -> Option<ListenerToken> {
        if self.key_listener.is_some() {
            return None;
        }
        let token = ListenerToken(self.next_token);
        self.next_token += 1;
        self.key_listener = Some(token);
        Some(token)
    }

    /// Release the key listener slot. Only the acquiring token succeeds;
    /// releasing with a stale token is a no-op returning `false`.
    pub fn remove_key_listener(&mut self, token: ListenerToken) -> bool {
        if self.key_listener == Some(token) {
            self.key_listener = None;
            true
        } else {
            false
        }
    }

    /// Whether a key listener is currently installed.
    #[must_use]
    pub const fn has_key_listener(&self) -> bool {
        self.key_listener.is_some()
    }
}
