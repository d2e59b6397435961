//! In-memory element tree standing in for the browser page.
//!
//! Elements live in an arena and are addressed by [`NodeId`]. Freed slots
//! are reused, and each reuse bumps the slot's generation, so a stale id never
//! aliases a new element; operations on a stale id are no-ops.

use crate::errors::UiError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    text: String,
    hidden: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            text: String::new(),
            hidden: false,
            parent: None,
            children: Vec::new(),
        }
    }
}

const VOID_TAGS: &[&str] = &["img", "input", "br", "hr", "meta", "link"];

#[derive(Debug)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node::new("body")),
            }],
            free: Vec::new(),
            body: NodeId {
                index: 0,
                generation: 0,
            },
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let node = Some(Node::new(tag));
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = node;
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            node,
        });
        NodeId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    /// Moves `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return;
        }
        if self.is_descendant_of(parent, child) {
            return;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    /// Removes `id` and its whole subtree.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.body {
            return;
        }
        self.detach(id);
        self.drop_subtree(id);
    }

    /// Removes every child of `id`, jQuery `.empty()` style.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = match self.node_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.drop_subtree(child);
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|node| node.tag.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(node) = self.node_mut(id) {
            node.attrs.insert(name.to_string(), value.into());
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(node) = self.node_mut(id) {
            node.attrs.remove(name);
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .and_then(|node| node.attrs.get(name))
            .map(String::as_str)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let classes = node.attrs.entry("class".to_string()).or_default();
        if classes.split_whitespace().any(|existing| existing == class) {
            return;
        }
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str(class);
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(node) = self.node_mut(id) {
            node.text = text.into();
        }
    }

    /// Own text followed by the text of all descendants, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    pub fn hide(&mut self, id: NodeId) {
        if let Some(node) = self.node_mut(id) {
            node.hidden = true;
        }
    }

    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.node(id).map(|node| node.hidden).unwrap_or(false)
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) {
        if checked {
            self.set_attr(id, "checked", "checked");
        } else {
            self.remove_attr(id, "checked");
        }
    }

    pub fn is_checked(&self, id: NodeId) -> bool {
        self.attr(id, "checked").is_some()
    }

    pub fn get_element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.descendants(self.body)
            .into_iter()
            .find(|&id| self.attr(id, "id") == Some(element_id))
    }

    /// Pre-order descendants of `root` (excluding `root`) carrying `class`.
    pub fn descendants_with_class(&self, root: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| id != root && self.has_class(id, class))
            .collect()
    }

    /// Nearest element, starting at `id` itself, that carries `class`.
    pub fn closest_with_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(candidate) = current {
            if self.has_class(candidate, class) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// True when `ancestor` is a strict ancestor of `id`.
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    /// Serializes `id` and its subtree. Text and attribute values are escaped.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    /// Serializes the children of `id` without the element itself.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_html(child, &mut out);
        }
        out
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|&child| child != id);
        }
        if let Some(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self.slots.get_mut(current.index) else {
                continue;
            };
            if slot.generation != current.generation {
                continue;
            }
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                stack.extend(node.children);
            }
        }
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            if !self.contains(current) {
                continue;
            }
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        out.push_str(&node.text);
        for &child in &node.children {
            self.collect_text(child, out);
        }
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        out.push('<');
        out.push_str(&node.tag);
        for (name, value) in &node.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        if node.hidden {
            out.push_str(" style=\"display: none;\"");
        }
        out.push('>');
        if VOID_TAGS.contains(&node.tag.as_str()) {
            return;
        }
        out.push_str(&escape_text(&node.text));
        for &child in &node.children {
            self.write_html(child, out);
        }
        out.push_str("</");
        out.push_str(&node.tag);
        out.push('>');
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// `#message-container`, the single slot banners are rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageContainer(NodeId);

impl MessageContainer {
    pub const ELEMENT_ID: &'static str = "message-container";

    pub fn resolve(doc: &Document) -> Result<Self, UiError> {
        doc.get_element_by_id(Self::ELEMENT_ID)
            .map(Self)
            .ok_or(UiError::MissingElement(Self::ELEMENT_ID))
    }

    pub fn node(&self) -> NodeId {
        self.0
    }
}

/// `#uncaught-fish-grid`, the catalog card grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FishGrid(NodeId);

impl FishGrid {
    pub const ELEMENT_ID: &'static str = "uncaught-fish-grid";

    pub fn resolve(doc: &Document) -> Result<Self, UiError> {
        doc.get_element_by_id(Self::ELEMENT_ID)
            .map(Self)
            .ok_or(UiError::MissingElement(Self::ELEMENT_ID))
    }

    pub fn node(&self) -> NodeId {
        self.0
    }
}
