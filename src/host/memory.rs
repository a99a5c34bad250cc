//! An in-process document tree with DOM-style event dispatch.
//!
//! `Document` implements `EventHost`, so everything built on the registry can
//! be driven without a browser: listeners fire through a capture phase, a
//! target phase and a bubble phase exactly as they would on a web page.

use super::EventHost;
use crate::callback::Callback;
use crate::registry::ListenerOptions;
use crate::utils::classes::Classes;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

static NEXT_DOCUMENT_ID: AtomicUsize = AtomicUsize::new(0);

const ROOT: usize = 0;

/// Reference to a node of a particular `Document`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    document: usize,
    index: usize,
}

/// Identifies one attachment made through `EventHost::attach`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

/// Dispatch phase an event is in when a listener sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    /// Travelling from the root down to the target's parent.
    Capturing,
    /// At the target itself.
    AtTarget,
    /// Travelling from the target's parent back up to the root.
    Bubbling,
}

/// An event as seen by one listener.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    kind: String,
    target: NodeId,
    current_target: NodeId,
    phase: EventPhase,
}

impl Event {
    /// Event type, e.g. `click`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The node the event was dispatched to.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The node whose listener is running.
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    /// Current dispatch phase.
    pub fn phase(&self) -> EventPhase {
        self.phase
    }
}

/// Errors raised by document operations.
#[derive(Debug, Error, PartialEq)]
pub enum MemoryError {
    /// The node is not part of this document.
    #[error("node {0:?} does not belong to this document")]
    InvalidTarget(NodeId),
    /// The insertion would make a node its own ancestor or move the root.
    #[error("node {child:?} cannot be inserted into {parent:?}")]
    HierarchyRequest {
        /// The would-be parent.
        parent: NodeId,
        /// The rejected child.
        child: NodeId,
    },
    /// `child` is not a child of `parent`.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The supposed parent.
        parent: NodeId,
        /// The node that was looked for.
        child: NodeId,
    },
}

struct AttachedListener {
    handle: ListenerHandle,
    event: String,
    capture: bool,
    callback: Callback<Event>,
}

struct NodeData {
    tag: String,
    classes: Classes,
    attributes: IndexMap<String, String>,
    parent: Option<usize>,
    children: Vec<usize>,
    listeners: Vec<AttachedListener>,
}

impl NodeData {
    fn new(tag: &str) -> Self {
        NodeData {
            tag: tag.to_owned(),
            classes: Classes::new(),
            attributes: IndexMap::new(),
            parent: None,
            children: Vec::new(),
            listeners: Vec::new(),
        }
    }
}

struct Tree {
    id: usize,
    nodes: Vec<NodeData>,
    next_handle: u64,
}

impl Tree {
    fn slot(&self, node: NodeId) -> Result<usize, MemoryError> {
        if node.document == self.id && node.index < self.nodes.len() {
            Ok(node.index)
        } else {
            Err(MemoryError::InvalidTarget(node))
        }
    }

    fn node_id(&self, index: usize) -> NodeId {
        NodeId {
            document: self.id,
            index,
        }
    }

    /// Indices from the root down to `index`, inclusive.
    fn path_to(&self, index: usize) -> Vec<usize> {
        let mut path = vec![index];
        let mut current = self.nodes[index].parent;
        while let Some(parent) = current {
            path.push(parent);
            current = self.nodes[parent].parent;
        }
        path.reverse();
        path
    }

    fn is_inclusive_ancestor(&self, ancestor: usize, node: usize) -> bool {
        let mut current = Some(node);
        while let Some(index) = current {
            if index == ancestor {
                return true;
            }
            current = self.nodes[index].parent;
        }
        false
    }

    fn unlink(&mut self, child: usize) {
        if let Some(parent) = self.nodes[child].parent.take() {
            self.nodes[parent].children.retain(|&c| c != child);
        }
    }
}

/// A shared handle to an in-memory document.
///
/// Clones refer to the same tree.
#[derive(Clone)]
pub struct Document {
    tree: Rc<RefCell<Tree>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.tree.borrow();
        f.debug_struct("Document")
            .field("id", &tree.id)
            .field("nodes", &tree.nodes.len())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

impl Document {
    /// Creates an empty document holding only its root node.
    pub fn new() -> Self {
        let tree = Tree {
            id: NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed),
            nodes: vec![NodeData::new("#document")],
            next_handle: 0,
        };
        Document {
            tree: Rc::new(RefCell::new(tree)),
        }
    }

    /// The document node itself.
    pub fn root(&self) -> NodeId {
        self.tree.borrow().node_id(ROOT)
    }

    /// Creates a detached element.
    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut tree = self.tree.borrow_mut();
        tree.nodes.push(NodeData::new(tag));
        let index = tree.nodes.len() - 1;
        tree.node_id(index)
    }

    /// Appends `child` to `parent`, moving it out of its current parent.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), MemoryError> {
        let mut tree = self.tree.borrow_mut();
        let p = tree.slot(parent)?;
        let c = tree.slot(child)?;
        if c == ROOT || tree.is_inclusive_ancestor(c, p) {
            return Err(MemoryError::HierarchyRequest { parent, child });
        }
        tree.unlink(c);
        tree.nodes[c].parent = Some(p);
        tree.nodes[p].children.push(c);
        Ok(())
    }

    /// Detaches `child` from `parent`. Listeners stay attached to it.
    pub fn remove_child(&self, parent: NodeId, child: NodeId) -> Result<(), MemoryError> {
        let mut tree = self.tree.borrow_mut();
        let p = tree.slot(parent)?;
        let c = tree.slot(child)?;
        if tree.nodes[c].parent != Some(p) {
            return Err(MemoryError::NotAChild { parent, child });
        }
        tree.unlink(c);
        Ok(())
    }

    /// Puts a new `tag` element in place of `node` and moves `node` into it.
    pub fn wrap(&self, node: NodeId, tag: &str) -> Result<NodeId, MemoryError> {
        let n = self.tree.borrow().slot(node)?;
        if n == ROOT {
            return Err(MemoryError::HierarchyRequest {
                parent: node,
                child: node,
            });
        }
        let wrapper = self.create_element(tag);
        let w = wrapper.index;
        let mut tree = self.tree.borrow_mut();
        if let Some(parent) = tree.nodes[n].parent {
            let position = tree.nodes[parent].children.iter().position(|&c| c == n);
            if let Some(position) = position {
                tree.nodes[parent].children[position] = w;
            }
            tree.nodes[w].parent = Some(parent);
        }
        tree.nodes[n].parent = Some(w);
        tree.nodes[w].children.push(n);
        Ok(wrapper)
    }

    /// Parent of `node`, if attached.
    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>, MemoryError> {
        let tree = self.tree.borrow();
        let index = tree.slot(node)?;
        Ok(tree.nodes[index].parent.map(|p| tree.node_id(p)))
    }

    /// Children of `node` in order.
    pub fn children(&self, node: NodeId) -> Result<Vec<NodeId>, MemoryError> {
        let tree = self.tree.borrow();
        let index = tree.slot(node)?;
        Ok(tree.nodes[index]
            .children
            .iter()
            .map(|&c| tree.node_id(c))
            .collect())
    }

    /// Tag name `node` was created with.
    pub fn tag_name(&self, node: NodeId) -> Result<String, MemoryError> {
        let tree = self.tree.borrow();
        let index = tree.slot(node)?;
        Ok(tree.nodes[index].tag.clone())
    }

    /// Adds a class unless already present.
    pub fn add_class(&self, node: NodeId, class: &str) -> Result<(), MemoryError> {
        let mut tree = self.tree.borrow_mut();
        let index = tree.slot(node)?;
        tree.nodes[index].classes.push(class);
        Ok(())
    }

    /// Removes a class if present.
    pub fn remove_class(&self, node: NodeId, class: &str) -> Result<(), MemoryError> {
        let mut tree = self.tree.borrow_mut();
        let index = tree.slot(node)?;
        tree.nodes[index].classes.remove(class);
        Ok(())
    }

    /// Checks whether `node` carries `class`.
    pub fn has_class(&self, node: NodeId, class: &str) -> Result<bool, MemoryError> {
        let tree = self.tree.borrow();
        let index = tree.slot(node)?;
        Ok(tree.nodes[index].classes.contains(class))
    }

    /// The `className` string of `node`.
    pub fn class_name(&self, node: NodeId) -> Result<String, MemoryError> {
        let tree = self.tree.borrow();
        let index = tree.slot(node)?;
        Ok(tree.nodes[index].classes.to_string())
    }

    /// Sets an attribute, keeping the position of an existing one.
    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<(), MemoryError> {
        let mut tree = self.tree.borrow_mut();
        let index = tree.slot(node)?;
        tree.nodes[index]
            .attributes
            .insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    /// Value of a single attribute.
    pub fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, MemoryError> {
        let tree = self.tree.borrow();
        let index = tree.slot(node)?;
        Ok(tree.nodes[index].attributes.get(name).cloned())
    }

    /// All attributes of `node` as a name to value map, in insertion order.
    pub fn attributes(&self, node: NodeId) -> Result<IndexMap<String, String>, MemoryError> {
        let tree = self.tree.borrow();
        let index = tree.slot(node)?;
        Ok(tree.nodes[index].attributes.clone())
    }

    /// Descendants of `scope` (or of the whole document) carrying `class`,
    /// in document order.
    pub fn elements_by_class_name(
        &self,
        scope: Option<NodeId>,
        class: &str,
    ) -> Result<Vec<NodeId>, MemoryError> {
        let tree = self.tree.borrow();
        let start = match scope {
            Some(node) => tree.slot(node)?,
            None => ROOT,
        };
        let mut found = Vec::new();
        let mut stack: Vec<usize> = tree.nodes[start].children.iter().rev().cloned().collect();
        while let Some(index) = stack.pop() {
            let node = &tree.nodes[index];
            if node.classes.contains(class) {
                found.push(tree.node_id(index));
            }
            stack.extend(node.children.iter().rev());
        }
        Ok(found)
    }

    /// Nearest ancestor of `node` (excluding itself and the document root)
    /// carrying `class`.
    pub fn closest_ancestor_with_class(
        &self,
        node: NodeId,
        class: &str,
    ) -> Result<Option<NodeId>, MemoryError> {
        let tree = self.tree.borrow();
        let index = tree.slot(node)?;
        let mut current = tree.nodes[index].parent;
        while let Some(ancestor) = current {
            if ancestor == ROOT {
                break;
            }
            if tree.nodes[ancestor].classes.contains(class) {
                return Ok(Some(tree.node_id(ancestor)));
            }
            current = tree.nodes[ancestor].parent;
        }
        Ok(None)
    }

    /// Number of native attachments currently on `node`.
    pub fn listener_count(&self, node: NodeId) -> Result<usize, MemoryError> {
        let tree = self.tree.borrow();
        let index = tree.slot(node)?;
        Ok(tree.nodes[index].listeners.len())
    }

    /// Dispatches a bubbling event of type `kind` to `target`.
    ///
    /// Returns how many listeners ran.
    pub fn dispatch(&self, target: NodeId, kind: &str) -> Result<usize, MemoryError> {
        let path = {
            let tree = self.tree.borrow();
            let index = tree.slot(target)?;
            tree.path_to(index)
        };
        let (&at, ancestors) = match path.split_last() {
            Some(split) => split,
            None => return Ok(0),
        };

        let mut invoked = 0;
        for &node in ancestors {
            invoked += self.invoke(node, target, kind, EventPhase::Capturing, true);
        }
        invoked += self.invoke(at, target, kind, EventPhase::AtTarget, true);
        invoked += self.invoke(at, target, kind, EventPhase::AtTarget, false);
        for &node in ancestors.iter().rev() {
            invoked += self.invoke(node, target, kind, EventPhase::Bubbling, false);
        }
        Ok(invoked)
    }

    fn invoke(
        &self,
        node: usize,
        target: NodeId,
        kind: &str,
        phase: EventPhase,
        capture: bool,
    ) -> usize {
        // Snapshot so listeners may attach or detach while running.
        let (current_target, snapshot) = {
            let tree = self.tree.borrow();
            let listeners: Vec<(ListenerHandle, Callback<Event>)> = tree.nodes[node]
                .listeners
                .iter()
                .filter(|l| l.event == kind && l.capture == capture)
                .map(|l| (l.handle, l.callback.clone()))
                .collect();
            (tree.node_id(node), listeners)
        };

        let mut invoked = 0;
        for (handle, callback) in snapshot {
            if !self.is_attached(node, handle) {
                continue;
            }
            callback.emit(Event {
                kind: kind.to_owned(),
                target,
                current_target,
                phase,
            });
            invoked += 1;
        }
        invoked
    }

    fn is_attached(&self, node: usize, handle: ListenerHandle) -> bool {
        self.tree.borrow().nodes[node]
            .listeners
            .iter()
            .any(|l| l.handle == handle)
    }
}

impl EventHost for Document {
    type Target = NodeId;
    type Event = Event;
    type Handle = ListenerHandle;
    type Error = MemoryError;

    fn attach(
        &self,
        target: &NodeId,
        event: &str,
        callback: Callback<Event>,
        options: &ListenerOptions,
    ) -> Result<ListenerHandle, MemoryError> {
        let mut tree = self.tree.borrow_mut();
        let index = tree.slot(*target)?;
        tree.next_handle += 1;
        let handle = ListenerHandle(tree.next_handle);
        tree.nodes[index].listeners.push(AttachedListener {
            handle,
            event: event.to_owned(),
            capture: options.use_capture,
            callback,
        });
        Ok(handle)
    }

    fn detach(
        &self,
        target: &NodeId,
        _event: &str,
        handle: &ListenerHandle,
        _options: &ListenerOptions,
    ) -> Result<(), MemoryError> {
        let mut tree = self.tree.borrow_mut();
        let index = tree.slot(*target)?;
        tree.nodes[index].listeners.retain(|l| l.handle != *handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&'static str) -> Callback<Event>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let make = move |label: &'static str| {
            let sink = sink.clone();
            Callback::from(move |event: Event| {
                sink.borrow_mut()
                    .push(format!("{}:{:?}", label, event.phase()));
            })
        };
        (log, make)
    }

    #[test]
    fn dispatch_walks_capture_target_bubble() {
        let doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");
        doc.append_child(doc.root(), outer).unwrap();
        doc.append_child(outer, inner).unwrap();

        let (log, make) = recorder();
        let bubble = ListenerOptions::default();
        let capture = ListenerOptions::capture();
        doc.attach(&outer, "click", make("outer-bubble"), &bubble).unwrap();
        doc.attach(&inner, "click", make("inner-bubble"), &bubble).unwrap();
        doc.attach(&outer, "click", make("outer-capture"), &capture).unwrap();
        doc.attach(&inner, "click", make("inner-capture"), &capture).unwrap();

        assert_eq!(doc.dispatch(inner, "click").unwrap(), 4);
        assert_eq!(
            *log.borrow(),
            vec![
                "outer-capture:Capturing",
                "inner-capture:AtTarget",
                "inner-bubble:AtTarget",
                "outer-bubble:Bubbling",
            ]
        );
    }

    #[test]
    fn other_event_types_are_ignored() {
        let doc = Document::new();
        let node = doc.create_element("button");
        let (log, make) = recorder();
        doc.attach(&node, "click", make("click"), &ListenerOptions::default())
            .unwrap();
        assert_eq!(doc.dispatch(node, "keyup").unwrap(), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn detach_removes_only_that_attachment() {
        let doc = Document::new();
        let node = doc.create_element("button");
        let (log, make) = recorder();
        let opts = ListenerOptions::default();
        let cb = make("same");
        let first = doc.attach(&node, "click", cb.clone(), &opts).unwrap();
        let _second = doc.attach(&node, "click", cb, &opts).unwrap();
        assert_eq!(doc.listener_count(node).unwrap(), 2);

        doc.detach(&node, "click", &first, &opts).unwrap();
        doc.detach(&node, "click", &first, &opts).unwrap();
        assert_eq!(doc.dispatch(node, "click").unwrap(), 1);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn listener_detached_mid_dispatch_does_not_run() {
        let doc = Document::new();
        let node = doc.create_element("button");
        let opts = ListenerOptions::default();
        let (log, make) = recorder();

        let victim: Rc<RefCell<Option<ListenerHandle>>> = Rc::new(RefCell::new(None));
        let killer = {
            let doc = doc.clone();
            let victim = victim.clone();
            Callback::from(move |event: Event| {
                if let Some(handle) = victim.borrow_mut().take() {
                    doc.detach(&event.current_target(), "click", &handle, &ListenerOptions::default())
                        .unwrap();
                }
            })
        };
        doc.attach(&node, "click", killer, &opts).unwrap();
        let handle = doc.attach(&node, "click", make("victim"), &opts).unwrap();
        *victim.borrow_mut() = Some(handle);

        assert_eq!(doc.dispatch(node, "click").unwrap(), 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn foreign_nodes_are_invalid_targets() {
        let doc = Document::new();
        let other = Document::new();
        let stranger = other.create_element("div");
        let err = doc
            .attach(&stranger, "click", Callback::from(|_: Event| {}), &ListenerOptions::default())
            .unwrap_err();
        assert_eq!(err, MemoryError::InvalidTarget(stranger));
        assert!(doc.dispatch(stranger, "click").is_err());
    }

    #[test]
    fn cannot_append_an_ancestor() {
        let doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(outer, inner).unwrap();
        assert!(matches!(
            doc.append_child(inner, outer),
            Err(MemoryError::HierarchyRequest { .. })
        ));
        assert!(doc.append_child(outer, doc.root()).is_err());
    }

    #[test]
    fn wrap_takes_the_node_position() {
        let doc = Document::new();
        let list = doc.create_element("ul");
        let a = doc.create_element("li");
        let b = doc.create_element("li");
        doc.append_child(list, a).unwrap();
        doc.append_child(list, b).unwrap();

        let wrapper = doc.wrap(a, "div").unwrap();
        assert_eq!(doc.children(list).unwrap(), vec![wrapper, b]);
        assert_eq!(doc.children(wrapper).unwrap(), vec![a]);
        assert_eq!(doc.parent(a).unwrap(), Some(wrapper));
        assert_eq!(doc.tag_name(wrapper).unwrap(), "div");
    }

    #[test]
    fn class_queries() {
        let doc = Document::new();
        let panel = doc.create_element("div");
        let body = doc.create_element("div");
        let cell = doc.create_element("span");
        doc.append_child(doc.root(), panel).unwrap();
        doc.append_child(panel, body).unwrap();
        doc.append_child(body, cell).unwrap();
        doc.add_class(panel, "info-panel").unwrap();
        doc.add_class(cell, "cell").unwrap();
        doc.add_class(cell, "selected").unwrap();
        doc.add_class(cell, "cell").unwrap();

        assert_eq!(doc.class_name(cell).unwrap(), "cell selected");
        assert_eq!(
            doc.closest_ancestor_with_class(cell, "info-panel").unwrap(),
            Some(panel)
        );
        assert_eq!(doc.closest_ancestor_with_class(panel, "info-panel").unwrap(), None);
        assert_eq!(doc.elements_by_class_name(None, "cell").unwrap(), vec![cell]);
        assert!(doc
            .elements_by_class_name(Some(cell), "cell")
            .unwrap()
            .is_empty());

        doc.remove_class(cell, "cell").unwrap();
        assert!(!doc.has_class(cell, "cell").unwrap());
        assert_eq!(doc.class_name(cell).unwrap(), "selected");
    }

    #[test]
    fn attributes_keep_insertion_order() {
        let doc = Document::new();
        let input = doc.create_element("input");
        doc.set_attribute(input, "type", "text").unwrap();
        doc.set_attribute(input, "name", "search").unwrap();
        doc.set_attribute(input, "type", "search").unwrap();

        let attrs = doc.attributes(input).unwrap();
        let pairs: Vec<(&str, &str)> = attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, vec![("type", "search"), ("name", "search")]);
        assert_eq!(doc.attribute(input, "missing").unwrap(), None);
    }
}
