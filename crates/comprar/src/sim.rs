//! Scripted in-memory DOM backend.
//!
//! [`SimDriver`] implements [`PageDriver`] against a [`SimDom`]: a flat
//! arena of nodes, each answering to one or more selector keys, with
//! visibility/enabled/selected state, input semantics (`maxlength`,
//! `type=number`) and click/hover effect hooks. Tests script a page once and
//! drive the exact same page objects and waits that run against the real
//! browser.
//!
//! Selector matching is exact-string on the registered keys; fixtures
//! register nodes under the same selector constants the page objects use.

use crate::driver::{ElementHandle, PageDriver};
use crate::locator::Locator;
use crate::parse;
use crate::result::{ComprarError, ComprarResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Identifier of a node in the sim arena
pub type NodeId = u64;

/// Effect hook run against the DOM when a node is clicked or hovered.
///
/// Hooks receive the DOM only; they must not call back into the driver.
pub type Hook = Box<dyn FnMut(&mut SimDom) + Send>;

/// One simulated DOM node
#[derive(Debug, Clone)]
pub struct SimNode {
    keys: Vec<String>,
    visible: bool,
    enabled: bool,
    selected: bool,
    text: String,
    value: String,
    attrs: HashMap<String, String>,
    attached: bool,
}

impl SimNode {
    /// Create a node answering to the given selector keys
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            visible: true,
            enabled: true,
            selected: false,
            text: String::new(),
            value: String::new(),
            attrs: HashMap::new(),
            attached: true,
        }
    }

    /// Set the rendered text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the input value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Start hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Start disabled
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Start selected/checked
    #[must_use]
    pub const fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attrs.insert(name.into(), value.into());
        self
    }

    fn matches(&self, key: &str) -> bool {
        self.attached && self.keys.iter().any(|k| k == key)
    }
}

/// The simulated page state
#[derive(Debug, Default)]
pub struct SimDom {
    url: String,
    title: String,
    nodes: Vec<(NodeId, SimNode)>,
    next_id: NodeId,
    click_log: Vec<NodeId>,
}

impl SimDom {
    /// Insert a node, returning its id
    pub fn insert(&mut self, node: SimNode) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.push((id, node));
        id
    }

    /// Ids of attached nodes matching a selector key, in insertion order
    #[must_use]
    pub fn find(&self, key: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.matches(key))
            .map(|(id, _)| *id)
            .collect()
    }

    fn node(&self, id: NodeId) -> Option<&SimNode> {
        self.nodes.iter().find(|(i, _)| *i == id).map(|(_, n)| n)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut SimNode> {
        self.nodes
            .iter_mut()
            .find(|(i, _)| *i == id)
            .map(|(_, n)| n)
    }

    fn for_each_match(&mut self, key: &str, mut f: impl FnMut(&mut SimNode)) {
        for (_, node) in &mut self.nodes {
            if node.matches(key) {
                f(node);
            }
        }
    }

    fn nth_match_mut(&mut self, key: &str, index: usize) -> Option<&mut SimNode> {
        self.nodes
            .iter_mut()
            .filter(|(_, n)| n.matches(key))
            .map(|(_, n)| n)
            .nth(index)
    }

    /// Make all nodes matching the key visible
    pub fn show(&mut self, key: &str) {
        self.for_each_match(key, |n| n.visible = true);
    }

    /// Hide all nodes matching the key
    pub fn hide(&mut self, key: &str) {
        self.for_each_match(key, |n| n.visible = false);
    }

    /// Make the nth match visible
    pub fn show_nth(&mut self, key: &str, index: usize) {
        if let Some(node) = self.nth_match_mut(key, index) {
            node.visible = true;
        }
    }

    /// Hide the nth match
    pub fn hide_nth(&mut self, key: &str, index: usize) {
        if let Some(node) = self.nth_match_mut(key, index) {
            node.visible = false;
        }
    }

    /// Detach all nodes matching the key; held handles become stale
    pub fn remove(&mut self, key: &str) {
        self.for_each_match(key, |n| n.attached = false);
    }

    /// Set the text of every node matching the key
    pub fn set_text(&mut self, key: &str, text: impl Into<String>) {
        let text = text.into();
        self.for_each_match(key, |n| n.text.clone_from(&text));
    }

    /// Set the text of the nth match
    pub fn set_text_nth(&mut self, key: &str, index: usize, text: impl Into<String>) {
        let text = text.into();
        if let Some(node) = self.nth_match_mut(key, index) {
            node.text = text;
        }
    }

    /// Set the value of every node matching the key
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        self.for_each_match(key, |n| n.value.clone_from(&value));
    }

    /// Set the selected/checked state of every node matching the key
    pub fn set_selected(&mut self, key: &str, selected: bool) {
        self.for_each_match(key, |n| n.selected = selected);
    }

    /// Text of the first match
    #[must_use]
    pub fn text_of(&self, key: &str) -> Option<String> {
        self.find(key)
            .first()
            .and_then(|id| self.node(*id))
            .map(|n| n.text.clone())
    }

    /// Value of the first match
    #[must_use]
    pub fn value_of(&self, key: &str) -> Option<String> {
        self.find(key)
            .first()
            .and_then(|id| self.node(*id))
            .map(|n| n.value.clone())
    }

    /// Current URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Set the current URL (navigation effect)
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Current title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the page title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Number of clicks dispatched to nodes matching the key
    #[must_use]
    pub fn clicks_of(&self, key: &str) -> usize {
        self.click_log
            .iter()
            .filter(|id| self.node(**id).is_some_and(|n| n.keys.iter().any(|k| k == key)))
            .count()
    }
}

/// Shared handle to the sim state, used by fixtures and tests.
///
/// Cloneable; take one with [`SimDriver::handle`] before boxing the driver
/// into a session.
#[derive(Clone)]
pub struct SimHandle {
    dom: Arc<Mutex<SimDom>>,
    click_hooks: Arc<Mutex<HashMap<NodeId, Vec<Hook>>>>,
    hover_hooks: Arc<Mutex<HashMap<NodeId, Vec<Hook>>>>,
}

impl std::fmt::Debug for SimHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimHandle").finish_non_exhaustive()
    }
}

impl SimHandle {
    /// Lock the DOM for setup or scripted mutation
    pub fn dom(&self) -> MutexGuard<'_, SimDom> {
        self.dom.lock().unwrap()
    }

    /// Run an effect when the node is clicked
    pub fn on_click(&self, id: NodeId, hook: impl FnMut(&mut SimDom) + Send + 'static) {
        self.click_hooks
            .lock()
            .unwrap()
            .entry(id)
            .or_default()
            .push(Box::new(hook));
    }

    /// Run an effect when the pointer moves onto the node
    pub fn on_hover(&self, id: NodeId, hook: impl FnMut(&mut SimDom) + Send + 'static) {
        self.hover_hooks
            .lock()
            .unwrap()
            .entry(id)
            .or_default()
            .push(Box::new(hook));
    }
}

/// Scripted-DOM implementation of [`PageDriver`]
pub struct SimDriver {
    handle: SimHandle,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SimDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimDriver").finish_non_exhaustive()
    }
}

impl SimDriver {
    /// Create a driver over an empty DOM
    #[must_use]
    pub fn new() -> Self {
        Self {
            handle: SimHandle {
                dom: Arc::new(Mutex::new(SimDom::default())),
                click_hooks: Arc::new(Mutex::new(HashMap::new())),
                hover_hooks: Arc::new(Mutex::new(HashMap::new())),
            },
        }
    }

    /// Shared handle for fixtures and scripted mutation
    #[must_use]
    pub fn handle(&self) -> SimHandle {
        self.handle.clone()
    }

    fn dom(&self) -> MutexGuard<'_, SimDom> {
        self.handle.dom.lock().unwrap()
    }

    fn stale(el: &ElementHandle) -> ComprarError {
        ComprarError::driver(format!("stale element: {}", el.locator))
    }

    fn with_node<T>(
        &self,
        el: &ElementHandle,
        f: impl FnOnce(&SimNode) -> T,
    ) -> ComprarResult<T> {
        let dom = self.dom();
        let node = dom
            .node(el.id)
            .filter(|n| n.attached)
            .ok_or_else(|| Self::stale(el))?;
        Ok(f(node))
    }

    fn with_node_mut<T>(
        &self,
        el: &ElementHandle,
        f: impl FnOnce(&mut SimNode) -> T,
    ) -> ComprarResult<T> {
        let mut dom = self.dom();
        let node = dom
            .node_mut(el.id)
            .filter(|n| n.attached)
            .ok_or_else(|| Self::stale(el))?;
        Ok(f(node))
    }

    fn run_hooks(hooks: &Arc<Mutex<HashMap<NodeId, Vec<Hook>>>>, dom: &Arc<Mutex<SimDom>>, id: NodeId) {
        let mut hooks = hooks.lock().unwrap();
        if let Some(list) = hooks.get_mut(&id) {
            let mut dom = dom.lock().unwrap();
            for hook in list {
                hook(&mut dom);
            }
        }
    }

    /// Fill semantics for inputs: `type=number` accepts only canonical
    /// positive integers (anything else leaves the field empty), and
    /// `maxlength` truncates.
    fn filtered_value(node: &SimNode, text: &str) -> String {
        let numeric = node.attrs.get("type").is_some_and(|t| t == "number");
        let mut value = if numeric && !parse::is_canonical_quantity(text) {
            String::new()
        } else {
            text.to_string()
        };
        if let Some(max) = node
            .attrs
            .get("maxlength")
            .and_then(|m| m.parse::<usize>().ok())
        {
            value.truncate(max);
        }
        value
    }
}

impl PageDriver for SimDriver {
    fn navigate(&self, url: &str) -> ComprarResult<()> {
        self.dom().set_url(url);
        Ok(())
    }

    fn refresh(&self) -> ComprarResult<()> {
        Ok(())
    }

    fn current_url(&self) -> ComprarResult<String> {
        Ok(self.dom().url().to_string())
    }

    fn title(&self) -> ComprarResult<String> {
        Ok(self.dom().title().to_string())
    }

    fn find_all(&self, locator: &Locator) -> ComprarResult<Vec<ElementHandle>> {
        let dom = self.dom();
        Ok(dom
            .find(locator.selector())
            .into_iter()
            .map(|id| ElementHandle::new(id, locator.to_string()))
            .collect())
    }

    fn is_attached(&self, el: &ElementHandle) -> ComprarResult<bool> {
        let dom = self.dom();
        Ok(dom.node(el.id).is_some_and(|n| n.attached))
    }

    fn is_visible(&self, el: &ElementHandle) -> ComprarResult<bool> {
        let dom = self.dom();
        Ok(dom.node(el.id).is_some_and(|n| n.attached && n.visible))
    }

    fn is_enabled(&self, el: &ElementHandle) -> ComprarResult<bool> {
        let dom = self.dom();
        Ok(dom.node(el.id).is_some_and(|n| n.attached && n.enabled))
    }

    fn is_selected(&self, el: &ElementHandle) -> ComprarResult<bool> {
        let dom = self.dom();
        Ok(dom.node(el.id).is_some_and(|n| n.attached && n.selected))
    }

    fn text(&self, el: &ElementHandle) -> ComprarResult<String> {
        self.with_node(el, |n| n.text.clone())
    }

    fn value(&self, el: &ElementHandle) -> ComprarResult<String> {
        self.with_node(el, |n| n.value.clone())
    }

    fn attribute(&self, el: &ElementHandle, name: &str) -> ComprarResult<Option<String>> {
        self.with_node(el, |n| n.attrs.get(name).cloned())
    }

    fn click(&self, el: &ElementHandle) -> ComprarResult<()> {
        {
            let mut dom = self.dom();
            let node = dom
                .node(el.id)
                .filter(|n| n.attached)
                .ok_or_else(|| Self::stale(el))?;
            if !node.visible || !node.enabled {
                return Err(ComprarError::driver(format!(
                    "element not interactable: {}",
                    el.locator
                )));
            }
            dom.click_log.push(el.id);
        }
        Self::run_hooks(&self.handle.click_hooks, &self.handle.dom, el.id);
        Ok(())
    }

    fn clear(&self, el: &ElementHandle) -> ComprarResult<()> {
        self.with_node_mut(el, |n| n.value.clear())
    }

    fn type_text(&self, el: &ElementHandle, text: &str) -> ComprarResult<()> {
        self.with_node_mut(el, |n| {
            n.value = Self::filtered_value(n, text);
        })
    }

    fn press_keys(&self, el: &ElementHandle, text: &str) -> ComprarResult<()> {
        self.with_node_mut(el, |n| {
            let numeric = n.attrs.get("type").is_some_and(|t| t == "number");
            let max = n
                .attrs
                .get("maxlength")
                .and_then(|m| m.parse::<usize>().ok());
            for ch in text.chars() {
                if numeric && !ch.is_ascii_digit() {
                    continue;
                }
                if max.is_some_and(|m| n.value.chars().count() >= m) {
                    break;
                }
                n.value.push(ch);
            }
        })
    }

    fn hover(&self, el: &ElementHandle) -> ComprarResult<()> {
        self.with_node(el, |_| ())?;
        Self::run_hooks(&self.handle.hover_hooks, &self.handle.dom, el.id);
        Ok(())
    }

    fn scroll_into_view(&self, el: &ElementHandle) -> ComprarResult<()> {
        self.with_node(el, |_| ())
    }

    fn screenshot(&self) -> ComprarResult<Vec<u8>> {
        // Stub PNG signature; the sim has no pixels to render.
        Ok(vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A])
    }
}
