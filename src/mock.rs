//! An in-memory page for unit tests.

use crate::browser::Browser;
use crate::error::{CmdError, WebDriver};
use crate::wd::Selector;
use std::sync::{Arc, Mutex};
use webdriver::error::ErrorStatus;

/// One element on the fake page.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    selector: Selector,
    displayed: bool,
    enabled: bool,
    interactable: bool,
    value: String,
    text: String,
    parent: Option<usize>,
    navigates_to: Option<String>,
    // number of lookups that miss before the node shows up
    late_by: usize,
}

impl Node {
    pub(crate) fn new(selector: Selector) -> Self {
        Node {
            selector,
            displayed: true,
            enabled: true,
            interactable: true,
            value: String::new(),
            text: String::new(),
            parent: None,
            navigates_to: None,
            late_by: 0,
        }
    }

    pub(crate) fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub(crate) fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub(crate) fn blocked(mut self) -> Self {
        self.interactable = false;
        self
    }

    pub(crate) fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub(crate) fn inside(mut self, parent: usize) -> Self {
        self.parent = Some(parent);
        self
    }

    pub(crate) fn navigates_to(mut self, url: &str) -> Self {
        self.navigates_to = Some(url.to_string());
        self
    }

    pub(crate) fn late_by(mut self, lookups: usize) -> Self {
        self.late_by = lookups;
        self
    }
}

#[derive(Debug, Default)]
struct State {
    url: String,
    title: String,
    nodes: Vec<Node>,
    invalid: Vec<Selector>,
    lookups: Vec<Selector>,
    unreachable: bool,
    closed: bool,
}

/// A [`Browser`] over a fixed set of [`Node`]s.
///
/// Every lookup is recorded, so tests can check which candidates were tried. Clones share
/// the same page, so a test can keep one to inspect after handing the other away.
#[derive(Clone, Debug, Default)]
pub(crate) struct MockBrowser {
    state: Arc<Mutex<State>>,
}

fn miss(selector: &Selector) -> CmdError {
    CmdError::NoSuchElement(WebDriver::new(
        ErrorStatus::NoSuchElement,
        format!("no element matches {}", selector),
    ))
}

impl MockBrowser {
    pub(crate) fn new() -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().url = "about:blank".to_string();
        mock
    }

    /// Add an element and return its handle.
    pub(crate) fn add(&self, node: Node) -> usize {
        let mut state = self.state.lock().unwrap();
        state.nodes.push(node);
        state.nodes.len() - 1
    }

    pub(crate) fn with(self, node: Node) -> Self {
        self.add(node);
        self
    }

    /// Make the driver reject `selector` as malformed.
    pub(crate) fn reject(self, selector: Selector) -> Self {
        self.state.lock().unwrap().invalid.push(selector);
        self
    }

    pub(crate) fn titled(self, title: &str) -> Self {
        self.state.lock().unwrap().title = title.to_string();
        self
    }

    /// Fail every navigation.
    pub(crate) fn unreachable(self) -> Self {
        self.state.lock().unwrap().unreachable = true;
        self
    }

    pub(crate) fn lookups(&self) -> Vec<Selector> {
        self.state.lock().unwrap().lookups.clone()
    }

    pub(crate) fn url(&self) -> String {
        self.state.lock().unwrap().url.clone()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    fn live(&self) -> Result<std::sync::MutexGuard<'_, State>, CmdError> {
        let state = self.state.lock().unwrap();
        if state.closed {
            Err(CmdError::Closed)
        } else {
            Ok(state)
        }
    }

    fn node<T>(&self, id: usize, f: impl FnOnce(&mut Node) -> T) -> Result<T, CmdError> {
        let mut state = self.live()?;
        match state.nodes.get_mut(id) {
            Some(node) => Ok(f(node)),
            None => Err(CmdError::NoSuchElement(WebDriver::new(
                ErrorStatus::StaleElementReference,
                "element is gone",
            ))),
        }
    }

    fn interact(&self, id: usize, f: impl FnOnce(&mut Node)) -> Result<Option<String>, CmdError> {
        self.node(id, |node| {
            if !node.interactable || !node.displayed {
                return Err(CmdError::NotInteractable(WebDriver::new(
                    ErrorStatus::ElementNotInteractable,
                    "element not interactable",
                )));
            }
            f(node);
            Ok(node.navigates_to.clone())
        })?
    }
}

impl Browser for MockBrowser {
    type Element = usize;

    async fn navigate(&self, url: &str) -> Result<(), CmdError> {
        let mut state = self.live()?;
        if state.unreachable {
            return Err(CmdError::Standard(WebDriver::new(
                ErrorStatus::UnknownError,
                "net::ERR_NAME_NOT_RESOLVED",
            )));
        }
        state.url = url.to_string();
        Ok(())
    }

    async fn title(&self) -> Result<String, CmdError> {
        Ok(self.live()?.title.clone())
    }

    async fn current_url(&self) -> Result<String, CmdError> {
        Ok(self.live()?.url.clone())
    }

    async fn find(&self, selector: &Selector) -> Result<usize, CmdError> {
        let mut state = self.live()?;
        state.lookups.push(*selector);
        if state.invalid.contains(selector) {
            return Err(CmdError::Standard(WebDriver::new(
                ErrorStatus::InvalidSelector,
                format!("invalid selector: {}", selector),
            )));
        }
        let hit = state
            .nodes
            .iter()
            .position(|n| n.parent.is_none() && n.selector == *selector);
        match hit {
            Some(id) if state.nodes[id].late_by > 0 => {
                state.nodes[id].late_by -= 1;
                Err(miss(selector))
            }
            Some(id) => Ok(id),
            None => Err(miss(selector)),
        }
    }

    async fn find_all_in(&self, parent: &usize, selector: &Selector) -> Result<Vec<usize>, CmdError> {
        let mut state = self.live()?;
        state.lookups.push(*selector);
        Ok(state
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.parent == Some(*parent) && n.selector == *selector)
            .map(|(id, _)| id)
            .collect())
    }

    async fn is_displayed(&self, element: &usize) -> Result<bool, CmdError> {
        self.node(*element, |n| n.displayed)
    }

    async fn is_enabled(&self, element: &usize) -> Result<bool, CmdError> {
        self.node(*element, |n| n.enabled)
    }

    async fn clear(&self, element: &usize) -> Result<(), CmdError> {
        self.interact(*element, |n| n.value.clear())?;
        Ok(())
    }

    async fn send_keys(&self, element: &usize, text: &str) -> Result<(), CmdError> {
        self.interact(*element, |n| n.value.push_str(text))?;
        Ok(())
    }

    async fn click(&self, element: &usize) -> Result<(), CmdError> {
        if let Some(url) = self.interact(*element, |_| ())? {
            self.live()?.url = url;
        }
        Ok(())
    }

    async fn text(&self, element: &usize) -> Result<String, CmdError> {
        self.node(*element, |n| n.text.clone())
    }

    async fn property(&self, element: &usize, name: &str) -> Result<Option<String>, CmdError> {
        self.node(*element, |n| match name {
            "value" => Some(n.value.clone()),
            _ => None,
        })
    }

    async fn close(self) -> Result<(), CmdError> {
        self.live()?.closed = true;
        Ok(())
    }
}
