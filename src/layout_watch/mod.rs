pub mod polling;

use crate::registry::ElementId;
use anyhow::{Context, Result};
use std::rc::Rc;
use std::sync::mpsc::Sender;

pub use polling::PollingWatcher;

/// Attributes whose mutation can move or restyle a field container.
pub const LAYOUT_ATTRIBUTES: [&str; 2] = ["style", "class"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    /// Scroll of a nested container, seen while the event travels down.
    Capture,
    Bubble,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Resized,
    Scrolled(ScrollPhase),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutSignal {
    Resized(ElementId),
    Mutated {
        element: ElementId,
        attribute: String,
    },
    Window(WindowEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub usize);

/// Layout change notifications provided by the hosting UI.
///
/// Implementations deliver signals through the sender handed over at
/// subscription time and stop once the subscription is released.
pub trait LayoutWatcher {
    fn observe_resize(&self, element: ElementId, tx: Sender<LayoutSignal>)
        -> Result<SubscriptionId>;
    fn observe_attributes(
        &self,
        element: ElementId,
        attributes: &[String],
        tx: Sender<LayoutSignal>,
    ) -> Result<SubscriptionId>;
    /// Window resize plus scroll in both phases.
    fn listen_window(&self, tx: Sender<LayoutSignal>) -> Result<SubscriptionId>;
    fn release(&self, id: SubscriptionId);
}

/// The set of subscriptions backing one mounted overlay.
///
/// Acquired all at once and released all at once: if any subscription fails
/// the ones already taken are released before the error is returned, and
/// dropping the group releases everything it holds.
pub struct WatchGroup {
    watcher: Rc<dyn LayoutWatcher>,
    subscriptions: Vec<SubscriptionId>,
}

impl WatchGroup {
    pub fn acquire(
        watcher: Rc<dyn LayoutWatcher>,
        element: ElementId,
        parent: Option<ElementId>,
        attributes: &[String],
        tx: Sender<LayoutSignal>,
    ) -> Result<Self> {
        let mut group = WatchGroup {
            watcher,
            subscriptions: Vec::with_capacity(5),
        };

        let targets: Vec<ElementId> = std::iter::once(element).chain(parent).collect();

        for target in &targets {
            let id = group
                .watcher
                .observe_resize(*target, tx.clone())
                .with_context(|| format!("observe resize of element {target}"))?;
            group.subscriptions.push(id);
        }

        for target in &targets {
            let id = group
                .watcher
                .observe_attributes(*target, attributes, tx.clone())
                .with_context(|| format!("observe attributes of element {target}"))?;
            group.subscriptions.push(id);
        }

        let id = group
            .watcher
            .listen_window(tx)
            .context("listen for window resize and scroll")?;
        group.subscriptions.push(id);

        Ok(group)
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn release(self) {
        drop(self);
    }
}

impl Drop for WatchGroup {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..).rev() {
            self.watcher.release(id);
        }
    }
}

impl std::fmt::Debug for WatchGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchGroup")
            .field("subscriptions", &self.subscriptions)
            .finish()
    }
}

/// Attribute filter for field containers: layout attributes plus the
/// validation trigger.
pub fn watched_attributes(validate_attribute: &str) -> Vec<String> {
    LAYOUT_ATTRIBUTES
        .iter()
        .map(|name| name.to_string())
        .chain(std::iter::once(validate_attribute.to_string()))
        .collect()
}
