use super::{LayoutSignal, LayoutWatcher, SubscriptionId, WindowEvent};
use crate::geometry::PageBox;
use crate::registry::{ElementId, ElementRegistry};
use anyhow::Result;
use slab::Slab;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::Sender;

#[derive(Debug)]
enum Watch {
    Resize {
        element: ElementId,
        last: Option<PageBox>,
    },
    Attributes {
        element: ElementId,
        names: Vec<String>,
        last: Vec<Option<String>>,
    },
    Window,
}

#[derive(Debug)]
struct Subscription {
    watch: Watch,
    tx: Sender<LayoutSignal>,
}

/// Layout watcher for hosts without native resize or mutation
/// notifications.
///
/// The host calls [`PollingWatcher::poll`] once per frame; boxes and watched
/// attributes are compared with the previous poll and differences are
/// reported as signals. Window events are forwarded as they are reported.
pub struct PollingWatcher {
    registry: Rc<dyn ElementRegistry>,
    subscriptions: RefCell<Slab<Subscription>>,
}

impl PollingWatcher {
    pub fn new(registry: Rc<dyn ElementRegistry>) -> Self {
        Self {
            registry,
            subscriptions: RefCell::new(Slab::new()),
        }
    }

    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// Compares the current layout with the previous poll. Returns the number
    /// of signals delivered.
    pub fn poll(&self) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();
        let mut subscriptions = self.subscriptions.borrow_mut();

        for (key, subscription) in subscriptions.iter_mut() {
            let signals = match &mut subscription.watch {
                Watch::Resize { element, last } => {
                    let current = self.registry.bounding_box(*element);
                    if current != *last {
                        *last = current;
                        vec![LayoutSignal::Resized(*element)]
                    } else {
                        Vec::new()
                    }
                }
                Watch::Attributes {
                    element,
                    names,
                    last,
                } => {
                    let mut changed = Vec::new();
                    for (name, previous) in names.iter().zip(last.iter_mut()) {
                        let current = self.registry.attribute(*element, name);
                        if current != *previous {
                            *previous = current;
                            changed.push(LayoutSignal::Mutated {
                                element: *element,
                                attribute: name.clone(),
                            });
                        }
                    }
                    changed
                }
                Watch::Window => Vec::new(),
            };

            for signal in signals {
                if subscription.tx.send(signal).is_err() {
                    closed.push(key);
                    break;
                }
                delivered += 1;
            }
        }

        for key in closed {
            tracing::debug!(subscription = key, "dropping subscription with closed receiver");
            subscriptions.remove(key);
        }

        delivered
    }

    pub fn notify_window(&self, event: WindowEvent) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();
        let mut subscriptions = self.subscriptions.borrow_mut();

        for (key, subscription) in subscriptions.iter() {
            if !matches!(subscription.watch, Watch::Window) {
                continue;
            }
            if subscription.tx.send(LayoutSignal::Window(event)).is_err() {
                closed.push(key);
            } else {
                delivered += 1;
            }
        }

        for key in closed {
            subscriptions.remove(key);
        }

        delivered
    }

    fn insert(&self, watch: Watch, tx: Sender<LayoutSignal>) -> SubscriptionId {
        let key = self
            .subscriptions
            .borrow_mut()
            .insert(Subscription { watch, tx });
        SubscriptionId(key)
    }
}

impl LayoutWatcher for PollingWatcher {
    fn observe_resize(
        &self,
        element: ElementId,
        tx: Sender<LayoutSignal>,
    ) -> Result<SubscriptionId> {
        let last = self.registry.bounding_box(element);
        Ok(self.insert(Watch::Resize { element, last }, tx))
    }

    fn observe_attributes(
        &self,
        element: ElementId,
        attributes: &[String],
        tx: Sender<LayoutSignal>,
    ) -> Result<SubscriptionId> {
        let last = attributes
            .iter()
            .map(|name| self.registry.attribute(element, name))
            .collect();
        Ok(self.insert(
            Watch::Attributes {
                element,
                names: attributes.to_vec(),
                last,
            },
            tx,
        ))
    }

    fn listen_window(&self, tx: Sender<LayoutSignal>) -> Result<SubscriptionId> {
        Ok(self.insert(Watch::Window, tx))
    }

    fn release(&self, id: SubscriptionId) {
        self.subscriptions.borrow_mut().try_remove(id.0);
    }
}
