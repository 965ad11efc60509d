use crate::field::{Field, FieldId, PixelCoords};
use crate::geometry::to_pixels;
use crate::layout_watch::{watched_attributes, LayoutSignal, LayoutWatcher, WatchGroup};
use crate::registry::{ElementId, ElementRegistry, PageLocator, VALIDATE_ATTRIBUTE};
use anyhow::Result;
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PumpOutcome {
    pub signals: usize,
    pub coords_changed: bool,
    pub validate_touched: bool,
}

/// Keeps the pixel box of a mounted field overlay in step with the layout of
/// its container.
///
/// Until the field container is mounted the box is derived from the page
/// geometry; afterwards it follows the container (its parent when it has
/// one) on every resize, attribute mutation, window resize or scroll. When
/// the container is remounted elsewhere the subscriptions move with it.
pub struct PositionSynchronizer {
    field: Field,
    registry: Rc<dyn ElementRegistry>,
    watcher: Rc<dyn LayoutWatcher>,
    attributes: Vec<String>,
    validate_attribute: String,
    tx: Sender<LayoutSignal>,
    rx: Receiver<LayoutSignal>,
    watch: Option<Attachment>,
    coords: PixelCoords,
}

/// Subscriptions plus the elements they were taken on.
#[derive(Debug)]
struct Attachment {
    targets: Targets,
    group: WatchGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Targets {
    element: ElementId,
    parent: Option<ElementId>,
}

impl PositionSynchronizer {
    pub fn mount(
        field: &Field,
        registry: Rc<dyn ElementRegistry>,
        watcher: Rc<dyn LayoutWatcher>,
    ) -> Result<Self> {
        Self::mount_with_attribute(field, registry, watcher, VALIDATE_ATTRIBUTE)
    }

    pub fn mount_with_attribute(
        field: &Field,
        registry: Rc<dyn ElementRegistry>,
        watcher: Rc<dyn LayoutWatcher>,
        validate_attribute: &str,
    ) -> Result<Self> {
        let coords = fallback_coords(field, registry.as_ref()).unwrap_or_default();
        let (tx, rx) = channel();

        let mut sync = Self {
            field: field.clone(),
            registry,
            watcher,
            attributes: watched_attributes(validate_attribute),
            validate_attribute: validate_attribute.to_string(),
            tx,
            rx,
            watch: None,
            coords,
        };

        if let Some(targets) = sync.current_targets() {
            sync.attach(targets)?;
            sync.recompute();
        }

        Ok(sync)
    }

    pub fn field_id(&self) -> FieldId {
        self.field.id
    }

    pub fn coords(&self) -> PixelCoords {
        self.coords
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    /// Element whose box the overlay mirrors.
    pub fn target_element(&self) -> Option<ElementId> {
        let targets = self.current_targets()?;
        Some(targets.parent.unwrap_or(targets.element))
    }

    /// Re-reads the target box. Keeps the previous coordinates when the
    /// container cannot be measured.
    pub fn recompute(&mut self) -> PixelCoords {
        if let Some(bounds) = self
            .target_element()
            .and_then(|element| self.registry.bounding_box(element))
        {
            self.coords = bounds.as_pixels();
        }
        self.coords
    }

    /// Drains pending layout signals and recomputes once if any arrived.
    ///
    /// The subscriptions are re-taken whenever the field container or its
    /// parent is no longer the element they were taken on, which also covers
    /// a container that mounts after the synchronizer. While no container
    /// exists the page-derived box is refreshed instead, so geometry that
    /// becomes measurable later is still picked up.
    pub fn pump(&mut self) -> Result<PumpOutcome> {
        let mut outcome = PumpOutcome::default();
        let before = self.coords;

        let current = self.current_targets();
        if self.watch.as_ref().map(|attached| attached.targets) != current {
            self.detach();
            if let Some(targets) = current {
                self.attach(targets)?;
                outcome.signals += 1;
            }
        }

        if self.watch.is_none() {
            if let Some(fallback) = fallback_coords(&self.field, self.registry.as_ref()) {
                self.coords = fallback;
            }
            outcome.coords_changed = self.coords != before;
            return Ok(outcome);
        }

        loop {
            match self.rx.try_recv() {
                Ok(signal) => {
                    if let LayoutSignal::Mutated { attribute, .. } = &signal {
                        if *attribute == self.validate_attribute {
                            outcome.validate_touched = true;
                        }
                    }
                    outcome.signals += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if outcome.signals > 0 {
            self.recompute();
            outcome.coords_changed = self.coords != before;
            tracing::trace!(
                field = %self.field.id,
                signals = outcome.signals,
                changed = outcome.coords_changed,
                "overlay recomputed"
            );
        }

        Ok(outcome)
    }

    /// Releases every subscription. Dropping the synchronizer does the same.
    pub fn unmount(mut self) {
        self.detach();
    }

    fn current_targets(&self) -> Option<Targets> {
        let element = self.registry.field_element(self.field.id)?;
        Some(Targets {
            element,
            parent: self.registry.parent(element),
        })
    }

    fn attach(&mut self, targets: Targets) -> Result<()> {
        let group = WatchGroup::acquire(
            self.watcher.clone(),
            targets.element,
            targets.parent,
            &self.attributes,
            self.tx.clone(),
        )?;
        tracing::debug!(
            field = %self.field.id,
            element = %targets.element,
            subscriptions = group.len(),
            "overlay attached"
        );
        self.watch = Some(Attachment { targets, group });
        Ok(())
    }

    fn detach(&mut self) {
        if let Some(attached) = self.watch.take() {
            attached.group.release();
        }
    }
}

impl std::fmt::Debug for PositionSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionSynchronizer")
            .field("field_id", &self.field.id)
            .field("watch", &self.watch)
            .field("coords", &self.coords)
            .finish()
    }
}

/// Page-derived box used before the field container exists.
pub fn fallback_coords(field: &Field, registry: &dyn ElementRegistry) -> Option<PixelCoords> {
    let page_box = PageLocator::new(registry).page_box(field.page);
    to_pixels(
        field.initial_percent(),
        field.size_percent(),
        page_box.as_ref(),
    )
}
