use crate::field::{Field, FieldId, PercentCoords, PixelCoords};
use crate::geometry::{pointer_to_percent, to_pixels};
use crate::registry::{ElementId, ElementRegistry, PageLocator};

/// Pointer travel, in pixels on either axis, that turns a press into a drag.
pub const DEFAULT_DRAG_THRESHOLD_PX: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    start: (f64, f64),
    did_drag: bool,
}

impl DragSession {
    pub fn start(&self) -> (f64, f64) {
        self.start
    }

    pub fn did_drag(&self) -> bool {
        self.did_drag
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging(DragSession),
}

/// Request to flip the validation attribute of a field container on and,
/// one frame later, off again so validity styling is recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatePulse {
    pub element: ElementId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    pub position: PercentCoords,
    pub pulse: Option<ValidatePulse>,
}

/// Pointer drag state for a single field.
///
/// Positions are tracked in percent of the page so they stay valid when the
/// page is re-rendered at a different scale.
#[derive(Debug, Clone)]
pub struct DragController {
    field_id: FieldId,
    page: u32,
    size: PercentCoords,
    enabled: bool,
    threshold: f64,
    pos_percent: PercentCoords,
    state: DragState,
}

impl DragController {
    pub fn new(field: &Field, enabled: bool) -> Self {
        Self::with_threshold(field, enabled, DEFAULT_DRAG_THRESHOLD_PX)
    }

    pub fn with_threshold(field: &Field, enabled: bool, threshold: f64) -> Self {
        Self {
            field_id: field.id,
            page: field.page,
            size: field.size_percent(),
            enabled,
            threshold: threshold.max(0.0),
            pos_percent: field.initial_percent(),
            state: DragState::Idle,
        }
    }

    pub fn field_id(&self) -> FieldId {
        self.field_id
    }

    pub fn pos_percent(&self) -> PercentCoords {
        self.pos_percent
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Disabling mid-drag turns further move and up events into no-ops.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Picks up a changed source record. The live position is only re-seeded
    /// while no drag is in progress.
    pub fn sync_field(&mut self, field: &Field) {
        self.field_id = field.id;
        self.page = field.page;
        self.size = field.size_percent();
        if !self.is_dragging() {
            self.pos_percent = field.initial_percent();
        }
    }

    pub fn to_pixels(&self, registry: &dyn ElementRegistry) -> Option<PixelCoords> {
        let page_box = PageLocator::new(registry).page_box(self.page);
        to_pixels(self.pos_percent, self.size, page_box.as_ref())
    }

    pub fn on_pointer_down(&mut self, client: (f64, f64)) {
        if !self.enabled {
            return;
        }

        tracing::debug!(field = %self.field_id, x = client.0, y = client.1, "drag start");
        self.state = DragState::Dragging(DragSession {
            start: client,
            did_drag: false,
        });
    }

    pub fn on_pointer_move(
        &mut self,
        client: (f64, f64),
        registry: &dyn ElementRegistry,
    ) -> Option<DragUpdate> {
        if !self.enabled {
            return None;
        }
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };

        let page_box = PageLocator::new(registry).page_box(self.page)?;
        let position = pointer_to_percent(client, self.size, &page_box)?;

        let dx = (client.0 - session.start.0).abs();
        let dy = (client.1 - session.start.1).abs();
        if dx > self.threshold || dy > self.threshold {
            session.did_drag = true;
        }

        self.pos_percent = position;

        let pulse = registry
            .field_element(self.field_id)
            .and_then(|element| registry.parent(element))
            .map(|element| ValidatePulse { element });

        Some(DragUpdate { position, pulse })
    }

    /// Ends the gesture and reports whether it was a drag rather than a
    /// click.
    pub fn on_pointer_up(&mut self) -> bool {
        if !self.enabled {
            return false;
        }

        let did_drag = match self.state {
            DragState::Dragging(session) => session.did_drag,
            DragState::Idle => false,
        };
        self.state = DragState::Idle;
        tracing::debug!(field = %self.field_id, did_drag, "drag end");
        did_drag
    }

    /// Drops an unfinished session, e.g. when the pointer was released
    /// outside the host window and no up event arrived.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }
}
