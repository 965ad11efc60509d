use crate::drag::ValidatePulse;
use crate::field::{Field, FieldId, FieldType, PixelCoords};
use crate::registry::{ElementId, ElementRegistry, VALIDATE_ATTRIBUTE};

/// Overlays are mounted in a dedicated top-level layer by the host, never
/// inside the page tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayLayer {
    #[default]
    TopLevel,
}

/// Absolute placement of an overlay. Missing dimensions mean the content
/// sizes itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayStyle {
    pub top: f64,
    pub left: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Coordinates that take precedence over the synchronized box, e.g. while a
/// field is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoordsOverride {
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl From<PixelCoords> for CoordsOverride {
    fn from(coords: PixelCoords) -> Self {
        Self {
            x: coords.x,
            y: coords.y,
            width: Some(coords.width),
            height: Some(coords.height),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldOverlay {
    pub field_id: FieldId,
    pub dom_id: String,
    pub layer: OverlayLayer,
    pub style: OverlayStyle,
    pub field_type: FieldType,
    pub inserted: bool,
    /// Warning ring shown while validation is running on an unsigned
    /// required field.
    pub ring_warning: bool,
    pub padded: bool,
    pub centered: bool,
}

pub fn render_field(
    field: &Field,
    coords: PixelCoords,
    override_coords: Option<CoordsOverride>,
    validating: bool,
) -> FieldOverlay {
    let (top, left) = match override_coords {
        Some(o) => (o.y, o.x),
        None => (coords.y, coords.x),
    };

    let (width, height) = if field.field_type.auto_sizes() {
        (None, None)
    } else {
        (
            Some(
                override_coords
                    .and_then(|o| o.width)
                    .unwrap_or(coords.width),
            ),
            Some(
                override_coords
                    .and_then(|o| o.height)
                    .unwrap_or(coords.height),
            ),
        )
    };

    FieldOverlay {
        field_id: field.id,
        dom_id: field.id.dom_id(),
        layer: OverlayLayer::TopLevel,
        style: OverlayStyle {
            top,
            left,
            width,
            height,
        },
        field_type: field.field_type,
        inserted: field.inserted,
        ring_warning: validating && field.is_unsigned_and_required(),
        padded: !field.field_type.is_signature(),
        centered: !field.inserted,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TooltipColor {
    #[default]
    Default,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipOverlay {
    pub field_id: FieldId,
    /// Changes whenever the anchor moves so hosts remount the tooltip instead
    /// of animating a stale one.
    pub key: String,
    pub layer: OverlayLayer,
    pub style: OverlayStyle,
    pub open: bool,
    pub color: TooltipColor,
}

pub fn render_tooltip(field: &Field, coords: PixelCoords, color: TooltipColor) -> TooltipOverlay {
    TooltipOverlay {
        field_id: field.id,
        key: format!(
            "{}-{}-{}-{}-{}",
            field.id, coords.x, coords.y, coords.width, coords.height
        ),
        layer: OverlayLayer::TopLevel,
        style: OverlayStyle {
            top: coords.y,
            left: coords.x,
            width: Some(coords.width),
            height: Some(coords.height),
        },
        open: !field.inserted || field.field_meta.is_none(),
        color,
    }
}

/// Mirrors the validation attribute of a field container.
#[derive(Debug, Clone)]
pub struct ValidationTracker {
    attribute: String,
    validating: bool,
}

impl Default for ValidationTracker {
    fn default() -> Self {
        Self::new(VALIDATE_ATTRIBUTE)
    }
}

impl ValidationTracker {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            validating: false,
        }
    }

    pub fn is_validating(&self) -> bool {
        self.validating
    }

    /// Re-reads the attribute on the container of `field`. Returns whether
    /// the state flipped.
    pub fn refresh(&mut self, registry: &dyn ElementRegistry, field: FieldId) -> bool {
        let container = registry
            .field_element(field)
            .map(|element| registry.parent(element).unwrap_or(element));
        let validating = container
            .and_then(|element| registry.attribute(element, &self.attribute))
            .is_some_and(|value| value == "true");
        let flipped = validating != self.validating;
        self.validating = validating;
        flipped
    }
}

/// Pending validation pulses. Raised immediately, settled on the host's next
/// animation frame.
#[derive(Debug, Clone)]
pub struct PulseQueue {
    attribute: String,
    pending: Vec<ElementId>,
}

impl Default for PulseQueue {
    fn default() -> Self {
        Self::new(VALIDATE_ATTRIBUTE)
    }
}

impl PulseQueue {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            pending: Vec::new(),
        }
    }

    pub fn raise(&mut self, pulse: ValidatePulse, registry: &dyn ElementRegistry) {
        registry.set_attribute(pulse.element, &self.attribute, "true");
        if !self.pending.contains(&pulse.element) {
            self.pending.push(pulse.element);
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn on_animation_frame(&mut self, registry: &dyn ElementRegistry) -> usize {
        let settled = self.pending.len();
        for element in self.pending.drain(..) {
            registry.set_attribute(element, &self.attribute, "false");
        }
        settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldMeta;

    fn field(field_type: FieldType) -> Field {
        Field {
            id: FieldId(42),
            page: 1,
            position_x: 0.0,
            position_y: 0.0,
            width: 10.0,
            height: 10.0,
            field_type,
            inserted: false,
            field_meta: None,
            field_signed_position: None,
        }
    }

    fn coords() -> PixelCoords {
        PixelCoords {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
        }
    }

    #[test]
    fn checkbox_and_radio_omit_size() {
        for field_type in [FieldType::Checkbox, FieldType::Radio] {
            let overlay = render_field(&field(field_type), coords(), None, false);
            assert_eq!(overlay.style.width, None);
            assert_eq!(overlay.style.height, None);
            assert_eq!(overlay.style.top, 20.0);
            assert_eq!(overlay.style.left, 10.0);
        }
    }

    #[test]
    fn override_replaces_position_and_partial_size() {
        let overlay = render_field(
            &field(FieldType::Text),
            coords(),
            Some(CoordsOverride {
                x: 1.0,
                y: 2.0,
                width: Some(3.0),
                height: None,
            }),
            false,
        );
        assert_eq!(
            overlay.style,
            OverlayStyle {
                top: 2.0,
                left: 1.0,
                width: Some(3.0),
                height: Some(40.0)
            }
        );
    }

    #[test]
    fn signature_fields_are_not_padded() {
        assert!(!render_field(&field(FieldType::Signature), coords(), None, false).padded);
        assert!(render_field(&field(FieldType::Email), coords(), None, false).padded);
    }

    #[test]
    fn ring_only_for_unsigned_required_while_validating() {
        let mut f = field(FieldType::Text);
        assert!(render_field(&f, coords(), None, true).ring_warning);
        assert!(!render_field(&f, coords(), None, false).ring_warning);
        f.inserted = true;
        assert!(!render_field(&f, coords(), None, true).ring_warning);
    }

    #[test]
    fn tooltip_open_rules() {
        let mut f = field(FieldType::Text);
        assert!(render_tooltip(&f, coords(), TooltipColor::Default).open);
        f.inserted = true;
        assert!(render_tooltip(&f, coords(), TooltipColor::Default).open);
        f.field_meta = Some(FieldMeta::default());
        assert!(!render_tooltip(&f, coords(), TooltipColor::Default).open);
    }

    #[test]
    fn tooltip_key_tracks_coordinates() {
        let f = field(FieldType::Text);
        let a = render_tooltip(&f, coords(), TooltipColor::Warning);
        let mut moved = coords();
        moved.x += 1.0;
        let b = render_tooltip(&f, moved, TooltipColor::Warning);
        assert_eq!(a.key, "42-10-20-30-40");
        assert_ne!(a.key, b.key);
        assert_eq!(b.style.width, Some(30.0));
    }
}
