use crate::field::{PercentCoords, PixelCoords};

/// Bounding box of a rendered page in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PageBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A page that has not been laid out yet reports a zero-sized box.
    pub fn is_measurable(&self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn as_pixels(&self) -> PixelCoords {
        PixelCoords {
            x: self.left,
            y: self.top,
            width: self.width,
            height: self.height,
        }
    }
}

/// Restricts `value` to `[0, max(0, 100 - size)]`.
///
/// Fields wider than the page pin to the origin instead of producing an
/// inverted range. NaN inputs saturate to 0.
pub fn clamp_percent(value: f64, size: f64) -> f64 {
    let size = if size.is_finite() { size.max(0.0) } else { 0.0 };
    let upper = (100.0 - size).max(0.0);
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, upper)
}

pub fn to_pixels(
    pos: PercentCoords,
    size: PercentCoords,
    page: Option<&PageBox>,
) -> Option<PixelCoords> {
    let page = page.filter(|page| page.is_measurable())?;

    Some(PixelCoords {
        x: page.left + pos.x / 100.0 * page.width,
        y: page.top + pos.y / 100.0 * page.height,
        width: size.x.max(0.0) / 100.0 * page.width,
        height: size.y.max(0.0) / 100.0 * page.height,
    })
}

pub fn to_percent_delta(delta: (f64, f64), page: &PageBox) -> Option<PercentCoords> {
    if !page.is_measurable() {
        return None;
    }

    Some(PercentCoords {
        x: delta.0 / page.width * 100.0,
        y: delta.1 / page.height * 100.0,
    })
}

/// Maps a pointer in client coordinates to the top-left percent position of
/// a field of `size`, centering the field under the pointer.
pub fn pointer_to_percent(
    client: (f64, f64),
    size: PercentCoords,
    page: &PageBox,
) -> Option<PercentCoords> {
    let raw = to_percent_delta((client.0 - page.left, client.1 - page.top), page)?;

    Some(PercentCoords {
        x: clamp_percent(raw.x - size.x / 2.0, size.x),
        y: clamp_percent(raw.y - size.y / 2.0, size.y),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn page() -> PageBox {
        PageBox::new(40.0, 120.0, 1000.0, 2000.0)
    }

    #[test]
    fn clamp_stays_in_range_for_valid_sizes() {
        for size in [0.0, 1.0, 25.0, 99.5, 100.0] {
            for value in [-50.0, 0.0, 10.0, 50.0, 99.0, 150.0] {
                let clamped = clamp_percent(value, size);
                assert!(clamped >= 0.0);
                assert!(clamped <= 100.0 - size);
            }
        }
    }

    #[test]
    fn oversized_field_pins_to_origin() {
        assert_eq!(clamp_percent(30.0, 140.0), 0.0);
        assert_eq!(clamp_percent(-5.0, 140.0), 0.0);
    }

    #[test]
    fn nan_saturates() {
        assert_eq!(clamp_percent(f64::NAN, 10.0), 0.0);
        assert_eq!(clamp_percent(20.0, f64::NAN), 20.0);
    }

    #[test]
    fn to_pixels_scales_against_page() {
        let px = to_pixels(
            PercentCoords { x: 10.0, y: 50.0 },
            PercentCoords { x: 20.0, y: 5.0 },
            Some(&page()),
        )
        .unwrap();
        assert_eq!(
            px,
            PixelCoords {
                x: 140.0,
                y: 1120.0,
                width: 200.0,
                height: 100.0
            }
        );
    }

    #[test]
    fn to_pixels_without_page_is_unavailable() {
        let pos = PercentCoords { x: 1.0, y: 1.0 };
        assert_eq!(to_pixels(pos, pos, None), None);
        let collapsed = PageBox::new(0.0, 0.0, 0.0, 300.0);
        assert_eq!(to_pixels(pos, pos, Some(&collapsed)), None);
    }

    #[test]
    fn percent_delta_recovers_position() {
        let page = page();
        let size = PercentCoords::default();
        for (x, y) in [(0.0, 0.0), (12.5, 87.25), (33.3, 66.6), (100.0, 100.0)] {
            let origin = to_pixels(PercentCoords::default(), size, Some(&page)).unwrap();
            let moved = to_pixels(PercentCoords { x, y }, size, Some(&page)).unwrap();
            let delta = (moved.x - origin.x, moved.y - origin.y);
            let back = to_percent_delta(delta, &page).unwrap();
            assert!((back.x - x).abs() < EPS);
            assert!((back.y - y).abs() < EPS);
        }
    }

    #[test]
    fn pointer_at_page_origin_clamps_centered_field() {
        let page = PageBox::new(0.0, 0.0, 1000.0, 2000.0);
        let size = PercentCoords { x: 20.0, y: 10.0 };
        let pos = pointer_to_percent((0.0, 0.0), size, &page).unwrap();
        assert_eq!(pos, PercentCoords { x: 0.0, y: 0.0 });
    }

    #[test]
    fn pointer_centers_field() {
        let page = PageBox::new(0.0, 0.0, 1000.0, 2000.0);
        let pos =
            pointer_to_percent((500.0, 1000.0), PercentCoords { x: 20.0, y: 10.0 }, &page).unwrap();
        assert!((pos.x - 40.0).abs() < EPS);
        assert!((pos.y - 45.0).abs() < EPS);
    }

    #[test]
    fn pointer_past_far_edge_clamps() {
        let page = PageBox::new(0.0, 0.0, 1000.0, 2000.0);
        let size = PercentCoords { x: 20.0, y: 10.0 };
        let pos = pointer_to_percent((5000.0, 9000.0), size, &page).unwrap();
        assert_eq!(pos, PercentCoords { x: 80.0, y: 90.0 });
    }
}
