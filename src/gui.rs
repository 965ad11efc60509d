use crate::drag::DragController;
use crate::field::{Field, FieldId, FieldMeta, FieldType, PixelCoords};
use crate::geometry::PageBox;
use crate::layout_watch::{PollingWatcher, ScrollPhase, WindowEvent};
use crate::overlay::{
    render_field, render_tooltip, FieldOverlay, PulseQueue, TooltipColor, ValidationTracker,
};
use crate::registry::{ElementId, MemoryRegistry};
use crate::settings::Settings;
use crate::sync::PositionSynchronizer;
use eframe::egui;
use std::rc::Rc;

const PAGE_ASPECT: f32 = 842.0 / 595.0;
const AUTO_SIZE_PX: f32 = 18.0;

struct PlacedField {
    field: Field,
    wrapper: ElementId,
    drag: DragController,
    sync: Option<PositionSynchronizer>,
    validation: ValidationTracker,
}

/// Single-page signing preview. Fields can be dragged while unsigned;
/// clicking one without dragging toggles it as signed.
pub struct SigningDemoApp {
    settings: Settings,
    registry: Rc<MemoryRegistry>,
    watcher: Rc<PollingWatcher>,
    page: ElementId,
    fields: Vec<PlacedField>,
    pulses: PulseQueue,
    scroll_offset: f32,
    screen: egui::Rect,
}

impl SigningDemoApp {
    pub fn new(settings: Settings) -> Self {
        let registry = Rc::new(MemoryRegistry::with_page_attribute(
            settings.page_number_attribute.clone(),
        ));
        let watcher = Rc::new(PollingWatcher::new(registry.clone()));
        let page = registry.insert_page(1, PageBox::default());

        let fields = sample_fields()
            .into_iter()
            .map(|field| {
                let wrapper = registry.insert_element(None, PageBox::default());
                registry.insert_field(field.id, Some(wrapper), PageBox::default());
                let sync = match PositionSynchronizer::mount_with_attribute(
                    &field,
                    registry.clone(),
                    watcher.clone(),
                    &settings.validate_attribute,
                ) {
                    Ok(sync) => Some(sync),
                    Err(e) => {
                        tracing::warn!(field = %field.id, "overlay sync unavailable: {e:#}");
                        None
                    }
                };
                PlacedField {
                    drag: DragController::with_threshold(
                        &field,
                        !field.inserted,
                        settings.drag_threshold(),
                    ),
                    validation: ValidationTracker::new(settings.validate_attribute.clone()),
                    field,
                    wrapper,
                    sync,
                }
            })
            .collect();

        Self {
            pulses: PulseQueue::new(settings.validate_attribute.clone()),
            settings,
            registry,
            watcher,
            page,
            fields,
            scroll_offset: 0.0,
            screen: egui::Rect::NOTHING,
        }
    }

    fn layout_fields(&self) {
        for placed in &self.fields {
            if let Some(px) = placed.drag.to_pixels(&*self.registry) {
                self.registry.set_bounds(
                    placed.wrapper,
                    PageBox::new(px.x, px.y, px.width, px.height),
                );
            }
        }
    }

    fn handle_pointer(&mut self, ctx: &egui::Context) {
        let (pressed, released, pos) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });
        let Some(pos) = pos else {
            return;
        };
        let client = (pos.x as f64, pos.y as f64);

        if pressed {
            if let Some(placed) = self
                .fields
                .iter_mut()
                .rev()
                .find(|placed| overlay_rect(&placed.field, current_coords(placed)).contains(pos))
            {
                placed.drag.on_pointer_down(client);
            }
        }

        for placed in self.fields.iter_mut().filter(|p| p.drag.is_dragging()) {
            if let Some(update) = placed.drag.on_pointer_move(client, &*self.registry) {
                if let Some(pulse) = update.pulse {
                    self.pulses.raise(pulse, &*self.registry);
                }
            }
        }

        if released {
            for placed in self.fields.iter_mut().filter(|p| p.drag.is_dragging()) {
                if !placed.drag.on_pointer_up() {
                    placed.field.inserted = !placed.field.inserted;
                    placed.drag.set_enabled(!placed.field.inserted);
                    tracing::info!(
                        field = %placed.field.id,
                        inserted = placed.field.inserted,
                        "field toggled"
                    );
                }
            }
        }
    }

    fn pump_overlays(&mut self) {
        for placed in &mut self.fields {
            let Some(sync) = placed.sync.as_mut() else {
                continue;
            };
            match sync.pump() {
                Ok(outcome) if outcome.validate_touched => {
                    placed
                        .validation
                        .refresh(&*self.registry, placed.field.id);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(field = %placed.field.id, "overlay pump failed: {e:#}"),
            }
        }
    }

    fn paint_overlays(&self, ctx: &egui::Context) {
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("field-overlays"),
        ));

        for placed in &self.fields {
            let coords = current_coords(placed);
            let overlay = render_field(
                &placed.field,
                coords,
                None,
                placed.validation.is_validating(),
            );
            let rect = style_rect(&overlay);
            let fill = if overlay.inserted {
                egui::Color32::from_rgb(220, 245, 225)
            } else {
                egui::Color32::from_rgba_unmultiplied(255, 255, 255, 230)
            };
            let ring = if overlay.ring_warning {
                egui::Color32::from_rgb(253, 186, 116)
            } else {
                egui::Color32::from_gray(200)
            };
            painter.rect_filled(rect, 2.0, fill);
            painter.rect_stroke(rect, 2.0, egui::Stroke::new(2.0, ring));
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                field_label(&placed.field),
                egui::FontId::proportional(12.0),
                egui::Color32::DARK_GRAY,
            );

            let tooltip = render_tooltip(
                &placed.field,
                coords,
                if placed.field.is_unsigned_and_required() {
                    TooltipColor::Warning
                } else {
                    TooltipColor::Default
                },
            );
            if tooltip.open {
                let color = match tooltip.color {
                    TooltipColor::Warning => egui::Color32::from_rgb(154, 52, 18),
                    TooltipColor::Default => egui::Color32::BLACK,
                };
                painter.text(
                    egui::pos2(
                        (tooltip.style.left + tooltip.style.width.unwrap_or(0.0) / 2.0) as f32,
                        tooltip.style.top as f32 - 2.0,
                    ),
                    egui::Align2::CENTER_BOTTOM,
                    tooltip_text(&placed.field),
                    egui::FontId::proportional(11.0),
                    color,
                );
            }
        }
    }
}

impl eframe::App for SigningDemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        use egui::*;

        self.pulses.on_animation_frame(&*self.registry);

        let mut page_rect = Rect::NOTHING;
        let mut offset = self.scroll_offset;
        CentralPanel::default().show(ctx, |ui| {
            ui.heading("Document preview");
            ui.label(format!(
                "Drag threshold {:.1}px. Drag unsigned fields, click to sign.",
                self.settings.drag_threshold()
            ));
            let output = ScrollArea::vertical().show(ui, |ui| {
                let width = ui.available_width().min(700.0);
                let (rect, _) =
                    ui.allocate_exact_size(vec2(width, width * PAGE_ASPECT), Sense::hover());
                ui.painter().rect_filled(rect, 0.0, Color32::WHITE);
                ui.painter()
                    .rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::from_gray(180)));
                rect
            });
            page_rect = output.inner;
            offset = output.state.offset.y;
        });

        self.registry.set_bounds(
            self.page,
            PageBox::new(
                page_rect.left() as f64,
                page_rect.top() as f64,
                page_rect.width() as f64,
                page_rect.height() as f64,
            ),
        );

        self.handle_pointer(ctx);
        self.layout_fields();

        let screen = ctx.screen_rect();
        if screen != self.screen {
            self.screen = screen;
            self.watcher.notify_window(WindowEvent::Resized);
        }
        if offset != self.scroll_offset {
            self.scroll_offset = offset;
            self.watcher
                .notify_window(WindowEvent::Scrolled(ScrollPhase::Capture));
        }
        self.watcher.poll();
        self.pump_overlays();
        self.paint_overlays(ctx);

        if self.pulses.pending() > 0 || self.fields.iter().any(|p| p.drag.is_dragging()) {
            ctx.request_repaint();
        }
    }
}

fn current_coords(placed: &PlacedField) -> PixelCoords {
    placed
        .sync
        .as_ref()
        .map(PositionSynchronizer::coords)
        .unwrap_or_default()
}

fn overlay_rect(field: &Field, coords: PixelCoords) -> egui::Rect {
    style_rect(&render_field(field, coords, None, false))
}

fn style_rect(overlay: &FieldOverlay) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(overlay.style.left as f32, overlay.style.top as f32),
        egui::vec2(
            overlay.style.width.map_or(AUTO_SIZE_PX, |w| w as f32),
            overlay.style.height.map_or(AUTO_SIZE_PX, |h| h as f32),
        ),
    )
}

fn field_label(field: &Field) -> String {
    match field.field_type {
        FieldType::Checkbox | FieldType::Radio if field.inserted => "x".to_string(),
        FieldType::Checkbox | FieldType::Radio => String::new(),
        _ if field.inserted => "Signed".to_string(),
        other => format!("{other:?}"),
    }
}

fn tooltip_text(field: &Field) -> String {
    field
        .field_meta
        .as_ref()
        .and_then(|meta| meta.label.clone())
        .unwrap_or_else(|| format!("{:?}", field.field_type))
}

fn sample_fields() -> Vec<Field> {
    let field = |id: i64, x: f64, y: f64, w: f64, h: f64, field_type: FieldType| Field {
        id: FieldId(id),
        page: 1,
        position_x: x,
        position_y: y,
        width: w,
        height: h,
        field_type,
        inserted: false,
        field_meta: None,
        field_signed_position: None,
    };

    let mut text = field(3, 10.0, 40.0, 30.0, 4.0, FieldType::Text);
    text.field_meta = Some(FieldMeta {
        label: Some("Job title".to_string()),
        required: Some(true),
        ..FieldMeta::default()
    });

    vec![
        field(1, 10.0, 80.0, 25.0, 6.0, FieldType::Signature),
        field(2, 60.0, 80.0, 20.0, 4.0, FieldType::Date),
        text,
        field(4, 10.0, 50.0, 3.0, 2.0, FieldType::Checkbox),
    ]
}
