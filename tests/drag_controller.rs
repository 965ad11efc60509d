use field_overlay::drag::{DragController, DragState};
use field_overlay::field::{Field, FieldId, FieldType, PercentCoords};
use field_overlay::geometry::PageBox;
use field_overlay::registry::{ElementRegistry, MemoryRegistry};

fn signature_field() -> Field {
    Field {
        id: FieldId(11),
        page: 1,
        position_x: 30.0,
        position_y: 40.0,
        width: 20.0,
        height: 10.0,
        field_type: FieldType::Signature,
        inserted: false,
        field_meta: None,
        field_signed_position: None,
    }
}

fn page_registry() -> MemoryRegistry {
    let registry = MemoryRegistry::new();
    registry.insert_page(1, PageBox::new(0.0, 0.0, 1000.0, 2000.0));
    registry
}

#[test]
fn jitter_below_threshold_is_a_click() {
    let registry = page_registry();
    let mut drag = DragController::new(&signature_field(), true);

    drag.on_pointer_down((100.0, 100.0));
    drag.on_pointer_move((102.0, 101.0), &registry);

    assert!(!drag.on_pointer_up());
}

#[test]
fn travel_past_threshold_is_a_drag() {
    let registry = page_registry();
    let mut drag = DragController::new(&signature_field(), true);

    drag.on_pointer_down((100.0, 100.0));
    drag.on_pointer_move((105.0, 100.0), &registry);

    assert!(drag.on_pointer_up());
    assert_eq!(drag.state(), DragState::Idle);
}

#[test]
fn pointer_at_page_origin_pins_field_to_corner() {
    let registry = page_registry();
    let mut drag = DragController::new(&signature_field(), true);

    drag.on_pointer_down((10.0, 10.0));
    let update = drag.on_pointer_move((0.0, 0.0), &registry).unwrap();

    assert_eq!(update.position, PercentCoords { x: 0.0, y: 0.0 });
    assert_eq!(drag.pos_percent(), PercentCoords { x: 0.0, y: 0.0 });
}

#[test]
fn offset_page_is_respected() {
    let registry = MemoryRegistry::new();
    registry.insert_page(1, PageBox::new(200.0, 50.0, 1000.0, 2000.0));
    let mut drag = DragController::new(&signature_field(), true);

    drag.on_pointer_down((700.0, 1050.0));
    let update = drag.on_pointer_move((700.0, 1050.0), &registry).unwrap();

    assert_eq!(update.position, PercentCoords { x: 40.0, y: 45.0 });
}

#[test]
fn missing_page_keeps_last_position() {
    let registry = MemoryRegistry::new();
    let page = registry.insert_page(1, PageBox::new(0.0, 0.0, 1000.0, 2000.0));
    let mut drag = DragController::new(&signature_field(), true);

    drag.on_pointer_down((0.0, 0.0));
    drag.on_pointer_move((500.0, 1000.0), &registry);
    let last = drag.pos_percent();

    registry.remove(page);
    assert_eq!(drag.on_pointer_move((900.0, 1900.0), &registry), None);
    assert_eq!(drag.pos_percent(), last);
    assert!(drag.is_dragging());

    let page = registry.insert_page(1, PageBox::new(0.0, 0.0, 1000.0, 2000.0));
    assert!(registry.page_element(1) == Some(page));
    assert!(drag.on_pointer_move((900.0, 1900.0), &registry).is_some());
    assert_eq!(drag.pos_percent(), PercentCoords { x: 80.0, y: 90.0 });
}

#[test]
fn disabled_controller_ignores_everything() {
    let registry = page_registry();
    let mut drag = DragController::new(&signature_field(), false);
    let before = drag.pos_percent();

    drag.on_pointer_down((100.0, 100.0));
    assert_eq!(drag.on_pointer_move((400.0, 400.0), &registry), None);
    assert!(!drag.on_pointer_up());

    assert_eq!(drag.pos_percent(), before);
    assert_eq!(drag.state(), DragState::Idle);
}

#[test]
fn disabling_mid_drag_cancels_further_events() {
    let registry = page_registry();
    let mut drag = DragController::new(&signature_field(), true);

    drag.on_pointer_down((100.0, 100.0));
    drag.on_pointer_move((300.0, 300.0), &registry);
    let moved = drag.pos_percent();

    drag.set_enabled(false);
    assert_eq!(drag.on_pointer_move((600.0, 600.0), &registry), None);
    assert!(!drag.on_pointer_up());
    assert_eq!(drag.pos_percent(), moved);
}

#[test]
fn reset_abandons_unfinished_session() {
    let registry = page_registry();
    let mut drag = DragController::new(&signature_field(), true);

    drag.on_pointer_down((100.0, 100.0));
    drag.on_pointer_move((300.0, 300.0), &registry);
    drag.reset();

    assert!(!drag.is_dragging());
    assert!(!drag.on_pointer_up());
}

#[test]
fn move_emits_pulse_for_field_container() {
    let registry = page_registry();
    let wrapper = registry.insert_element(None, PageBox::default());
    registry.insert_field(FieldId(11), Some(wrapper), PageBox::default());
    let mut drag = DragController::new(&signature_field(), true);

    drag.on_pointer_down((100.0, 100.0));
    let update = drag.on_pointer_move((120.0, 100.0), &registry).unwrap();

    assert_eq!(update.pulse.map(|p| p.element), Some(wrapper));
}

#[test]
fn move_without_mounted_field_has_no_pulse() {
    let registry = page_registry();
    let mut drag = DragController::new(&signature_field(), true);

    drag.on_pointer_down((100.0, 100.0));
    let update = drag.on_pointer_move((120.0, 100.0), &registry).unwrap();

    assert_eq!(update.pulse, None);
}

#[test]
fn custom_threshold_applies() {
    let registry = page_registry();
    let mut drag = DragController::with_threshold(&signature_field(), true, 10.0);

    drag.on_pointer_down((100.0, 100.0));
    drag.on_pointer_move((108.0, 108.0), &registry);
    assert!(!drag.on_pointer_up());

    drag.on_pointer_down((100.0, 100.0));
    drag.on_pointer_move((111.0, 100.0), &registry);
    assert!(drag.on_pointer_up());
}
