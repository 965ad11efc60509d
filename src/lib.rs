pub mod drag;
pub mod error;
pub mod field;
pub mod files;
pub mod geometry;
pub mod gui;
pub mod layout_watch;
pub mod logging;
pub mod overlay;
pub mod registry;
pub mod settings;
pub mod sync;

pub use drag::{DragController, DragState, DragUpdate, ValidatePulse};
pub use field::{
    Field, FieldId, FieldMeta, FieldSignedPosition, FieldType, PercentCoords, PixelCoords,
};
pub use geometry::PageBox;
pub use registry::{ElementId, ElementRegistry, MemoryRegistry, PageLocator};
pub use sync::PositionSynchronizer;
