pub mod memory;

use crate::field::FieldId;
use crate::geometry::PageBox;

pub use memory::MemoryRegistry;

pub const PAGE_NUMBER_ATTRIBUTE: &str = "data-page-number";
pub const VALIDATE_ATTRIBUTE: &str = "data-validate";

/// Opaque handle to an element owned by the hosting UI.
///
/// The generation tells apart elements that were given the same slot after
/// an earlier element was removed, so a stale handle never resolves to a
/// newer element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    index: usize,
    generation: u64,
}

impl ElementId {
    pub const fn new(index: usize, generation: u64) -> Self {
        Self { index, generation }
    }

    pub fn index(self) -> usize {
        self.index
    }

    pub fn generation(self) -> u64 {
        self.generation
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Element lookup and layout queries supplied by the hosting UI.
///
/// Every lookup may fail: pages are rendered lazily and fields mount after
/// their page, so callers treat `None` as "not yet available".
pub trait ElementRegistry {
    /// The container rendered for the given 1-based page number.
    fn page_element(&self, page: u32) -> Option<ElementId>;
    /// The root container of a field, i.e. the element with id `field-{id}`.
    fn field_element(&self, field: FieldId) -> Option<ElementId>;
    fn parent(&self, element: ElementId) -> Option<ElementId>;
    fn bounding_box(&self, element: ElementId) -> Option<PageBox>;
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;
    fn set_attribute(&self, element: ElementId, name: &str, value: &str);
}

/// Resolves page numbers to rendered page elements.
pub struct PageLocator<'a> {
    registry: &'a dyn ElementRegistry,
}

impl<'a> PageLocator<'a> {
    pub fn new(registry: &'a dyn ElementRegistry) -> Self {
        Self { registry }
    }

    pub fn find_page_element(&self, page: u32) -> Option<ElementId> {
        if page == 0 {
            return None;
        }
        let found = self.registry.page_element(page);
        if found.is_none() {
            tracing::trace!(page, "page element not mounted");
        }
        found
    }

    /// Measurable box of the page, or `None` while it is unmounted or not yet
    /// laid out.
    pub fn page_box(&self, page: u32) -> Option<PageBox> {
        let element = self.find_page_element(page)?;
        self.registry
            .bounding_box(element)
            .filter(PageBox::is_measurable)
    }
}
