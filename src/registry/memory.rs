use super::{ElementId, ElementRegistry, PAGE_NUMBER_ATTRIBUTE};
use crate::field::FieldId;
use crate::geometry::PageBox;
use slab::Slab;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

const ID_ATTRIBUTE: &str = "id";

#[derive(Debug, Clone, Default)]
struct ElementNode {
    generation: u64,
    parent: Option<ElementId>,
    bounds: PageBox,
    attributes: HashMap<String, String>,
}

/// In-memory element tree for hosts without a document model of their own,
/// and for tests.
///
/// Pages are discovered by their page-number attribute and fields by their
/// `field-{id}` element id, the same way a browser host would query them.
/// Removed elements free their slot, but handles to them stay dead.
#[derive(Debug)]
pub struct MemoryRegistry {
    nodes: RefCell<Slab<ElementNode>>,
    next_generation: Cell<u64>,
    page_attribute: String,
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::with_page_attribute(PAGE_NUMBER_ATTRIBUTE)
    }

    pub fn with_page_attribute(page_attribute: impl Into<String>) -> Self {
        Self {
            nodes: RefCell::new(Slab::new()),
            next_generation: Cell::new(0),
            page_attribute: page_attribute.into(),
        }
    }

    pub fn insert_element(&self, parent: Option<ElementId>, bounds: PageBox) -> ElementId {
        let generation = self.next_generation.get();
        self.next_generation.set(generation + 1);
        let key = self.nodes.borrow_mut().insert(ElementNode {
            generation,
            parent,
            bounds,
            attributes: HashMap::new(),
        });
        ElementId::new(key, generation)
    }

    pub fn insert_page(&self, page: u32, bounds: PageBox) -> ElementId {
        let id = self.insert_element(None, bounds);
        self.set_attribute(id, &self.page_attribute, &page.to_string());
        id
    }

    /// Inserts the root container of a field under `parent`, which plays the
    /// role of the overlay wrapper positioned by the renderer.
    pub fn insert_field(
        &self,
        field: FieldId,
        parent: Option<ElementId>,
        bounds: PageBox,
    ) -> ElementId {
        let id = self.insert_element(parent, bounds);
        self.set_attribute(id, ID_ATTRIBUTE, &field.dom_id());
        id
    }

    pub fn set_bounds(&self, element: ElementId, bounds: PageBox) {
        self.with_node_mut(element, |node| node.bounds = bounds);
    }

    /// Removes an element. Children keep a dangling parent handle which
    /// resolves to nothing, like a detached DOM subtree.
    pub fn remove(&self, element: ElementId) -> bool {
        if !self.contains(element) {
            return false;
        }
        self.nodes.borrow_mut().try_remove(element.index()).is_some()
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.with_node(element, |_| ()).is_some()
    }

    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    fn find_by_attribute(&self, name: &str, value: &str) -> Option<ElementId> {
        self.nodes
            .borrow()
            .iter()
            .filter(|(_, node)| node.attributes.get(name).map(String::as_str) == Some(value))
            .map(|(key, node)| ElementId::new(key, node.generation))
            .min()
    }

    fn with_node<R>(&self, element: ElementId, f: impl FnOnce(&ElementNode) -> R) -> Option<R> {
        self.nodes
            .borrow()
            .get(element.index())
            .filter(|node| node.generation == element.generation())
            .map(f)
    }

    fn with_node_mut<R>(
        &self,
        element: ElementId,
        f: impl FnOnce(&mut ElementNode) -> R,
    ) -> Option<R> {
        self.nodes
            .borrow_mut()
            .get_mut(element.index())
            .filter(|node| node.generation == element.generation())
            .map(f)
    }
}

impl ElementRegistry for MemoryRegistry {
    fn page_element(&self, page: u32) -> Option<ElementId> {
        self.find_by_attribute(&self.page_attribute, &page.to_string())
    }

    fn field_element(&self, field: FieldId) -> Option<ElementId> {
        self.find_by_attribute(ID_ATTRIBUTE, &field.dom_id())
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        let parent = self.with_node(element, |node| node.parent)??;
        self.contains(parent).then_some(parent)
    }

    fn bounding_box(&self, element: ElementId) -> Option<PageBox> {
        self.with_node(element, |node| node.bounds)
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.with_node(element, |node| node.attributes.get(name).cloned())?
    }

    fn set_attribute(&self, element: ElementId, name: &str, value: &str) {
        self.with_node_mut(element, |node| {
            node.attributes.insert(name.to_string(), value.to_string());
        });
    }
}
