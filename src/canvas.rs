use std::collections::HashMap;

use egui::Vec2;

use crate::element::{Element, ElementBody, ElementId};
use crate::page::Background;
use crate::widgets::resize_handle::HandlePosition;

/// Gesture capabilities of a mounted element.
///
/// Derived purely from the element, never stored: every time an element
/// enters the canvas it is mounted again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interactivity {
    pub draggable: bool,
    pub resize_handles: Vec<HandlePosition>,
    pub rotatable: bool,
}

impl Interactivity {
    pub fn for_element(element: &Element) -> Self {
        let resize_handles = match &element.body {
            ElementBody::Shape(shape) if shape.variant.is_linear() => HandlePosition::HORIZONTAL.to_vec(),
            _ => HandlePosition::ALL.to_vec(),
        };
        Self {
            draggable: true,
            resize_handles,
            rotatable: true,
        }
    }

    pub fn allows(&self, handle: HandlePosition) -> bool {
        self.resize_handles.contains(&handle)
    }
}

/// The element set and background currently shown for editing.
///
/// The active page's stored record is only refreshed when the page manager
/// saves the canvas back, mirroring a live surface over a stored document.
#[derive(Debug, Clone)]
pub struct Canvas {
    size: Vec2,
    elements: Vec<Element>,
    background: Background,
    bindings: HashMap<ElementId, Interactivity>,
}

impl Canvas {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            elements: Vec::new(),
            background: Background::default(),
            bindings: HashMap::new(),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: Vec2) {
        self.size = size;
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub(crate) fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.elements.iter_mut()
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub(crate) fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    pub fn max_z(&self) -> Option<i32> {
        self.elements.iter().map(|e| e.z_index).max()
    }

    pub fn min_z(&self) -> Option<i32> {
        self.elements.iter().map(|e| e.z_index).min()
    }

    /// Add above everything else and mount it
    pub(crate) fn insert_top(&mut self, mut element: Element) -> ElementId {
        element.z_index = self.max_z().map_or(1, |z| z + 1);
        let id = element.id;
        self.elements.push(element);
        self.mount(id);
        id
    }

    /// Put an element back exactly where it was, keeping its z-index
    pub(crate) fn insert_at(&mut self, index: usize, element: Element) -> ElementId {
        let id = element.id;
        let index = index.min(self.elements.len());
        self.elements.insert(index, element);
        self.mount(id);
        id
    }

    pub(crate) fn remove(&mut self, id: ElementId) -> Option<(usize, Element)> {
        let index = self.index_of(id)?;
        self.bindings.remove(&id);
        Some((index, self.elements.remove(index)))
    }

    /// Replace the whole surface, as when a page is loaded
    pub(crate) fn load(&mut self, elements: Vec<Element>, background: Background) {
        self.elements = elements;
        self.background = background;
        self.bindings.clear();
        self.mount_all();
    }

    pub fn mount(&mut self, id: ElementId) {
        if let Some(element) = self.element(id) {
            let binding = Interactivity::for_element(element);
            self.bindings.insert(id, binding);
        }
    }

    pub fn mount_all(&mut self) {
        let bindings = self
            .elements
            .iter()
            .map(|e| (e.id, Interactivity::for_element(e)))
            .collect();
        self.bindings = bindings;
    }

    pub fn binding(&self, id: ElementId) -> Option<&Interactivity> {
        self.bindings.get(&id)
    }

    pub fn is_mounted(&self, id: ElementId) -> bool {
        self.bindings.contains_key(&id)
    }

    /// Elements in paint order: ascending z-index, insertion order breaking ties
    pub fn draw_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<(usize, &Element)> = self.elements.iter().enumerate().collect();
        ordered.sort_by_key(|(index, e)| (e.z_index, *index));
        ordered.into_iter().map(|(_, e)| e).collect()
    }

    /// Deep copy of the surface for storing into a page record
    pub fn snapshot(&self) -> (Vec<Element>, Background) {
        (self.elements.clone(), self.background.clone())
    }
}
