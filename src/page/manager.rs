use crate::canvas::Canvas;
use crate::error::{ValidationError, ValidationResult};

use super::{Background, Page, PageId};

/// Owns every page of the design and tracks which one is on the canvas.
///
/// The canvas always shows exactly one page; there is never a state with
/// zero pages.
#[derive(Debug, Clone)]
pub struct PageManager {
    pages: Vec<Page>,
    current: PageId,
    next_id: u64,
}

impl Default for PageManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PageManager {
    pub fn new() -> Self {
        let first = PageId(1);
        Self {
            pages: vec![Page::new(first, "Page 1")],
            current: first,
            next_id: 2,
        }
    }

    /// Rebuild from stored pages. Falls back to a single blank page if `pages` is empty.
    pub fn from_pages(mut pages: Vec<Page>, current: Option<PageId>) -> Self {
        if pages.is_empty() {
            return Self::new();
        }
        pages.sort_by_key(|p| p.id);
        let next_id = pages.iter().map(|p| p.id.0).max().unwrap_or(0) + 1;
        let current = current
            .filter(|id| pages.iter().any(|p| p.id == *id))
            .unwrap_or(pages[0].id);
        Self {
            pages,
            current,
            next_id,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn current_id(&self) -> PageId {
        self.current
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.page(self.current)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn count_label(&self) -> String {
        format!("Total Pages: {}", self.pages.len())
    }

    /// Copy the canvas into the active page's record
    pub fn save_current(&mut self, canvas: &Canvas) {
        let current = self.current;
        if let Some(page) = self.pages.iter_mut().find(|p| p.id == current) {
            let (elements, background) = canvas.snapshot();
            page.elements = elements;
            page.background = background;
        }
    }

    /// Store the canvas, append a blank page and switch to it
    pub fn add_page(&mut self, canvas: &mut Canvas) -> PageId {
        self.save_current(canvas);
        let id = self.push_blank();
        self.renumber_pages();
        self.load(id, canvas);
        log::info!("📄 Added {} ({} pages)", id, self.pages.len());
        id
    }

    /// Save the outgoing page, then load `id` onto the canvas and remount its elements
    pub fn switch_to_page(&mut self, id: PageId, canvas: &mut Canvas) -> ValidationResult<()> {
        if self.page(id).is_none() {
            return Err(ValidationError::PageNotFound(id));
        }
        self.save_current(canvas);
        self.load(id, canvas);
        log::info!("📄 Switched to {}", id);
        Ok(())
    }

    /// Remove a page. Deleting the only page first creates a blank replacement.
    pub fn delete_page(&mut self, id: PageId, canvas: &mut Canvas) -> ValidationResult<()> {
        let Some(index) = self.pages.iter().position(|p| p.id == id) else {
            return Err(ValidationError::PageNotFound(id));
        };

        if self.pages.len() == 1 {
            let replacement = self.push_blank();
            self.pages.remove(index);
            self.load(replacement, canvas);
        } else {
            let was_current = id == self.current;
            self.pages.remove(index);
            if was_current {
                let first = self.pages[0].id;
                self.load(first, canvas);
            }
        }

        self.renumber_pages();
        log::info!("🗑️ Deleted {} ({} pages left)", id, self.pages.len());
        Ok(())
    }

    /// Rename a page. The name is trimmed and must be non-empty and unique.
    pub fn rename_page(&mut self, id: PageId, name: &str) -> ValidationResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyPageName);
        }
        if self.pages.iter().any(|p| p.id != id && p.name == name) {
            return Err(ValidationError::DuplicatePageName(name.to_owned()));
        }
        let page = self
            .pages
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ValidationError::PageNotFound(id))?;
        page.name = name.to_owned();
        Ok(())
    }

    /// Give every page the name "Page N" in ascending id order.
    ///
    /// Custom names from `rename_page` are overwritten too.
    pub fn renumber_pages(&mut self) {
        self.pages.sort_by_key(|p| p.id);
        for (index, page) in self.pages.iter_mut().enumerate() {
            page.name = format!("Page {}", index + 1);
        }
    }

    fn push_blank(&mut self) -> PageId {
        let id = PageId(self.next_id);
        self.next_id += 1;
        self.pages.push(Page::new(id, format!("Page {}", self.pages.len() + 1)));
        id
    }

    /// Put a stored page on the canvas without saving the outgoing one
    fn load(&mut self, id: PageId, canvas: &mut Canvas) {
        let (elements, background) = self
            .page(id)
            .map(|p| (p.elements.clone(), p.background.clone()))
            .unwrap_or_else(|| (Vec::new(), Background::default()));
        canvas.load(elements, background);
        self.current = id;
    }
}
