use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, OnceLock};

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use parking_lot::Mutex;
use rusttype::Font;

#[derive(Clone, Eq, PartialEq, Hash)]
struct FontKey {
    family: String,
    bold: bool,
    italic: bool,
}

/// System fonts looked up by CSS-like family lists ("Open Sans, sans-serif")
pub struct FontBook {
    db: Database,
    cache: Mutex<HashMap<FontKey, Option<Arc<Font<'static>>>>>,
}

impl FontBook {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Shared book over the fonts installed on this machine
    pub fn system() -> &'static FontBook {
        static BOOK: OnceLock<FontBook> = OnceLock::new();
        BOOK.get_or_init(|| {
            let mut db = Database::new();
            db.load_system_fonts();
            log::debug!("font database loaded with {} faces", db.len());
            FontBook::new(db)
        })
    }

    /// Best face for the family list, falling back to any sans-serif face.
    /// `None` when the machine has no usable fonts at all.
    pub fn font_for(&self, family: &str, bold: bool, italic: bool) -> Option<Arc<Font<'static>>> {
        let key = FontKey {
            family: family.to_owned(),
            bold,
            italic,
        };
        if let Some(font) = self.cache.lock().get(&key) {
            return font.clone();
        }

        let font = self
            .load(family, bold, italic)
            .or_else(|| self.load("sans-serif", bold, italic))
            .or_else(|| self.load("sans-serif", false, false))
            .map(Arc::new);
        if font.is_none() {
            log::warn!("no font available for '{}'", family);
        }
        self.cache.lock().insert(key, font.clone());
        font
    }

    fn load(&self, family: &str, bold: bool, italic: bool) -> Option<Font<'static>> {
        let families: Vec<Family<'_>> = family
            .split(',')
            .map(|name| name.trim().trim_matches(|c| c == '"' || c == '\''))
            .filter(|name| !name.is_empty())
            .map(|name| match name.to_ascii_lowercase().as_str() {
                "sans-serif" | "sans" => Family::SansSerif,
                "serif" => Family::Serif,
                "monospace" => Family::Monospace,
                "cursive" => Family::Cursive,
                "fantasy" => Family::Fantasy,
                _ => Family::Name(name),
            })
            .collect();
        if families.is_empty() {
            return None;
        }

        let query = Query {
            families: &families,
            weight: if bold { Weight::BOLD } else { Weight::NORMAL },
            stretch: Stretch::Normal,
            style: if italic { Style::Italic } else { Style::Normal },
        };

        let id = self.db.query(&query)?;
        let face = self.db.face(id)?;
        match &face.source {
            fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
                let bytes = fs::read(path).ok()?;
                Font::try_from_vec_and_index(bytes, face.index)
            }
            fontdb::Source::Binary(bytes) => {
                Font::try_from_vec_and_index(bytes.as_ref().as_ref().to_vec(), face.index)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_database_yields_no_font() {
        let book = FontBook::new(Database::new());
        assert!(book.font_for("Open Sans", false, false).is_none());
        // cached miss
        assert!(book.font_for("Open Sans", false, false).is_none());
    }
}
