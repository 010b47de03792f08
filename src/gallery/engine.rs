use std::path::Path;
use crate::engine::{Card, Engine, View};
use crate::gallery::data::GalleryData;
use crate::gallery::layout::{items_per_page, page_count};
use crate::input::Direction;
use crate::probe::ImageRef;

/// Paginated card strip: one slot per page, no wraparound for user steps.
pub struct GalleryEngine {
    data: GalleryData,
    per_page: usize,
}

impl GalleryEngine {
    pub fn new(data: GalleryData, viewport_width: u32) -> Self {
        Self { data, per_page: items_per_page(viewport_width) }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn card(&self, item: &ImageRef) -> Card {
        let filename = Path::new(&item.path)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| item.path.clone());
        Card {
            path: item.path.clone(),
            caption: self.data.caption(&filename).to_string(),
        }
    }
}

impl Engine for GalleryEngine {
    fn slot_count(&self, item_count: usize) -> usize {
        page_count(item_count, self.per_page)
    }

    fn step(&self, current: usize, direction: Direction, slots: usize) -> Option<usize> {
        match direction {
            Direction::Next if current + 1 < slots => Some(current + 1),
            Direction::Prev => current.checked_sub(1),
            Direction::Next => None,
        }
    }

    // Arrow keys only drive the gallery while it is on screen
    fn accepts_keys(&self, container_visible: bool) -> bool {
        container_visible
    }

    fn resize(&mut self, viewport_width: u32) -> bool {
        let per_page = items_per_page(viewport_width);
        let changed = per_page != self.per_page;
        self.per_page = per_page;
        changed
    }

    fn view(&self, items: &[ImageRef], slot: usize) -> View {
        let start = (slot * self.per_page).min(items.len());
        let end = (start + self.per_page).min(items.len());
        View::Gallery {
            offset_percent: -(slot as f32) * 100.0,
            cards: items[start..end].iter().map(|item| self.card(item)).collect(),
        }
    }
}
