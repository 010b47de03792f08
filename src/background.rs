use crate::engine::{Engine, View};
use crate::input::Direction;
use crate::probe::ImageRef;

/// Full-page background slideshow: one slot per image, wraps at both ends.
pub struct BackgroundEngine;

impl Engine for BackgroundEngine {
    fn slot_count(&self, item_count: usize) -> usize {
        item_count
    }

    fn step(&self, current: usize, direction: Direction, slots: usize) -> Option<usize> {
        if slots == 0 {
            return None;
        }
        Some(match direction {
            Direction::Next => (current + 1) % slots,
            Direction::Prev => (current + slots - 1) % slots,
        })
    }

    fn accepts_keys(&self, _container_visible: bool) -> bool {
        true
    }

    fn resize(&mut self, _viewport_width: u32) -> bool {
        false
    }

    fn view(&self, items: &[ImageRef], slot: usize) -> View {
        View::Background {
            image: items.get(slot).map(|item| item.path.clone()).unwrap_or_default(),
        }
    }
}
