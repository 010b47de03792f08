use std::fmt;
use log::debug;
use crate::input::Direction;
use crate::probe::ImageRef;

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub path: String,
    pub caption: String,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.caption)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Background { image: String },
    // Track is shifted by offset_percent of its own width
    Gallery { offset_percent: f32, cards: Vec<Card> },
}

/// What a carousel shows after a state change.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub view: View,
    pub indicators: Vec<bool>,
}

impl Frame {
    pub fn active_indicator(&self) -> Option<usize> {
        self.indicators.iter().position(|active| *active)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.active_indicator().map_or(0, |i| i + 1);
        match &self.view {
            View::Background { image } => write!(f, "{}/{} background {}", slot, self.indicators.len(), image),
            View::Gallery { offset_percent, cards } => {
                write!(f, "{}/{} page at {}%:", slot, self.indicators.len(), offset_percent)?;
                for card in cards {
                    write!(f, " [{}]", card)?;
                }
                Ok(())
            }
        }
    }
}

/// Rendering/stepping policy of one carousel variant.
pub trait Engine {
    /// Number of indicator slots for `item_count` validated items.
    fn slot_count(&self, item_count: usize) -> usize;
    /// Slot reached by a user step from `current`, `None` when there is none.
    fn step(&self, current: usize, direction: Direction, slots: usize) -> Option<usize>;
    fn accepts_keys(&self, container_visible: bool) -> bool;
    /// Returns true when the slot layout changed.
    fn resize(&mut self, viewport_width: u32) -> bool;
    fn view(&self, items: &[ImageRef], slot: usize) -> View;
}

/// Where frames end up: a window, a log, a test recorder.
pub trait Surface {
    fn present(&mut self, frame: &Frame);
}

pub struct LogSurface {
    pub name: &'static str,
}

impl Surface for LogSurface {
    fn present(&mut self, frame: &Frame) {
        debug!("[{}] {}", self.name, frame);
    }
}
