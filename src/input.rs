use crate::constants::SWIPE_THRESHOLD_PX;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Direction {
    Prev,
    Next,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ArrowKey {
    Left,
    Right,
}

impl ArrowKey {
    pub fn direction(self) -> Direction {
        match self {
            ArrowKey::Left => Direction::Prev,
            ArrowKey::Right => Direction::Next,
        }
    }
}

/// Everything a host can feed into a carousel.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum InputEvent {
    IndicatorClick(usize),
    PrevButton,
    NextButton,
    // container_visible: the carousel intersects the viewport
    Arrow { key: ArrowKey, container_visible: bool },
    TouchStart { x: f32, y: f32 },
    TouchEnd { x: f32, y: f32 },
    PointerEnter,
    PointerLeave,
    Resize { width: u32 },
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum InputKind {
    Indicator,
    Button,
    Arrow,
    TouchStart,
    TouchEnd,
    Hover,
    Resize,
}

impl InputEvent {
    pub fn kind(&self) -> InputKind {
        match self {
            InputEvent::IndicatorClick(_) => InputKind::Indicator,
            InputEvent::PrevButton | InputEvent::NextButton => InputKind::Button,
            InputEvent::Arrow { .. } => InputKind::Arrow,
            InputEvent::TouchStart { .. } => InputKind::TouchStart,
            InputEvent::TouchEnd { .. } => InputKind::TouchEnd,
            InputEvent::PointerEnter | InputEvent::PointerLeave => InputKind::Hover,
            InputEvent::Resize { .. } => InputKind::Resize,
        }
    }
}

// Finger moving left pulls in the next slot
pub fn swipe_direction(dx: f32, dy: f32) -> Option<Direction> {
    if dx.abs() <= SWIPE_THRESHOLD_PX || dx.abs() <= dy.abs() {
        return None;
    }
    if dx < 0.0 { Some(Direction::Next) } else { Some(Direction::Prev) }
}
