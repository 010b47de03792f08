use std::fmt;
use std::time::Duration;
use log::{error, info};
use crate::engine::{Engine, Frame, Surface};
use crate::input::{swipe_direction, Direction, InputEvent, InputKind};
use crate::probe::{validate_sources, ImageProbe, ImageRef};
use crate::state::CarouselPhase;
use crate::timer::AutoPlayTimer;

#[derive(Debug, PartialEq)]
pub enum CarouselError {
    NoValidImages,
    AlreadyInitialized,
}

impl fmt::Display for CarouselError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarouselError::NoValidImages => write!(f, "no image could be loaded"),
            CarouselError::AlreadyInitialized => write!(f, "carousel was already initialized"),
        }
    }
}

impl std::error::Error for CarouselError {}

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselState {
    pub items: Vec<ImageRef>,
    pub current_index: usize,
    pub auto_play_enabled: bool,
    pub interval_ms: u64,
}

/// One marker per slot, exactly one of them active.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Indicators {
    markers: Vec<bool>,
}

impl Indicators {
    pub fn rebuild(&mut self, count: usize, active: usize) {
        self.markers = vec![false; count];
        self.activate(active);
    }

    pub fn activate(&mut self, index: usize) {
        for (i, marker) in self.markers.iter_mut().enumerate() {
            *marker = i == index;
        }
    }

    pub fn markers(&self) -> &[bool] {
        &self.markers
    }
}

type Transition<E, S> = fn(&mut Carousel<E, S>, &InputEvent) -> bool;

pub struct Carousel<E: Engine, S: Surface> {
    name: &'static str,
    engine: E,
    surface: S,
    state: CarouselState,
    phase: CarouselPhase,
    timer: AutoPlayTimer,
    indicators: Indicators,
    touch_start: Option<(f32, f32)>,
}

impl<E: Engine, S: Surface> Carousel<E, S> {
    pub fn new(name: &'static str, engine: E, surface: S, interval_ms: u64) -> Self {
        Self {
            name,
            engine,
            surface,
            state: CarouselState {
                items: Vec::new(),
                current_index: 0,
                auto_play_enabled: false,
                interval_ms,
            },
            phase: CarouselPhase::Probing,
            timer: AutoPlayTimer::new(interval_ms),
            indicators: Indicators::default(),
            touch_start: None,
        }
    }

    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    pub fn phase(&self) -> CarouselPhase {
        self.phase
    }

    pub fn indicators(&self) -> &Indicators {
        &self.indicators
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn slot_count(&self) -> usize {
        self.engine.slot_count(self.state.items.len())
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    fn is_running(&self) -> bool {
        self.phase == CarouselPhase::Running
    }

    /// Probe every candidate, keep the loadable ones and show the first slot.
    ///
    /// With nothing loadable the carousel goes inert for good: no indicators,
    /// no timer, every later call is a no-op.
    pub fn initialize<P: ImageProbe + ?Sized>(&mut self, probe: &P, candidates: &[String]) -> Result<usize, CarouselError> {
        if self.phase != CarouselPhase::Probing {
            return Err(CarouselError::AlreadyInitialized);
        }

        let items = validate_sources(probe, candidates);
        if items.is_empty() {
            error!("[{}] none of {} images could be loaded", self.name, candidates.len());
            self.phase = CarouselPhase::Inert;
            return Err(CarouselError::NoValidImages);
        }
        info!("[{}] {} of {} images validated", self.name, items.len(), candidates.len());

        self.state.items = items;
        self.state.current_index = 0;
        self.phase = CarouselPhase::Running;
        self.indicators.rebuild(self.slot_count(), 0);
        self.render();
        Ok(self.state.items.len())
    }

    pub fn advance(&mut self, direction: Direction) -> bool {
        if !self.is_running() {
            return false;
        }
        match self.engine.step(self.state.current_index, direction, self.slot_count()) {
            Some(next) => self.show(next),
            None => false,
        }
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        if !self.is_running() || index >= self.slot_count() {
            return false;
        }
        self.show(index)
    }

    pub fn set_auto_play(&mut self, enabled: bool) {
        if !self.is_running() {
            return;
        }
        self.state.auto_play_enabled = enabled;
        if enabled {
            self.timer.start();
        } else {
            self.timer.stop();
        }
    }

    /// Feed elapsed time to the auto-play timer; returns the number of auto-advances.
    pub fn tick(&mut self, dt: Duration) -> u32 {
        if !self.is_running() {
            return 0;
        }
        let fired = self.timer.tick(dt);
        for _ in 0..fired {
            // Auto-advance loops back to the first slot in every variant
            let slots = self.slot_count();
            self.set_current((self.state.current_index + 1) % slots);
        }
        fired
    }

    pub fn resize(&mut self, viewport_width: u32) -> bool {
        if !self.engine.resize(viewport_width) || !self.is_running() {
            return false;
        }
        let slots = self.slot_count();
        let current = self.state.current_index.min(slots.saturating_sub(1));
        self.state.current_index = current;
        self.indicators.rebuild(slots, current);
        self.render();
        true
    }

    pub fn handle(&mut self, event: &InputEvent) -> bool {
        let transition = Self::transition(event.kind());
        transition(self, event)
    }

    fn transition(kind: InputKind) -> Transition<E, S> {
        match kind {
            InputKind::Indicator => Self::on_indicator,
            InputKind::Button => Self::on_button,
            InputKind::Arrow => Self::on_arrow,
            InputKind::TouchStart => Self::on_touch_start,
            InputKind::TouchEnd => Self::on_touch_end,
            InputKind::Hover => Self::on_hover,
            InputKind::Resize => Self::on_resize,
        }
    }

    fn on_indicator(&mut self, event: &InputEvent) -> bool {
        let InputEvent::IndicatorClick(index) = *event else { return false };
        self.touch_start = None;
        self.go_to(index)
    }

    fn on_button(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PrevButton => self.advance(Direction::Prev),
            InputEvent::NextButton => self.advance(Direction::Next),
            _ => false,
        }
    }

    fn on_arrow(&mut self, event: &InputEvent) -> bool {
        let InputEvent::Arrow { key, container_visible } = *event else { return false };
        if !self.engine.accepts_keys(container_visible) {
            return false;
        }
        self.advance(key.direction())
    }

    fn on_touch_start(&mut self, event: &InputEvent) -> bool {
        let InputEvent::TouchStart { x, y } = *event else { return false };
        self.touch_start = Some((x, y));
        false
    }

    fn on_touch_end(&mut self, event: &InputEvent) -> bool {
        let InputEvent::TouchEnd { x, y } = *event else { return false };
        let Some((start_x, start_y)) = self.touch_start.take() else { return false };
        match swipe_direction(x - start_x, y - start_y) {
            Some(direction) => self.advance(direction),
            None => false,
        }
    }

    // Hover pauses the timer but leaves auto-play enabled.
    // A gesture that leaves the container is abandoned.
    fn on_hover(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerEnter => self.timer.pause(),
            InputEvent::PointerLeave => {
                self.touch_start = None;
                self.timer.resume();
            }
            _ => {}
        }
        false
    }

    fn on_resize(&mut self, event: &InputEvent) -> bool {
        let InputEvent::Resize { width } = *event else { return false };
        self.resize(width)
    }

    fn show(&mut self, index: usize) -> bool {
        self.set_current(index);
        self.timer.restart();
        true
    }

    fn set_current(&mut self, index: usize) {
        self.state.current_index = index;
        self.indicators.activate(index);
        self.render();
    }

    fn render(&mut self) {
        let frame = Frame {
            view: self.engine.view(&self.state.items, self.state.current_index),
            indicators: self.indicators.markers().to_vec(),
        };
        self.surface.present(&frame);
    }
}
