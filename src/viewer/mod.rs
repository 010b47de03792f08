use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;
use anyhow::Result;
use log::{error, info, warn};
use raylib::prelude::*;

mod slide;

use crate::background::BackgroundEngine;
use crate::carousel::Carousel;
use crate::constants::*;
use crate::engine::{Engine, Frame, Surface, View};
use crate::gallery::data::GalleryData;
use crate::gallery::engine::GalleryEngine;
use crate::input::{ArrowKey, InputEvent};
use crate::probe::{CachedProbe, DecodeProbe};
use crate::viewer::slide::Slide;

pub struct ViewerConfig {
    pub site_root: PathBuf,
    pub data_file: PathBuf,
    pub image_prefix: String,
    /// TTF/OTF with CJK glyphs for the captions
    pub font: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Region {
    Background,
    Gallery,
}

// Keeps the most recent frame for the draw pass
#[derive(Default)]
struct LatestFrame {
    frame: Option<Frame>,
}

impl Surface for LatestFrame {
    fn present(&mut self, frame: &Frame) {
        self.frame = Some(frame.clone());
    }
}

const INDICATOR_RADIUS: f32 = 6.0;
const INDICATOR_SPACING: f32 = 22.0;
const CAPTION_FONT_SIZE: i32 = 24;

fn gallery_area(screen_width: f32, screen_height: f32) -> Rectangle {
    Rectangle::new(0.0, screen_height * 0.6, screen_width, screen_height * 0.4)
}

fn contains(rect: &Rectangle, point: Vector2) -> bool {
    point.x >= rect.x && point.x <= rect.x + rect.width && point.y >= rect.y && point.y <= rect.y + rect.height
}

// Centers of the indicator dots along the bottom edge of `area`
fn indicator_centers(count: usize, area: &Rectangle) -> Vec<Vector2> {
    let total = count as f32 * INDICATOR_SPACING;
    let start_x = area.x + (area.width - total) * 0.5 + INDICATOR_SPACING * 0.5;
    let y = area.y + area.height - INDICATOR_SPACING;
    (0..count)
        .map(|i| Vector2::new(start_x + i as f32 * INDICATOR_SPACING, y))
        .collect()
}

fn hit_indicator(frame: Option<&Frame>, area: &Rectangle, point: Vector2) -> Option<usize> {
    let count = frame?.indicators.len();
    indicator_centers(count, area).iter().position(|center| {
        let dx = center.x - point.x;
        let dy = center.y - point.y;
        (dx * dx + dy * dy).sqrt() <= INDICATOR_RADIUS * 1.5
    })
}

// Glyph set for the caption font: printable ASCII plus every caption character
fn caption_glyphs<'a>(captions: impl Iterator<Item = &'a str>) -> String {
    let mut glyphs: BTreeSet<char> = (' '..='~').collect();
    glyphs.extend(captions.flat_map(str::chars));
    glyphs.into_iter().collect()
}

fn load_caption_font(rl: &mut RaylibHandle, thread: &RaylibThread, path: &Path, glyphs: &str) -> Option<Font> {
    let Some(path_str) = path.to_str() else {
        warn!("Font path {} is not valid UTF-8", path.display());
        return None;
    };
    match rl.load_font_ex(thread, path_str, CAPTION_FONT_SIZE, Some(glyphs)) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!("Could not load caption font {}: {}", path.display(), e);
            None
        }
    }
}

fn draw_indicators(d: &mut RaylibDrawHandle, frame: &Frame, area: &Rectangle) {
    for (center, active) in indicator_centers(frame.indicators.len(), area).iter().zip(&frame.indicators) {
        let color = if *active { Color::WHITE } else { Color::GRAY };
        d.draw_circle(center.x as i32, center.y as i32, INDICATOR_RADIUS, color);
    }
}

// Routes pointer input to whichever carousel sits under the cursor
fn pointer_event<E: Engine, S: Surface>(
    carousel: &mut Carousel<E, S>,
    frame: Option<&Frame>,
    area: &Rectangle,
    pressed: bool,
    point: Vector2,
) {
    if pressed {
        match hit_indicator(frame, area, point) {
            Some(index) => { carousel.handle(&InputEvent::IndicatorClick(index)); }
            None => { carousel.handle(&InputEvent::TouchStart { x: point.x, y: point.y }); }
        }
    } else {
        carousel.handle(&InputEvent::TouchEnd { x: point.x, y: point.y });
    }
}

pub fn run(config: &ViewerConfig) -> Result<()> {
    let data = GalleryData::load(&config.data_file);
    let sources = data.sources(&config.image_prefix);
    // Both carousels validate the same list; decode each file once
    let probe = CachedProbe::new(DecodeProbe::new(&config.site_root));

    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH, RENDER_HEIGHT)
        .title("Gallery Preview")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // --- Carousels: each one degrades on its own ---
    let mut background = Carousel::new("background", BackgroundEngine, LatestFrame::default(), BACKGROUND_INTERVAL_MS);
    if let Err(e) = background.initialize(&probe, &sources) {
        error!("Background slideshow disabled: {}", e);
    }
    background.set_auto_play(true);

    let gallery_engine = GalleryEngine::new(data, rl.get_screen_width().max(0) as u32);
    let mut gallery = Carousel::new("gallery", gallery_engine, LatestFrame::default(), GALLERY_INTERVAL_MS);
    if let Err(e) = gallery.initialize(&probe, &sources) {
        error!("Gallery disabled: {}", e);
    }
    gallery.set_auto_play(true);

    let captions: Vec<String> = gallery.state().items.iter().map(|item| gallery.engine().card(item).caption).collect();
    let glyphs = caption_glyphs(captions.iter().map(String::as_str));
    let font = config.font.as_deref().and_then(|path| load_caption_font(&mut rl, &thread, path, &glyphs));
    if font.is_none() {
        // The default raylib font has no CJK glyphs, so the captions go to the log instead
        for item in &gallery.state().items {
            info!("{}", gallery.engine().card(item));
        }
    }

    // --- Textures for everything that validated ---
    let mut slides: HashMap<String, Slide> = HashMap::new();
    for item in background.state().items.iter().chain(gallery.state().items.iter()) {
        if slides.contains_key(&item.path) {
            continue;
        }
        match Slide::load(&mut rl, &thread, &config.site_root.join(&item.path)) {
            Ok(slide) => { slides.insert(item.path.clone(), slide); }
            Err(e) => warn!("Could not upload {}: {:#}", item.path, e),
        }
    }

    let mut hovering_gallery = false;
    let mut press_owner: Option<Region> = None;

    // --- Main Loop ---
    while !rl.window_should_close() {
        let dt = Duration::from_secs_f32(rl.get_frame_time().max(0.0));
        let sw = rl.get_screen_width() as f32;
        let sh = rl.get_screen_height() as f32;
        let screen = Rectangle::new(0.0, 0.0, sw, sh);
        let strip = gallery_area(sw, sh);
        let upper = Rectangle::new(0.0, 0.0, sw, strip.y);
        let mouse = rl.get_mouse_position();

        if rl.is_window_resized() {
            gallery.handle(&InputEvent::Resize { width: sw.max(0.0) as u32 });
        }

        let over_gallery = contains(&strip, mouse);
        if over_gallery != hovering_gallery {
            hovering_gallery = over_gallery;
            let event = if over_gallery { InputEvent::PointerEnter } else { InputEvent::PointerLeave };
            gallery.handle(&event);
        }

        // The strip is always on screen in this window
        if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) {
            gallery.handle(&InputEvent::Arrow { key: ArrowKey::Right, container_visible: true });
        }
        if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
            gallery.handle(&InputEvent::Arrow { key: ArrowKey::Left, container_visible: true });
        }
        if rl.is_key_pressed(KeyboardKey::KEY_N) {
            background.handle(&InputEvent::NextButton);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_P) {
            background.handle(&InputEvent::PrevButton);
        }

        let pressed = rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT);
        let released = rl.is_mouse_button_released(MouseButton::MOUSE_BUTTON_LEFT);
        // A release goes to the carousel that saw the press
        let target = if pressed {
            let region = if over_gallery { Region::Gallery } else { Region::Background };
            press_owner = Some(region);
            Some(region)
        } else if released {
            press_owner.take()
        } else {
            None
        };
        match target {
            Some(Region::Gallery) => {
                let frame = gallery.surface().frame.clone();
                pointer_event(&mut gallery, frame.as_ref(), &strip, pressed, mouse);
            }
            Some(Region::Background) => {
                let frame = background.surface().frame.clone();
                pointer_event(&mut background, frame.as_ref(), &upper, pressed, mouse);
            }
            None => {}
        }

        background.tick(dt);
        gallery.tick(dt);

        // --- Draw ---
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);

        match &background.surface().frame {
            Some(frame) => {
                if let View::Background { image } = &frame.view {
                    if let Some(slide) = slides.get(image) {
                        slide.draw(&mut d, screen, true);
                    }
                }
                draw_indicators(&mut d, frame, &upper);
            }
            None => d.draw_text("No background images could be loaded.", 20, 20, 20, Color::RED),
        }

        d.draw_rectangle(strip.x as i32, strip.y as i32, strip.width as i32, strip.height as i32, Color::new(0, 0, 0, 170));

        match &gallery.surface().frame {
            Some(frame) => {
                if let View::Gallery { cards, .. } = &frame.view {
                    let card_width = strip.width / gallery.engine().per_page() as f32;
                    for (i, card) in cards.iter().enumerate() {
                        let cell = Rectangle::new(
                            strip.x + i as f32 * card_width + 10.0,
                            strip.y + 10.0,
                            card_width - 20.0,
                            strip.height - 70.0,
                        );
                        if let Some(slide) = slides.get(&card.path) {
                            slide.draw(&mut d, cell, false);
                        }
                        let label_y = cell.y + cell.height + 6.0;
                        match &font {
                            Some(font) => d.draw_text_ex(
                                font,
                                &card.caption,
                                Vector2::new(cell.x, label_y),
                                CAPTION_FONT_SIZE as f32,
                                1.0,
                                Color::WHITE,
                            ),
                            None => d.draw_text(&card.path, cell.x as i32, label_y as i32, 16, Color::WHITE),
                        }
                    }
                }
                draw_indicators(&mut d, frame, &strip);
            }
            None => d.draw_text("Gallery unavailable.", 20, strip.y as i32 + 20, 20, Color::RED),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_glyphs_cover_every_caption() {
        let glyphs = caption_glyphs(["街拍造型", "红毯造型"].into_iter());
        for c in "街拍红毯造型Ok 1".chars() {
            assert!(glyphs.contains(c), "missing {c}");
        }
        // Shared characters appear once
        assert_eq!(glyphs.matches('造').count(), 1);
    }
}
