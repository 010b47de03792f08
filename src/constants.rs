pub const DEFAULT_IMAGE_DIR: &str = "./img";            // Folder scanned by the generator
pub const DEFAULT_OUTPUT_FILE: &str = "auto_images.js";  // Generated data file
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "bmp"];

pub const BACKGROUND_INTERVAL_MS: u64 = 5000;          // Background slideshow auto-advance
pub const GALLERY_INTERVAL_MS: u64 = 4000;             // Gallery page auto-advance

pub const WIDE_BREAKPOINT: u32 = 1024;                 // >= this width: 3 cards per page
pub const MEDIUM_BREAKPOINT: u32 = 640;                // >= this width: 2 cards per page

pub const SWIPE_THRESHOLD_PX: f32 = 50.0;              // Minimum horizontal travel for a swipe

pub const RENDER_WIDTH: i32 = 1280;                    // Initial viewer window width
pub const RENDER_HEIGHT: i32 = 720;                    // Initial viewer window height
pub const FPS: u32 = 60;                               // Viewer frames per second
pub const MAX_PROBE_WORKERS: usize = 8;                // Upper bound on concurrent image decodes
