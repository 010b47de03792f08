//! Build-time image list generator and the carousel state machine behind
//! the fan site's background slideshow and paginated gallery.

pub mod background;
pub mod caption;
pub mod carousel;
pub mod constants;
pub mod engine;
pub mod gallery;
pub mod generate;
pub mod image_loader;
pub mod input;
pub mod probe;
pub mod state;
pub mod timer;
#[cfg(feature = "viewer")]
pub mod viewer;
