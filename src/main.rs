use std::path::PathBuf;
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use log::{error, info};

use fansite_gallery::background::BackgroundEngine;
use fansite_gallery::carousel::Carousel;
use fansite_gallery::constants::*;
use fansite_gallery::engine::LogSurface;
use fansite_gallery::gallery::data::GalleryData;
use fansite_gallery::gallery::engine::GalleryEngine;
use fansite_gallery::generate::{generate_image_list, GenerateConfig, GenerateOutcome};
use fansite_gallery::probe::{CachedProbe, DecodeProbe};
#[cfg(feature = "viewer")]
use fansite_gallery::viewer;

#[derive(Parser)]
#[command(name = "fansite-gallery", about = "Image list generator and carousel tooling for the fan site")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the image folder and write the generated image list
    Generate {
        #[arg(long, default_value = DEFAULT_IMAGE_DIR)]
        image_dir: PathBuf,
        #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,
    },
    /// Validate the gallery images the way the page carousels would
    Check {
        #[command(flatten)]
        site: SiteArgs,
        /// Viewport width used for the gallery page layout
        #[arg(long, default_value_t = WIDE_BREAKPOINT)]
        width: u32,
    },
    /// Open a preview window running both carousels
    #[cfg(feature = "viewer")]
    View {
        #[command(flatten)]
        site: SiteArgs,
        /// Font with CJK glyphs for the gallery captions
        #[arg(long)]
        font: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct SiteArgs {
    /// Directory the page is served from
    #[arg(long, default_value = ".")]
    site_root: PathBuf,
    /// Generated image list, relative to the current directory
    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    data: PathBuf,
    /// Path prefix of gallery images inside the site root
    #[arg(long, default_value = "img/")]
    image_prefix: String,
}

fn check(site: &SiteArgs, width: u32) -> Result<()> {
    let data = GalleryData::load(&site.data);
    let sources = data.sources(&site.image_prefix);
    // Both carousels validate the same list; decode each file once
    let probe = CachedProbe::new(DecodeProbe::new(&site.site_root));

    let mut background = Carousel::new("background", BackgroundEngine, LogSurface { name: "background" }, BACKGROUND_INTERVAL_MS);
    let background_ok = background.initialize(&probe, &sources).is_ok();

    let engine = GalleryEngine::new(data, width);
    let mut gallery = Carousel::new("gallery", engine, LogSurface { name: "gallery" }, GALLERY_INTERVAL_MS);
    let gallery_ok = gallery.initialize(&probe, &sources).is_ok();

    for item in &gallery.state().items {
        info!("  ok  {}", gallery.engine().card(item));
    }
    info!(
        "{} of {} images usable, {} gallery pages at {}px ({} per page)",
        gallery.state().items.len(),
        sources.len(),
        gallery.slot_count(),
        width,
        gallery.engine().per_page(),
    );

    if !background_ok && !gallery_ok {
        bail!("no image in {} could be loaded", site.site_root.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate { image_dir, output } => {
            let config = GenerateConfig { image_dir, output_file: output };
            match generate_image_list(&config)? {
                GenerateOutcome::Written { count, .. } => info!("Done: {} images listed", count),
                GenerateOutcome::MissingDir => error!("Put the site images in {}", config.image_dir.display()),
                GenerateOutcome::NoImages => error!("No images found, nothing written"),
            }
            Ok(())
        }
        Command::Check { site, width } => check(&site, width),
        #[cfg(feature = "viewer")]
        Command::View { site, font } => viewer::run(&viewer::ViewerConfig {
            site_root: site.site_root,
            data_file: site.data,
            image_prefix: site.image_prefix,
            font,
        }),
    }
}
