use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use log::{error, info};
use serde_json::{Map, Value};
use crate::caption::{caption_for, format_file_size};
use crate::image_loader::{scan_image_dir, ImageEntry};

pub const LIST_GLOBAL: &str = "window.AUTO_IMAGE_LIST";
pub const CAPTIONS_GLOBAL: &str = "window.AUTO_IMAGE_CAPTIONS";

pub struct GenerateConfig {
    pub image_dir: PathBuf,
    pub output_file: PathBuf,
}

#[derive(Debug, PartialEq)]
pub enum GenerateOutcome {
    Written { count: usize, total_size: u64 },
    MissingDir,
    NoImages,
}

// --- Build the data file text for an already sorted image list ---
pub fn render_data_file(images: &[ImageEntry], generated_at: &str) -> Result<String> {
    let total_size: u64 = images.iter().map(|img| img.size).sum();

    let file_names: Vec<&str> = images.iter().map(|img| img.filename.as_str()).collect();
    let mut captions = Map::new();
    for img in images {
        captions.insert(img.filename.clone(), Value::from(caption_for(&img.filename)));
    }

    let list_json = serde_json::to_string_pretty(&file_names).context("Failed to encode image list")?;
    let captions_json = serde_json::to_string_pretty(&captions).context("Failed to encode captions")?;

    Ok(format!(
        "// Auto-generated image list\n\
         // Generated: {generated_at}\n\
         // Images: {count}\n\
         // Total size: {size}\n\
         \n\
         {LIST_GLOBAL} = {list_json};\n\
         \n\
         {CAPTIONS_GLOBAL} = {captions_json};\n\
         \n\
         console.log('Image list loaded:', {LIST_GLOBAL}.length, 'images');\n",
        count = images.len(),
        size = format_file_size(total_size),
    ))
}

// Write next to the target and rename, so readers never see half a file
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, contents)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e).with_context(|| format!("Failed to move {} into place", path.display()));
    }
    Ok(())
}

/// Scan the image folder and (re)write the generated data file.
///
/// A missing folder or an empty one is logged and reported through
/// [`GenerateOutcome`]; nothing is written in either case.
pub fn generate_image_list(config: &GenerateConfig) -> Result<GenerateOutcome> {
    info!("Scanning image folder: {}", config.image_dir.display());

    let images = match scan_image_dir(&config.image_dir) {
        Ok(images) => images,
        Err(e) => {
            error!("Image folder unavailable: {:#}", e);
            return Ok(GenerateOutcome::MissingDir);
        }
    };

    if images.is_empty() {
        error!("No image files found in {}", config.image_dir.display());
        return Ok(GenerateOutcome::NoImages);
    }

    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let contents = render_data_file(&images, &generated_at)?;
    write_atomically(&config.output_file, &contents)?;

    let total_size: u64 = images.iter().map(|img| img.size).sum();
    info!("Wrote {}", config.output_file.display());
    info!("{} images, {}", images.len(), format_file_size(total_size));
    for (i, img) in images.iter().enumerate() {
        info!("{:>2} {} ({})", i + 1, img.filename, format_file_size(img.size));
    }

    Ok(GenerateOutcome::Written { count: images.len(), total_size })
}
