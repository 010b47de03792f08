use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::time::SystemTime;
use anyhow::{Context, Result};
use exif::{In, Reader, Tag, Value};
use image::DynamicImage;
use log::{debug, warn};
use crate::constants::ALLOWED_EXTENSIONS;

/// One image file found in the site's image folder.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    pub filename: String,
    pub size: u64,
    pub modified: SystemTime,
}

pub fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

// --- Helper: List image files, newest first ---
pub fn scan_image_dir(dir_path: &Path) -> Result<Vec<ImageEntry>> {
    let mut images = Vec::new();
    let entries = fs::read_dir(dir_path)
        .with_context(|| format!("Failed to read directory {}", dir_path.display()))?;

    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();
        if !path.is_file() || !has_allowed_extension(&path) {
            continue;
        }
        // Follows symlinks, like the is_file() check above
        let metadata = fs::metadata(&path)
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        images.push(ImageEntry {
            filename: entry.file_name().to_string_lossy().into_owned(),
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        });
    }

    // Newest first; same mtime falls back to name so output is stable
    images.sort_by(|a, b| {
        b.modified.cmp(&a.modified).then_with(|| a.filename.cmp(&b.filename))
    });
    Ok(images)
}

// --- EXIF orientation (1 when absent or unreadable) ---
pub fn read_exif_orientation(image_path: &Path, file_bytes: &[u8]) -> u16 {
    let extension = image_path.extension().and_then(|s| s.to_str()).unwrap_or("").to_lowercase();
    if extension != "jpg" && extension != "jpeg" {
        return 1;
    }

    match Reader::new().read_from_container(&mut Cursor::new(file_bytes)) {
        Ok(exif) => {
            if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                if let Value::Short(values) = &field.value {
                    if let Some(orientation) = values.first() {
                        return *orientation;
                    }
                }
            }
            1
        }
        Err(e) => {
            // Plenty of JPEGs carry no EXIF block at all
            debug!("No EXIF data for {}: {}", image_path.display(), e);
            1
        }
    }
}

// --- Decode an image and bake its EXIF rotation into the pixels ---
pub fn load_image_with_exif_rotation(image_path: &Path) -> Result<DynamicImage> {
    let file_bytes = fs::read(image_path)
        .with_context(|| format!("Failed to read file {}", image_path.display()))?;

    let image = image::load_from_memory(&file_bytes)
        .with_context(|| format!("Failed to decode image {}", image_path.display()))?;

    // 3 = 180 deg, 6 = 90 deg clockwise, 8 = 90 deg counter-clockwise.
    // Mirrored orientations are left as-is.
    let image = match read_exif_orientation(image_path, &file_bytes) {
        3 => image.rotate180(),
        6 => image.rotate90(),
        8 => image.rotate270(),
        1 => image,
        other => {
            warn!("Ignoring mirrored EXIF orientation {} for {}", other, image_path.display());
            image
        }
    };

    Ok(image)
}
