use std::collections::HashMap;
use std::fs;
use std::path::Path;
use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use serde_json::Deserializer;
use crate::caption::caption_for;
use crate::generate::{CAPTIONS_GLOBAL, LIST_GLOBAL};

// Used when no generated data file is available
const FALLBACK_IMAGES: &[(&str, &str)] = &[
    ("1.jpg", "舞台演出"),
    ("2.jpg", "红毯造型"),
    ("3.jpg", "个人写真"),
    ("4.jpg", "生活日常"),
    ("5.jpg", "活动现场"),
    ("6.jpg", "片场花絮"),
];

/// Filename list and captions handed from the generator to the gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryData {
    pub list: Vec<String>,
    pub captions: HashMap<String, String>,
}

impl GalleryData {
    pub fn fallback() -> Self {
        Self {
            list: FALLBACK_IMAGES.iter().map(|(name, _)| name.to_string()).collect(),
            captions: FALLBACK_IMAGES
                .iter()
                .map(|(name, caption)| (name.to_string(), caption.to_string()))
                .collect(),
        }
    }

    /// Reads the generated file, or the fallback table when it is missing or malformed.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("No generated image list at {} ({}), using built-in list", path.display(), e);
                return Self::fallback();
            }
        };
        match Self::parse_generated(&text) {
            Ok(data) => {
                info!("Loaded {} images from {}", data.list.len(), path.display());
                data
            }
            Err(e) => {
                warn!("Ignoring {}: {:#}", path.display(), e);
                Self::fallback()
            }
        }
    }

    pub fn parse_generated(text: &str) -> Result<Self> {
        let list: Vec<String> = parse_global(text, LIST_GLOBAL)?;
        let captions: HashMap<String, String> = parse_global(text, CAPTIONS_GLOBAL)?;
        Ok(Self { list, captions })
    }

    pub fn caption(&self, filename: &str) -> &str {
        self.captions
            .get(filename)
            .map(String::as_str)
            .unwrap_or_else(|| caption_for(filename))
    }

    /// Candidate sources for the carousels, relative to the site root.
    pub fn sources(&self, image_prefix: &str) -> Vec<String> {
        self.list.iter().map(|name| format!("{image_prefix}{name}")).collect()
    }
}

// Decode the JSON value assigned to `global = ...;`
fn parse_global<T: serde::de::DeserializeOwned>(text: &str, global: &str) -> Result<T> {
    let assignment = format!("{global} =");
    let start = text
        .find(&assignment)
        .ok_or_else(|| anyhow!("{} is not defined", global))?;
    let rest = &text[start + assignment.len()..];

    Deserializer::from_str(rest)
        .into_iter::<T>()
        .next()
        .ok_or_else(|| anyhow!("{} has no value", global))?
        .with_context(|| format!("{} is not valid JSON", global))
}
