/// Folder selection, image discovery and decoding for the sketch page
use crate::error::SketchError;
use crate::slideshow::Orientation;
use iced::widget::image::Handle;
use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File extensions accepted in a practice folder (compared case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Display order of the images found in a folder
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImageOrder {
    /// Sorted by file name
    #[default]
    Name,
    /// Whatever order the directory listing yields
    FileSystem,
}

/// Open the native folder dialog. Returns `None` when the user cancels.
pub fn open_folder_picker() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select a folder of reference images")
        .pick_folder()
}

/// Whether a path has one of the accepted image extensions
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

/// List the PNG/JPEG files directly inside `dir`
pub fn scan_folder(dir: &Path, order: ImageOrder) -> Result<Vec<PathBuf>, SketchError> {
    let read_err = |source| SketchError::FolderRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut images = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if path.is_file() && is_supported_image(&path) {
            images.push(path);
        }
    }

    if order == ImageOrder::Name {
        images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    }

    info!("Found {} images in {:?}", images.len(), dir);
    Ok(images)
}

/// Decode an image from disk
pub fn load_image(path: &Path) -> Result<DynamicImage, SketchError> {
    let decode_err = |source| SketchError::ImageDecode {
        path: path.to_path_buf(),
        source,
    };

    let reader = image::io::Reader::open(path)
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?;

    let image = reader.decode().map_err(decode_err)?;
    let (width, height) = image.dimensions();
    debug!("Decoded {:?} ({}x{})", path, width, height);
    Ok(image)
}

/// Apply the visual transform: horizontal mirror first, then clockwise turns
pub fn apply_orientation(source: &DynamicImage, orientation: Orientation) -> DynamicImage {
    let mut image = if orientation.flipped {
        source.fliph()
    } else {
        source.clone()
    };
    for _ in 0..orientation.quarter_turns {
        image = image.rotate90();
    }
    image
}

/// Convert a decoded image into an iced handle for display
pub fn render(source: &DynamicImage, orientation: Orientation) -> Handle {
    let rgba = apply_orientation(source, orientation).to_rgba8();
    let (width, height) = rgba.dimensions();
    Handle::from_pixels(width, height, rgba.into_raw())
}
