use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use base64ct::{Base64, Encoding};

use crate::{TwibbonError, TwibbonResult, render::surface::SurfaceRGBA};

/// Default download name for the composed avatar.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "fuyuki-twibbon-avatar.png";

/// A finished PNG ready to be offered as a download.
#[derive(Clone, Debug)]
pub struct ExportArtifact {
    /// Suggested file name.
    pub file_name: String,
    /// Encoded PNG bytes.
    pub png: Vec<u8>,
}

impl ExportArtifact {
    /// `data:image/png;base64,...` URL of the PNG.
    pub fn data_url(&self) -> String {
        png_data_url(&self.png)
    }

    /// Write the PNG into `dir` under [`ExportArtifact::file_name`].
    pub fn save_in(&self, dir: &Path) -> TwibbonResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.png)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(path)
    }
}

/// Encode a surface snapshot as PNG (straight alpha).
#[tracing::instrument(skip(snapshot), fields(width = snapshot.width, height = snapshot.height))]
pub fn encode_png(snapshot: SurfaceRGBA) -> TwibbonResult<Vec<u8>> {
    let straight = snapshot.into_straight();
    let img = image::RgbaImage::from_raw(straight.width, straight.height, straight.data)
        .ok_or_else(|| TwibbonError::render("surface byte length does not match dimensions"))?;

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// Wrap PNG bytes in a data URL.
pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", Base64::encode_string(png))
}
