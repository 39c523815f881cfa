//! The prefetch phase: decoding embedded bitmaps before rendering.
//!
//! Neither backend decodes anything. The SVG exporter references files by
//! data URL, while the raster backend needs pixels, so the CLI decodes every
//! PNG data URL in the scene up front. Files that cannot be decoded are left
//! without a bitmap and the raster backend skips the images that use them.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use log::{debug, trace};
use thiserror::Error;
use tiny_skia::Pixmap;

use easel::{element::Bitmap, scene::Scene};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("not a base64 data URL")]
    NotDataUrl,

    #[error("unsupported image type `{0}`")]
    Unsupported(String),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid PNG: {0}")]
    Png(String),
}

/// Decodes the bitmaps of every file in `scene` that does not have one yet.
///
/// Returns the number of files decoded.
pub fn prefetch_bitmaps(scene: &mut Scene) -> usize {
    let mut decoded = 0;
    for (id, file) in scene.files_mut().iter_mut() {
        if file.bitmap.is_some() {
            continue;
        }
        match decode_data_url(&file.data_url) {
            Ok(bitmap) => {
                trace!(file_id:% = id, width = bitmap.width(), height = bitmap.height(); "Decoded bitmap");
                file.bitmap = Some(bitmap);
                decoded += 1;
            }
            Err(err) => trace!(file_id:% = id, mime_type = file.mime_type, err:err; "Bitmap not decoded"),
        }
    }
    debug!(decoded = decoded, files = scene.files().len(); "Prefetch finished");
    decoded
}

/// Decodes a `data:image/png;base64,...` URL into premultiplied RGBA pixels.
pub fn decode_data_url(data_url: &str) -> Result<Bitmap, AssetError> {
    let rest = data_url.strip_prefix("data:").ok_or(AssetError::NotDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(AssetError::NotDataUrl)?;
    let mime = header.strip_suffix(";base64").ok_or(AssetError::NotDataUrl)?;
    if !mime.eq_ignore_ascii_case("image/png") {
        return Err(AssetError::Unsupported(mime.to_string()));
    }

    let bytes = STANDARD.decode(payload.trim())?;
    let pixmap = Pixmap::decode_png(&bytes).map_err(|err| AssetError::Png(err.to_string()))?;
    let (width, height) = (pixmap.width(), pixmap.height());
    Bitmap::new(width, height, pixmap.take()).ok_or_else(|| AssetError::Png("pixel buffer size mismatch".to_string()))
}
