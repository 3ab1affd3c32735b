use std::sync::Arc;

use crate::foundation::core::Canvas;

pub(crate) mod decode;
pub(crate) mod loader;

/// An immutable decoded raster: premultiplied RGBA8 plus its natural dimensions.
///
/// Cloning is cheap; pixel storage is shared.
#[derive(Clone, Debug)]
pub struct Layer {
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Layer {
    /// Natural dimensions.
    pub fn size(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Return `true` when both layers share the same pixel storage.
    pub fn same_pixels(&self, other: &Layer) -> bool {
        Arc::ptr_eq(&self.rgba8_premul, &other.rgba8_premul)
    }
}
