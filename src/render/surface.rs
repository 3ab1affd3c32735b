use crate::{
    TwibbonError, TwibbonResult,
    foundation::core::{Canvas, Rgba8, unpremultiply_rgba8_in_place},
};

/// A copy of the drawing surface's pixels.
#[derive(Clone, Debug)]
pub struct SurfaceRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl SurfaceRGBA {
    /// Convert to straight alpha in place (no-op when already straight).
    pub fn into_straight(mut self) -> Self {
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut self.data);
            self.premultiplied = false;
        }
        self
    }

    /// Read one pixel as stored.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some(Rgba8::new(px[0], px[1], px[2], px[3]))
    }
}

/// Off-screen pixel buffer the compositor draws into.
///
/// Always sized to the frame layer's natural dimensions.
pub(crate) struct DrawingSurface {
    size: Canvas,
    pixmap: vello_cpu::Pixmap,
}

impl DrawingSurface {
    pub(crate) fn new(size: Canvas) -> TwibbonResult<Self> {
        let (w, h) = surface_dims(size)?;
        Ok(Self {
            size,
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    pub(crate) fn size(&self) -> Canvas {
        self.size
    }

    /// Reallocate when `size` differs. Returns `true` when a new buffer was allocated.
    pub(crate) fn resize_to(&mut self, size: Canvas) -> TwibbonResult<bool> {
        if self.size == size {
            return Ok(false);
        }
        *self = Self::new(size)?;
        Ok(true)
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
    }

    pub(crate) fn clear(&mut self) {
        self.pixmap.data_as_u8_slice_mut().fill(0);
    }

    pub(crate) fn snapshot(&self) -> SurfaceRGBA {
        SurfaceRGBA {
            width: self.size.width,
            height: self.size.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

/// Validate that `size` fits the CPU rasterizer's 16-bit surface coordinates.
pub(crate) fn surface_dims(size: Canvas) -> TwibbonResult<(u16, u16)> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| TwibbonError::render("surface width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| TwibbonError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(TwibbonError::render("surface dimensions must be > 0"));
    }
    Ok((w, h))
}
