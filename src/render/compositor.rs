use std::sync::Arc;

use crate::{
    TwibbonError, TwibbonResult,
    assets::Layer,
    foundation::core::{Affine, Canvas, Rgba8, Vec2},
    layers::{store::LayerStore, transform::Transform},
    render::{
        export::encode_png,
        surface::{DrawingSurface, SurfaceRGBA, surface_dims},
    },
};

/// Counters describing compositor work, mostly useful in tests and logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Completed full redraws.
    pub renders: u64,
    /// Drawing surface (re)allocations.
    pub surface_allocations: u64,
    /// Layer-to-paint conversions (cache misses).
    pub paint_uploads: u64,
}

#[derive(Clone)]
struct CachedPaint {
    source: Layer,
    paint: vello_cpu::Image,
}

/// Draws the layer store into an off-screen surface: photo (or white), then the frame on top.
///
/// Every call to [`Compositor::render`] is a full redraw.
pub struct Compositor {
    background: Rgba8,
    surface: Option<DrawingSurface>,
    ctx: Option<vello_cpu::RenderContext>,
    frame_paint: Option<CachedPaint>,
    photo_paint: Option<CachedPaint>,
    drawn: bool,
    stats: RenderStats,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(Rgba8::WHITE)
    }
}

impl Compositor {
    /// Create a compositor that fills with `background` while no photo is present.
    pub fn new(background: Rgba8) -> Self {
        Self {
            background,
            surface: None,
            ctx: None,
            frame_paint: None,
            photo_paint: None,
            drawn: false,
            stats: RenderStats::default(),
        }
    }

    /// Work counters.
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Surface dimensions, once a frame has been drawn.
    pub fn surface_size(&self) -> Option<Canvas> {
        self.surface.as_ref().map(DrawingSurface::size)
    }

    /// Whether the surface holds at least one completed draw.
    pub fn has_drawn(&self) -> bool {
        self.drawn
    }

    /// Drop the surface and cached paints (editor unmount / frame release).
    pub fn release(&mut self) {
        self.surface = None;
        self.ctx = None;
        self.frame_paint = None;
        self.photo_paint = None;
        self.drawn = false;
    }

    /// Redraw everything from `store`.
    ///
    /// Returns `Ok(false)` without touching the surface while the frame layer is not loaded.
    #[tracing::instrument(skip_all)]
    pub fn render(&mut self, store: &LayerStore) -> TwibbonResult<bool> {
        let Some(frame) = store.frame() else {
            return Ok(false);
        };
        let size = frame.size();
        let (w16, h16) = surface_dims(size)?;

        match self.surface.as_mut() {
            Some(surface) => {
                if surface.resize_to(size)? {
                    self.stats.surface_allocations += 1;
                }
            }
            None => {
                self.surface = Some(DrawingSurface::new(size)?);
                self.stats.surface_allocations += 1;
            }
        }

        let frame_paint = cached_paint(&mut self.frame_paint, frame, &mut self.stats)?;
        let photo = match store.photo() {
            Some(p) => {
                let paint = cached_paint(&mut self.photo_paint, p, &mut self.stats)?;
                Some((paint, p.size()))
            }
            None => {
                self.photo_paint = None;
                None
            }
        };

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w16 && ctx.height() == h16 => ctx,
            _ => vello_cpu::RenderContext::new(w16, h16),
        };
        ctx.reset();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let width = f64::from(size.width);
        let height = f64::from(size.height);
        let has_photo = photo.is_some();

        match photo {
            Some((paint, photo_size)) => {
                let tr = photo_affine(size, photo_size, store.transform());
                ctx.set_transform(affine_to_cpu(tr));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(photo_size.width),
                    f64::from(photo_size.height),
                ));
            }
            None => {
                let bg = self.background;
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(bg.r, bg.g, bg.b, bg.a));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, width, height));
            }
        }

        // Opacity pulses only make sense while a photo sits under the frame.
        let opacity = if has_photo { store.blend_opacity() } else { 1.0 };
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(frame_paint);
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, width, height));
        if opacity < 1.0 {
            ctx.pop_layer();
        }
        ctx.flush();

        let surface = self
            .surface
            .as_mut()
            .ok_or_else(|| TwibbonError::render("drawing surface missing after resize"))?;
        surface.clear();
        ctx.render_to_pixmap(surface.pixmap_mut());
        self.ctx = Some(ctx);

        self.drawn = true;
        self.stats.renders += 1;
        tracing::debug!(
            width = size.width,
            height = size.height,
            has_photo,
            opacity,
            "composited"
        );
        Ok(true)
    }

    /// Copy of the current surface pixels, if anything has been drawn.
    pub fn snapshot(&self) -> Option<SurfaceRGBA> {
        if !self.drawn {
            return None;
        }
        self.surface.as_ref().map(DrawingSurface::snapshot)
    }

    /// Encode the current surface as PNG. Pure read; `None` until something has been drawn.
    pub fn export_png(&self) -> TwibbonResult<Option<Vec<u8>>> {
        match self.snapshot() {
            Some(snap) => encode_png(snap).map(Some),
            None => Ok(None),
        }
    }
}

/// Photo placement: rotate about the canvas center, pan in rotated space, scale about the
/// photo's own center.
///
/// Zoom is anchored at the photo's center rather than its top-left corner, so a zoom change
/// alone never moves the point of the photo that sits under the canvas center.
pub fn photo_affine(canvas: Canvas, photo: Canvas, t: Transform) -> Affine {
    let half = Vec2::new(f64::from(photo.width) / 2.0, f64::from(photo.height) / 2.0);
    Affine::translate(canvas.center().to_vec2())
        * Affine::rotate(t.rotation_rad())
        * Affine::translate(t.offset)
        * Affine::scale(t.zoom)
        * Affine::translate(-half)
}

fn cached_paint(
    slot: &mut Option<CachedPaint>,
    layer: &Layer,
    stats: &mut RenderStats,
) -> TwibbonResult<vello_cpu::Image> {
    if let Some(cached) = slot.as_ref()
        && cached.source.same_pixels(layer)
    {
        return Ok(cached.paint.clone());
    }

    let pixmap = pixmap_from_premul_bytes(&layer.rgba8_premul, layer.width, layer.height)?;
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };
    *slot = Some(CachedPaint {
        source: layer.clone(),
        paint: paint.clone(),
    });
    stats.paint_uploads += 1;
    Ok(paint)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> TwibbonResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims(Canvas { width, height })?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(TwibbonError::render("layer byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
