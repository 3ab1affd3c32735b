use crate::{
    TwibbonResult,
    assets::{
        Layer,
        decode::check_dims,
        loader::{DecodeTicket, Decoded, LayerLoader, LayerSlot},
    },
    editor::opts::EditorOpts,
    foundation::{
        clock::{Clock, SystemClock},
        core::Millis,
    },
    input::{
        event::{InputEvent, RotateStep},
        interpreter::{EditCommand, InputInterpreter, Interpretation},
    },
    layers::{
        store::{LayerStore, OpacityPulse},
        transform::{Transform, TransformDelta},
    },
    render::{
        compositor::{Compositor, RenderStats},
        export::{ExportArtifact, png_data_url},
        surface::SurfaceRGBA,
    },
};

/// Where the photo slot stands with respect to uploads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhotoStatus {
    /// Nothing uploaded yet.
    Empty,
    /// An upload is being decoded; the previous photo (if any) is still shown.
    Decoding {
        /// Ticket of the newest upload.
        ticket: DecodeTicket,
    },
    /// The newest upload is on screen.
    Ready,
    /// The newest upload could not be decoded; the previous photo (if any) is still shown.
    Failed {
        /// Human-readable reason, suitable for a re-upload prompt.
        reason: String,
    },
}

/// Interactive avatar editor: layer store, input interpreter and compositor behind one
/// single-threaded facade.
///
/// All mutations go through `&mut self`. Each public entry point applies its changes and then
/// redraws at most once.
pub struct AvatarEditor {
    opts: EditorOpts,
    store: LayerStore,
    input: InputInterpreter,
    compositor: Compositor,
    loader: LayerLoader,
    clock: Box<dyn Clock>,
    latest_frame: Option<DecodeTicket>,
    latest_photo: Option<DecodeTicket>,
    photo_status: PhotoStatus,
    frame_error: Option<String>,
}

impl AvatarEditor {
    /// Create an editor using wall-clock time. Fails when `opts` does not validate.
    pub fn new(opts: EditorOpts) -> TwibbonResult<Self> {
        Self::with_clock(opts, Box::new(SystemClock::new()))
    }

    /// Create an editor driven by `clock`.
    pub fn with_clock(opts: EditorOpts, clock: Box<dyn Clock>) -> TwibbonResult<Self> {
        opts.validate()?;
        Ok(Self {
            store: LayerStore::new(opts.zoom_bounds),
            input: InputInterpreter::new(opts.input),
            compositor: Compositor::new(opts.background),
            loader: LayerLoader::new(),
            clock,
            latest_frame: None,
            latest_photo: None,
            photo_status: PhotoStatus::Empty,
            frame_error: None,
            opts,
        })
    }

    /// Active options.
    pub fn opts(&self) -> &EditorOpts {
        &self.opts
    }

    /// Read-only view of the layer store.
    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    /// Current photo transform.
    pub fn transform(&self) -> Transform {
        self.store.transform()
    }

    /// Current frame blend opacity.
    pub fn blend_opacity(&self) -> f32 {
        self.store.blend_opacity()
    }

    /// Upload state of the photo slot.
    pub fn photo_status(&self) -> &PhotoStatus {
        &self.photo_status
    }

    /// Last frame decode failure, if the frame could not be loaded.
    pub fn frame_error(&self) -> Option<&str> {
        self.frame_error.as_deref()
    }

    /// The editor UI should only be offered once the frame is loaded.
    pub fn is_ready(&self) -> bool {
        self.store.frame().is_some()
    }

    /// Compositor work counters.
    pub fn render_stats(&self) -> RenderStats {
        self.compositor.stats()
    }

    /// Decodes still running.
    pub fn pending_decodes(&self) -> usize {
        self.loader.in_flight()
    }

    /// Install an already decoded frame and redraw.
    pub fn set_frame_layer(&mut self, layer: Layer) -> TwibbonResult<()> {
        check_dims(layer.width, layer.height)?;
        self.latest_frame = None;
        self.frame_error = None;
        self.store.set_frame_layer(layer);
        self.flush()?;
        Ok(())
    }

    /// Start decoding the frame asset in the background.
    pub fn load_frame(&mut self, bytes: Vec<u8>) -> DecodeTicket {
        let ticket = self.loader.spawn(LayerSlot::Frame, bytes);
        self.latest_frame = Some(ticket);
        ticket
    }

    /// Unmount: release the frame and the drawing surface.
    pub fn release_frame(&mut self) {
        self.store.release_frame();
        self.store.take_dirty();
        self.compositor.release();
        tracing::debug!("frame released");
    }

    /// Install an already decoded photo and redraw. The transform is kept.
    pub fn set_photo_layer(&mut self, layer: Layer) -> TwibbonResult<()> {
        check_dims(layer.width, layer.height)?;
        self.latest_photo = None;
        self.store.set_photo_layer(layer);
        self.photo_status = PhotoStatus::Ready;
        self.flush()?;
        Ok(())
    }

    /// Start decoding an uploaded file. The current photo stays until the decode completes.
    pub fn upload_photo(&mut self, bytes: Vec<u8>) -> DecodeTicket {
        let ticket = self.loader.spawn(LayerSlot::Photo, bytes);
        self.latest_photo = Some(ticket);
        self.photo_status = PhotoStatus::Decoding { ticket };
        ticket
    }

    /// Remove the photo.
    pub fn clear_photo(&mut self) -> TwibbonResult<()> {
        self.latest_photo = None;
        self.store.clear_photo();
        self.photo_status = PhotoStatus::Empty;
        self.flush()?;
        Ok(())
    }

    /// Apply decodes that have finished, without blocking. Returns how many were applied.
    pub fn pump(&mut self) -> TwibbonResult<usize> {
        let ready = self.loader.drain_ready();
        let mut applied = 0;
        for msg in ready {
            if self.apply_decoded(msg) {
                applied += 1;
            }
        }
        self.fire_timers();
        self.flush()?;
        Ok(applied)
    }

    /// Block until every in-flight decode has completed and been applied.
    pub fn wait_for_decodes(&mut self) -> TwibbonResult<usize> {
        let mut applied = 0;
        while let Some(msg) = self.loader.recv_next()? {
            if self.apply_decoded(msg) {
                applied += 1;
            }
        }
        self.flush()?;
        Ok(applied)
    }

    /// Interpret and apply one input event, then redraw once.
    pub fn handle_input(&mut self, event: &InputEvent) -> TwibbonResult<Interpretation> {
        self.fire_timers();
        let out = self.input.interpret(event, self.store.transform().rotation_deg);
        let now = self.now();
        for cmd in &out.commands {
            self.apply_command(*cmd, now);
        }
        self.flush()?;
        Ok(out)
    }

    /// Rotation button.
    pub fn rotate(&mut self, step: RotateStep) -> TwibbonResult<()> {
        self.handle_input(&InputEvent::Rotate { step }).map(|_| ())
    }

    /// Apply a relative transform change directly, bypassing gesture interpretation.
    pub fn update_transform(&mut self, delta: TransformDelta) -> TwibbonResult<()> {
        self.store.update_transform(delta);
        self.flush()?;
        Ok(())
    }

    /// Return pan, zoom and rotation to identity.
    pub fn reset_transform(&mut self) -> TwibbonResult<()> {
        self.store.reset_transform();
        self.flush()?;
        Ok(())
    }

    /// Restore full frame opacity now, cancelling any pending restore.
    pub fn settle_opacity(&mut self) -> TwibbonResult<()> {
        let now = self.now();
        self.store.pulse_opacity(OpacityPulse::settle(), now);
        self.flush()?;
        Ok(())
    }

    /// Fire due opacity timers and redraw if anything changed. Hosts call this from their
    /// animation or timer loop.
    pub fn tick(&mut self) -> TwibbonResult<bool> {
        self.fire_timers();
        self.flush()
    }

    /// Redraw if the store changed since the last redraw. Returns whether a redraw happened.
    pub fn flush(&mut self) -> TwibbonResult<bool> {
        if !self.store.take_dirty() {
            return Ok(false);
        }
        self.compositor.render(&self.store)
    }

    /// Current surface pixels, once the frame has been drawn.
    pub fn snapshot(&self) -> Option<SurfaceRGBA> {
        self.compositor.snapshot()
    }

    /// PNG of the current surface; `None` while the frame is not loaded.
    pub fn export_png(&self) -> TwibbonResult<Option<Vec<u8>>> {
        if !self.is_ready() {
            return Ok(None);
        }
        self.compositor.export_png()
    }

    /// `data:image/png;base64,...` of the current surface.
    pub fn export_data_url(&self) -> TwibbonResult<Option<String>> {
        Ok(self.export_png()?.map(|png| png_data_url(&png)))
    }

    /// Downloadable artifact named per [`EditorOpts::export_file_name`].
    pub fn export(&self) -> TwibbonResult<Option<ExportArtifact>> {
        let Some(png) = self.export_png()? else {
            return Ok(None);
        };
        tracing::info!(bytes = png.len(), file = %self.opts.export_file_name, "avatar exported");
        Ok(Some(ExportArtifact {
            file_name: self.opts.export_file_name.clone(),
            png,
        }))
    }

    fn now(&self) -> Millis {
        self.clock.now()
    }

    fn fire_timers(&mut self) {
        let now = self.now();
        self.store.fire_due_timers(now);
    }

    fn apply_command(&mut self, cmd: EditCommand, now: Millis) {
        match cmd {
            EditCommand::Transform(delta) => self.store.update_transform(delta),
            EditCommand::Pulse(pulse) => self.store.pulse_opacity(pulse, now),
        }
    }

    fn apply_decoded(&mut self, msg: Decoded) -> bool {
        let latest = match msg.slot {
            LayerSlot::Frame => self.latest_frame,
            LayerSlot::Photo => self.latest_photo,
        };
        if latest != Some(msg.ticket) {
            tracing::debug!(
                ticket = msg.ticket.0,
                slot = ?msg.slot,
                "discarding superseded decode"
            );
            return false;
        }

        match (msg.slot, msg.result) {
            (LayerSlot::Frame, Ok(layer)) => {
                self.latest_frame = None;
                self.frame_error = None;
                self.store.set_frame_layer(layer);
            }
            (LayerSlot::Frame, Err(e)) => {
                tracing::warn!(error = %e, "frame decode failed");
                self.latest_frame = None;
                self.frame_error = Some(e.to_string());
            }
            (LayerSlot::Photo, Ok(layer)) => {
                self.latest_photo = None;
                self.store.set_photo_layer(layer);
                self.photo_status = PhotoStatus::Ready;
            }
            (LayerSlot::Photo, Err(e)) => {
                tracing::warn!(error = %e, "photo decode failed");
                self.latest_photo = None;
                self.photo_status = PhotoStatus::Failed {
                    reason: e.to_string(),
                };
            }
        }
        true
    }
}
