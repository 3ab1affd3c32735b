#![forbid(unsafe_code)]
//! Avatar frame compositor for a birthday microsite.
//!
//! A visitor uploads a photo, positions it under a fixed decorative frame with drag, pinch,
//! wheel and rotate gestures, and downloads the flattened result as a PNG. The crate also
//! carries the guestbook and download-tracking collaborators the page talks to.
//!
//! The entry point for the editor is [`AvatarEditor`]; everything it composes is exported for
//! hosts that want to drive the pieces directly.

mod assets;
mod downloads;
mod editor;
mod foundation;
mod guestbook;
mod input;
mod layers;
mod render;

pub use assets::Layer;
pub use assets::decode::{
    ACCEPTED_FORMATS, MAX_LAYER_SIDE, decode_layer, layer_from_rgba_image, solid_layer,
};
pub use assets::loader::{DecodeTicket, LayerSlot};
pub use downloads::{ClientIdentity, DownloadLog, DownloadTracker, MemoryDownloadLog};
pub use editor::opts::EditorOpts;
pub use editor::session::{AvatarEditor, PhotoStatus};
pub use foundation::clock::{Clock, ManualClock, SystemClock};
pub use foundation::core::{Affine, Canvas, Millis, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{TwibbonError, TwibbonResult};
pub use guestbook::store::{MemoryMessageStore, MessageRecord, MessageStore, NewMessageRecord};
pub use guestbook::validate::{
    FieldErrors, MAX_MESSAGE_CHARS, MAX_NAME_CHARS, MessageForm, ValidMessage,
    remaining_message_chars, validate_message,
};
pub use guestbook::{Guestbook, GuestbookPage, PAGE_SIZE, PostOutcome};
pub use input::event::{InputEvent, Modifiers, RotateStep};
pub use input::gesture::{GesturePhase, GestureSession, PinchSample};
pub use input::interpreter::{
    EditCommand, InputInterpreter, InputOpts, Interpretation, WheelModifier,
};
pub use layers::store::{LayerStore, OpacityPulse};
pub use layers::transform::{
    Transform, TransformDelta, ZoomBounds, screen_to_layer_delta, wrap_degrees,
};
pub use render::compositor::{Compositor, RenderStats, photo_affine};
pub use render::export::{DEFAULT_EXPORT_FILE_NAME, ExportArtifact, encode_png, png_data_url};
pub use render::surface::SurfaceRGBA;
