//! Image annotation core.
//!
//! Upload images, pick one, draw over it with a pen, highlighter or eraser,
//! then download the result as PNG or copy it to the clipboard. The host UI
//! forwards its events to an [`Annotator`] and renders what it reports back.

pub mod annotator;
pub mod config;
pub mod draw;
pub mod export;
pub mod input;
pub mod notification;
pub mod script;
pub mod store;
pub mod util;

pub use annotator::{Annotator, Collaborators};
pub use config::Config;
pub use draw::{CanvasSurface, Point};
pub use export::{ExportError, ShareOutcome};
pub use input::{PointerEvent, ToolMode};
pub use notification::{Notice, UiObserver};
pub use script::Script;
pub use store::{ImageFile, ImageId, ImageRecord};
