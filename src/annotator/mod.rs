//! The annotation controller.
//!
//! [`Annotator`] owns every piece of mutable widget state: the uploaded images,
//! the selected tool, the stroke in progress and the canvas pixels. The host
//! forwards its events here and receives feedback through a
//! [`UiObserver`](crate::notification::UiObserver).

mod controller;
mod pointer;
mod share;

pub use controller::{Annotator, Collaborators};
