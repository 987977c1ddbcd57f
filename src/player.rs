//! Player controller: one media resource, the current folder's tracks and
//! the volume/mute state.
//!
//! The controller never talks to rodio directly. It drives anything that
//! implements [`Media`], which keeps it testable without an output device.

mod controller;
mod media;
mod volume;

pub use controller::*;
pub use media::Media;
pub use volume::Volume;
