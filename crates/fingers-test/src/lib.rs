//! Scripted input and event recording for fingers gestures.
//!
//! - [`Harness`]: drives an [`fingers_core::Instance`] with a manual clock
//! - [`Recorder`]: captures fired gesture events for assertions and dumps

#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_panics_doc)]

mod harness;
mod recorder;

pub use harness::Harness;
pub use recorder::{RecordedEvent, Recorder};
