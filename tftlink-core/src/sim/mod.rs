//! Host-side stand-ins for the display MCU
//!
//! [`RecordingSink`] keeps every request it is given; [`PanelModel`] replays
//! requests the way the MCU and panel controller would and keeps the
//! resulting frame memory, so tests can check what the panel shows rather
//! than which bytes were sent.

pub mod panel;
pub mod recorder;

pub use panel::PanelModel;
pub use recorder::{RecordingSink, Request};
