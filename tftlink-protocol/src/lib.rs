//! TFTLink request format
//!
//! This crate defines the byte stream exchanged between the host-side encoder
//! and the MCU that drives an ST7796S/ST7789V panel over an 8080 parallel
//! bus. The host packs pixel data and panel commands into requests; the MCU
//! replays every request onto the bus.
//!
//! # Request Format
//!
//! A request is a sequence of frames, each a one-byte header followed by
//! payload:
//! ```text
//! ┌──────────┬──────────────────────────────────────────────────┐
//! │ HEADER   │ PAYLOAD                                          │
//! ├──────────┼──────────────────────────────────────────────────┤
//! │ 0–63     │ n+1 bytes, first byte sent as command (DCX low)  │
//! │ 64–127   │ n-63 bytes of data                               │
//! │ 128–255  │ 2 bytes of data, sent n-126 times                │
//! └──────────┴──────────────────────────────────────────────────┘
//! ```
//!
//! Requests travel with a one-byte length, so a request never exceeds
//! [`MAX_REQUEST_SIZE`] bytes.

#![no_std]
#![deny(unsafe_code)]

pub mod commands;
pub mod frame;

pub use commands::{reg, PanelCommand, MAX_COMMAND_LEN};
pub use frame::{
    frames, replay, BusWrite, Frame, FrameError, FrameKind, Frames, MAX_CHUNK_LEN, MAX_REPEAT,
    MAX_REQUEST_SIZE, MIN_REPEAT,
};
