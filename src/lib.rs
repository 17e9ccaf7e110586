//! Sketch Practice Library
//!
//! Timed sketch-practice slideshow: pick a folder of reference images and an
//! interval, then draw while the images rotate.
//!
//! Architecture:
//! - slideshow: image list, cursor, countdown and advance timer
//! - monitor / mirror: foreground window poll mirrored onto the app window
//! - platform: native window capability (Windows only)
//! - gui: iced application wiring it all together

pub mod config;
pub mod error;
pub mod gui;
pub mod image_picker;
pub mod interval;
pub mod mirror;
pub mod monitor;
pub mod platform;
pub mod slideshow;

pub use error::SketchError;
