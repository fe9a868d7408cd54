//! Pointillist reconstruction of raster images.
//!
//! An image is [acquired][acquire::acquire] into a [`PixelBuffer`], then a [`RenderSession`]
//! repeatedly samples random pixels from it and paints color-jittered, semi-transparent dots onto
//! a [`DrawSurface`], coarse to fine, until its ink budget runs out.

pub mod acquire;
pub mod config;
pub mod error;
pub mod math;
pub mod pixels;
pub mod rand;
pub mod schedule;
pub mod session;
pub mod surface;
pub mod timer;

pub use error::{Error, Result};
pub use pixels::PixelBuffer;
pub use session::{animate, RenderSession, Tick};
pub use surface::{Canvas, Dot, DotLog, DrawSurface};
