//! # Frame Model
//!
//! Immutable RGBA frames with an absolute extent. Every operation returns a
//! new [`Frame`]; nothing is mutated in place, so a frame handed to a kernel
//! is never invalidated by the kernel's output.

pub mod types;
mod ops;

pub use ops::blend_over;
pub use types::{Extent, Frame, Point, Rgba, TRANSPARENT};
