//! # RGB-D Localization Core
//!
//! This library provides the common types shared by every crate of the RGB-D ceiling-landmark
//! localization workspace. Ceiling lights are detected twice per frame, once in the "no data"
//! region of the depth sensor (specular lights blank the disparity) and once in the edge mask of
//! the color camera. Each detection is a [`Quadrilateral`] in pixel coordinates, stored in a
//! bounded [`LandmarkSet`]. The distance to each light fills a slot of a [`RangeVector`], and the
//! known world coordinates of the lights live in a [`LandmarkTable`].
//!
//! ```text
//!        L0 ----------- L2          ceiling (z = 2.905 m)
//!         \   \     /   /
//!          \    \ /    /
//!           \   / \   /
//!            \ /   \ /
//!        L1 --O----- L3
//!             |
//!             | observer (unknown position)
//! ```
//!
//! Sensor access happens through the [`DepthSampler`] trait so that the estimation code never
//! depends on a particular image container.
//!
//! The crate is `#![no_std]` but needs an allocator for the variable-length [`Polygon`],
//! [`RangeVector`] and [`LandmarkTable`]. Float math goes through `num-traits` with `libm`.

#![no_std]

extern crate alloc;

mod landmark_set;
mod quad;
mod range;
mod sampler;
mod table;

pub use landmark_set::*;
pub use nalgebra;
pub use quad::*;
pub use range::*;
pub use sampler::*;
pub use table::*;

/// The maximum number of landmarks tracked per modality per frame.
pub const LANDMARK_COUNT_MAX: usize = 10;

/// The width of the depth and color sensor frames in pixels.
pub const SENSOR_WIDTH: u32 = 640;

/// The height of the depth and color sensor frames in pixels.
pub const SENSOR_HEIGHT: u32 = 480;

/// Raw disparity readings are 11 bits. This value (all bits set) means "no reading".
pub const RAW_DISPARITY_MAX: u16 = 2047;
