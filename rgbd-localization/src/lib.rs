//! Localizes an RGB-D sensor (such as the Kinect) under a ceiling with known lights.
//!
//! Every frame goes through the same steps:
//!
//! 1. The disparity readings at or above the no-data threshold form a mask. It is shifted to
//!    line up with the color image and accumulated with the masks of previous frames.
//! 2. Polygons are extracted from the accumulated mask and from the color edge mask by a
//!    [`PolygonExtractor`], then filtered down to landmarks.
//! 3. Depth landmarks are matched against color landmarks.
//! 4. The distance to each matched depth landmark is estimated from the disparity around it.
//! 5. If the distance to every known landmark was measured, the position is multilaterated.
//!
//! A [`Session`] runs these steps and keeps the state that lives between frames.

mod error;
mod extract;
mod session;
mod settings;

pub use error::*;
pub use extract::*;
pub use session::*;
pub use settings::*;

pub use multilateration;
pub use rgbd_core;
pub use rgbd_depth;
pub use rgbd_landmarks;
