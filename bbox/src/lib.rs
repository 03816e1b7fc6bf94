//! Box parameterizations and rotated-rectangle geometry.

mod common;

pub use element::*;
pub mod element;

pub use tlbr::*;
pub mod tlbr;

pub use oriented::*;
pub mod oriented;

pub use radian::*;
pub mod radian;

pub use repr::*;
pub mod repr;

pub use transform::*;
mod transform;

pub use polygon::*;
pub mod polygon;

pub mod prelude {
    pub use crate::{element::Element, polygon::RotatedRect};
}
