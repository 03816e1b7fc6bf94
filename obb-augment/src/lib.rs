//! Data augmentation for oriented and axis-aligned box detection.

mod common;
pub mod color_jitter;
pub mod config;
pub mod filter;
pub mod flip;
pub mod image_ops;
pub mod letterbox;
pub mod mixup;
pub mod mosaic;
pub mod pipeline;
pub mod random_affine;
pub mod random_crop;
pub mod rotate;

pub use color_jitter::*;
pub use config::*;
pub use filter::*;
pub use flip::*;
pub use image_ops::Image;
pub use letterbox::*;
pub use mixup::*;
pub use mosaic::*;
pub use pipeline::*;
pub use random_affine::*;
pub use random_crop::*;
pub use rotate::*;
