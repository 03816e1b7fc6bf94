//! Common imports from external crates.

pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use bbox::{
    polygon::RotatedRect, rotated_iof, AngleVersion, OrientedBox, RadianBox, Transform, TLBR,
};
pub use image::{imageops::FilterType, Rgb, RgbImage};
pub use itertools::izip;
pub use label::{HbbLabel, Label, ObbLabel};
pub use log::{debug, warn};
pub use ndarray::{s, Array3, Zip};
pub use noisy_float::prelude::*;
pub use rand::prelude::*;
pub use serde::{Deserialize, Serialize};
pub use std::{
    collections::HashSet,
    fmt::{self, Display},
    path::Path,
    str::FromStr,
};
