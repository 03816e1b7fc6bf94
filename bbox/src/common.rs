pub use anyhow::{bail, ensure, Error, Result};
pub use num_traits::{Float, FloatConst, NumCast};
pub use std::{
    fmt::{self, Debug, Display},
    ops::Mul,
    str::FromStr,
};
