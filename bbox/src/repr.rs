use crate::{
    common::*,
    element::Element,
    oriented::OrientedBox,
    radian::{AngleVersion, RadianBox},
    tlbr::TLBR,
};

/// The box parameterization tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// `[x_min, y_min, x_max, y_max]`.
    AxisAligned,
    /// `[cx, cy, long_side, short_side, angle_degrees]`.
    OrientedDegrees,
    /// `[x, y, w, h, angle_radians]` under an angle convention.
    Radians(AngleVersion),
}

impl Representation {
    /// Number of geometry columns in the array form, excluding the class column.
    pub fn num_params(&self) -> usize {
        match self {
            Self::AxisAligned => 4,
            Self::OrientedDegrees | Self::Radians(_) => 5,
        }
    }
}

/// A box in any of the supported parameterizations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnyBox<T> {
    AxisAligned(TLBR<T>),
    Oriented(OrientedBox<T>),
    Radian {
        rect: RadianBox<T>,
        version: AngleVersion,
    },
}

impl<T> AnyBox<T>
where
    T: Element,
{
    /// Parses the geometry columns of an array row under the given representation.
    pub fn try_from_params(params: &[T], representation: Representation) -> Result<Self> {
        ensure!(
            params.len() == representation.num_params(),
            "expect {} parameters for {:?}, but get {}",
            representation.num_params(),
            representation,
            params.len()
        );

        let rect = match representation {
            Representation::AxisAligned => {
                Self::AxisAligned(TLBR::try_from_xyxy([params[0], params[1], params[2], params[3]])?)
            }
            Representation::OrientedDegrees => Self::Oriented(OrientedBox::try_new(
                params[0], params[1], params[2], params[3], params[4],
            )?),
            Representation::Radians(version) => Self::Radian {
                rect: RadianBox::try_new(params[0], params[1], params[2], params[3], params[4])?,
                version,
            },
        };
        Ok(rect)
    }

    pub fn representation(&self) -> Representation {
        match self {
            Self::AxisAligned(_) => Representation::AxisAligned,
            Self::Oriented(_) => Representation::OrientedDegrees,
            Self::Radian { version, .. } => Representation::Radians(*version),
        }
    }

    /// Geometry columns in the array form of this representation.
    pub fn params(&self) -> Vec<T> {
        match self {
            Self::AxisAligned(rect) => rect.xyxy().to_vec(),
            Self::Oriented(rect) => rect.params().to_vec(),
            Self::Radian { rect, .. } => rect.params().to_vec(),
        }
    }

    pub fn to_oriented(&self) -> OrientedBox<T> {
        match self {
            Self::AxisAligned(rect) => OrientedBox::from(rect),
            Self::Oriented(rect) => *rect,
            Self::Radian { rect, .. } => rect.to_oriented(),
        }
    }

    pub fn to_radian(&self, version: AngleVersion) -> RadianBox<T> {
        match self {
            Self::Radian { rect, .. } => rect.regularize(version),
            _ => self.to_oriented().to_radian(version),
        }
    }

    /// The axis-aligned box, enclosing the rotated rectangle if needed.
    pub fn to_tlbr(&self) -> TLBR<T> {
        match self {
            Self::AxisAligned(rect) => *rect,
            Self::Oriented(rect) => rect.to_tlbr(),
            Self::Radian { rect, .. } => TLBR::enclosing(&rect.corners()),
        }
    }

    /// Converts into another representation.
    pub fn convert(&self, representation: Representation) -> Self {
        match representation {
            Representation::AxisAligned => Self::AxisAligned(self.to_tlbr()),
            Representation::OrientedDegrees => Self::Oriented(self.to_oriented()),
            Representation::Radians(version) => Self::Radian {
                rect: self.to_radian(version),
                version,
            },
        }
    }
}

impl<T> From<TLBR<T>> for AnyBox<T> {
    fn from(from: TLBR<T>) -> Self {
        Self::AxisAligned(from)
    }
}

impl<T> From<OrientedBox<T>> for AnyBox<T> {
    fn from(from: OrientedBox<T>) -> Self {
        Self::Oriented(from)
    }
}
