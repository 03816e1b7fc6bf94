use crate::{
    common::*,
    element::{floor_mod, Element},
    oriented::{normalize_angle_fold, OrientedBox},
};

/// The angle convention of a [RadianBox].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AngleVersion {
    /// OpenCV convention, angle in `(0, π/2]`.
    Oc,
    /// Long-edge convention, angle in `[-π/4, 3π/4)`.
    Le135,
    /// Long-edge convention, angle in `[-π/2, π/2)`.
    Le90,
}

impl AngleVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Oc => "oc",
            Self::Le135 => "le135",
            Self::Le90 => "le90",
        }
    }
}

impl Default for AngleVersion {
    fn default() -> Self {
        Self::Oc
    }
}

impl FromStr for AngleVersion {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let version = match text {
            "oc" => Self::Oc,
            "le135" => Self::Le135,
            "le90" => Self::Le90,
            _ => bail!(
                r#"invalid angle version "{}", expect "oc", "le135" or "le90""#,
                text
            ),
        };
        Ok(version)
    }
}

impl Display for AngleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalizes a radian angle into the range of the angle convention.
///
/// The `oc` convention leaves the angle untouched.
pub fn norm_angle<T>(angle: T, version: AngleVersion) -> T
where
    T: Element,
{
    match version {
        AngleVersion::Oc => angle,
        AngleVersion::Le135 => floor_mod(angle + T::FRAC_PI_4(), T::PI()) - T::FRAC_PI_4(),
        AngleVersion::Le90 => floor_mod(angle + T::FRAC_PI_2(), T::PI()) - T::FRAC_PI_2(),
    }
}

/// Rotated box in `(x, y, w, h, angle)` form with the angle in radians.
///
/// The `w` side runs along `(cos a, sin a)` in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadianBox<T> {
    pub(crate) x: T,
    pub(crate) y: T,
    pub(crate) w: T,
    pub(crate) h: T,
    pub(crate) angle: T,
}

impl<T> RadianBox<T>
where
    T: Element,
{
    pub fn try_new(x: T, y: T, w: T, h: T, angle: T) -> Result<Self> {
        ensure!(
            [x, y, w, h, angle].iter().all(|val| val.is_finite()),
            "box parameters must be finite"
        );
        ensure!(
            w >= T::zero() && h >= T::zero(),
            "side lengths must be non-negative"
        );
        Ok(Self { x, y, w, h, angle })
    }

    pub fn try_from_params(params: [T; 5]) -> Result<Self> {
        let [x, y, w, h, angle] = params;
        Self::try_new(x, y, w, h, angle)
    }

    pub fn x(&self) -> T {
        self.x
    }

    pub fn y(&self) -> T {
        self.y
    }

    pub fn w(&self) -> T {
        self.w
    }

    pub fn h(&self) -> T {
        self.h
    }

    pub fn angle(&self) -> T {
        self.angle
    }

    pub fn area(&self) -> T {
        self.w * self.h
    }

    /// Parameters in `[x, y, w, h, angle]` order.
    pub fn params(&self) -> [T; 5] {
        [self.x, self.y, self.w, self.h, self.angle]
    }

    pub fn with_center(&self, x: T, y: T) -> Self {
        Self { x, y, ..*self }
    }

    /// Replaces the angle as is, without normalization.
    pub fn with_angle(&self, angle: T) -> Self {
        Self { angle, ..*self }
    }

    pub fn swap_sides(&self) -> Self {
        Self {
            w: self.h,
            h: self.w,
            ..*self
        }
    }

    pub fn translate(&self, dx: T, dy: T) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Corner points in `[x, y]` order, forming a closed ring.
    pub fn corners(&self) -> [[T; 2]; 4] {
        let (sin, cos) = self.angle.sin_cos();
        let two = T::lit(2.0);
        let (ux, uy) = (cos * self.w / two, sin * self.w / two);
        let (vx, vy) = (-sin * self.h / two, cos * self.h / two);
        let Self { x, y, .. } = *self;

        [
            [x + ux + vx, y + uy + vy],
            [x - ux + vx, y - uy + vy],
            [x - ux - vx, y - uy - vy],
            [x + ux - vx, y + uy - vy],
        ]
    }

    /// Rewrites the box so that its angle falls in the range of `version`.
    ///
    /// The described rectangle does not change.
    pub fn regularize(&self, version: AngleVersion) -> Self {
        match version {
            AngleVersion::Oc => {
                let angle = floor_mod(self.angle, T::PI());
                if angle == T::zero() {
                    self.swap_sides().with_angle(T::FRAC_PI_2())
                } else if angle > T::FRAC_PI_2() {
                    self.swap_sides().with_angle(angle - T::FRAC_PI_2())
                } else {
                    self.with_angle(angle)
                }
            }
            AngleVersion::Le135 | AngleVersion::Le90 => {
                self.with_angle(norm_angle(self.angle, version))
            }
        }
    }

    /// Converts to the oriented-degree form, making `w`/`h` the long/short side.
    pub fn to_oriented(&self) -> OrientedBox<T> {
        let (long, short, angle) = if self.w >= self.h {
            (self.w, self.h, self.angle)
        } else {
            (self.h, self.w, self.angle + T::FRAC_PI_2())
        };

        OrientedBox {
            cx: self.x,
            cy: self.y,
            long,
            short,
            angle: normalize_angle_fold(angle.to_degrees()),
        }
    }
}
