use std::ops::{Add, AddAssign, Mul, MulAssign};

/// Linear RGB color carried by shading samples and AOV accumulators.
///
/// Component values are open-ended (HDR); nothing here clamps.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color3 {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
}

impl Color3 {
    /// All components zero.
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Build a color from components.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a gray color with all components equal to `v`.
    pub fn splat(v: f32) -> Self {
        Self { r: v, g: v, b: v }
    }
}

impl Add for Color3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            r: self.r + rhs.r,
            g: self.g + rhs.g,
            b: self.b + rhs.b,
        }
    }
}

impl AddAssign for Color3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<f32> for Color3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self {
            r: self.r * rhs,
            g: self.g * rhs,
            b: self.b * rhs,
        }
    }
}

impl MulAssign<f32> for Color3 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}
