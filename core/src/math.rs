use core::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// 2D vector in screen space (y grows downward).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians).
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    pub fn distance_squared(self, rhs: Self) -> f32 {
        (self - rhs).length_squared()
    }

    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Angle of this vector in radians, in `(-PI, PI]`.
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    pub fn normalized(self) -> Result<Self, SimError> {
        let len = self.length();
        if len <= f32::EPSILON || !len.is_finite() {
            return Err(SimError::DegenerateVector);
        }
        Ok(Self::new(self.x / len, self.y / len))
    }

    /// Unit direction from `source` toward `target`.
    pub fn direction_between(source: Self, target: Self) -> Result<Self, SimError> {
        (target - source).normalized()
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_top_left(top_left: Vec2, width: f32, height: f32) -> Self {
        Self::new(top_left.x, top_left.y, width, height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Center of a `width` x `height` box whose top-left corner is `pos`.
pub fn center_of(pos: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(pos.x + width / 2.0, pos.y + height / 2.0)
}

/// Circles touching at exactly one point count as overlapping.
pub fn circles_overlap(a: Vec2, ar: f32, b: Vec2, br: f32) -> bool {
    let reach = ar + br;
    a.distance_squared(b) <= reach * reach
}

pub fn circle_overlaps_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let half_w = rect.width / 2.0;
    let half_h = rect.height / 2.0;
    let rect_center = rect.center();
    let dx = (center.x - rect_center.x).abs();
    let dy = (center.y - rect_center.y).abs();

    if dx > half_w + radius || dy > half_h + radius {
        return false;
    }
    if dx <= half_w || dy <= half_h {
        return true;
    }

    let corner_x = dx - half_w;
    let corner_y = dy - half_h;
    corner_x * corner_x + corner_y * corner_y <= radius * radius
}

/// True when the circle's bounding box lies entirely outside `bounds`.
pub fn circle_fully_outside(center: Vec2, radius: f32, bounds: &Rect) -> bool {
    center.x + radius < bounds.x
        || center.x - radius > bounds.x + bounds.width
        || center.y + radius < bounds.y
        || center.y - radius > bounds.y + bounds.height
}
