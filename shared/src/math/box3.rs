use glam::Vec3;

use crate::math::AffineTransform;

/// Axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Box3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Box3 {
    fn default() -> Self {
        Self::UNIT
    }
}

impl Box3 {
    /// `[-0.5, 0.5]` on every axis
    pub const UNIT: Box3 = Box3 {
        min: Vec3::splat(-0.5),
        max: Vec3::splat(0.5),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Tightest box around `points`, `None` when there are none.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut output = Self::new(*first, *first);
        for point in rest {
            output.min = output.min.min(*point);
            output.max = output.max.max(*point);
        }
        Some(output)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (min, max) = (self.min, self.max);
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ]
    }

    /// World-space bounds of this object-space box after scaling, then
    /// applying `transform`.
    pub fn to_world(&self, transform: &AffineTransform, scale: Vec3) -> Box3 {
        let corners = self
            .corners()
            .map(|corner| transform.transform_point(corner * scale));
        let mut output = Box3::new(corners[0], corners[0]);
        for corner in &corners[1..] {
            output.min = output.min.min(*corner);
            output.max = output.max.max(*corner);
        }
        output
    }
}
