// src/geometry.rs

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::intersection;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable, PartialEq)]
pub struct Triangle3 {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle3 {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Point transform of all three corners, order preserved.
    pub fn transformed(&self, transform: &Mat4) -> Self {
        Self {
            a: transform.transform_point3(self.a),
            b: transform.transform_point3(self.b),
            c: transform.transform_point3(self.c),
        }
    }

    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a).normalize_or_zero()
    }

    pub fn intersect_line(&self, line: &Line3) -> Option<Vec3> {
        intersection::line_vs_triangle(line, self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb3 {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO)
    }
}

impl Aabb3 {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box around `points`; a zero box when the iterator is empty.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Self::default();
        };
        let mut aabb = Self::new(first, first);
        for point in points {
            aabb.add_point(point);
        }
        aabb
    }

    pub fn add_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn intersects_box(&self, other: &Aabb3) -> bool {
        intersection::box_vs_box(self, other)
    }

    pub fn intersects_line(&self, line: &Line3) -> bool {
        intersection::box_vs_line(self, line)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line3 {
    pub start: Vec3,
    pub end: Vec3,
}

impl Line3 {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    pub fn middle(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    pub fn vector(&self) -> Vec3 {
        self.end - self.start
    }

    pub fn length(&self) -> f32 {
        self.vector().length()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_points_encloses_all() {
        let aabb = Aabb3::from_points([
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(-1.0, 4.0, 0.5),
            Vec3::new(0.0, 0.0, 7.0),
        ]);
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.5));
        assert_eq!(aabb.max, Vec3::new(1.0, 4.0, 7.0));
        assert!(aabb.contains_point(Vec3::new(0.0, 0.0, 1.0)));
        assert!(!aabb.contains_point(Vec3::new(0.0, 5.0, 1.0)));
    }

    #[test]
    fn test_from_no_points_is_zero_box() {
        assert_eq!(Aabb3::from_points(std::iter::empty()), Aabb3::default());
    }

    #[test]
    fn test_triangle_translation_keeps_order() {
        let tri = Triangle3::new(Vec3::X, Vec3::Y, Vec3::Z);
        let moved = tri.transformed(&Mat4::from_translation(Vec3::new(10.0, 0.0, -5.0)));
        assert_eq!(moved.a, Vec3::new(11.0, 0.0, -5.0));
        assert_eq!(moved.b, Vec3::new(10.0, 1.0, -5.0));
        assert_eq!(moved.c, Vec3::new(10.0, 0.0, -4.0));
    }

    #[test]
    fn test_triangle_is_plain_old_data() {
        let tris = [Triangle3::new(Vec3::X, Vec3::Y, Vec3::Z)];
        let floats: &[f32] = bytemuck::cast_slice(&tris);
        assert_eq!(floats, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }
}
