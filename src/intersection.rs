// src/intersection.rs

use glam::Vec3;

use crate::geometry::{Aabb3, Line3, Triangle3};

const PARALLEL_EPSILON: f32 = 1e-10;

#[inline(always)]
pub fn box_vs_box(lhs: &Aabb3, rhs: &Aabb3) -> bool {
    lhs.min.cmple(rhs.max).all() && lhs.max.cmpge(rhs.min).all()
}

/// Separating-axis test between a box and a finite segment.
pub fn box_vs_line(aabb: &Aabb3, line: &Line3) -> bool {
    let direction = line.vector().normalize_or_zero();
    box_vs_line_parts(aabb, line.middle(), direction, line.length() * 0.5)
}

fn box_vs_line_parts(aabb: &Aabb3, line_middle: Vec3, direction: Vec3, half_length: f32) -> bool {
    let e = aabb.extent() * 0.5;
    let t = aabb.center() - line_middle;
    let d = direction.abs();

    // Box face normals.
    if t.abs().cmpgt(e + half_length * d).any() {
        return false;
    }

    // Cross products of the segment direction with each box axis.
    let r = e.y * d.z + e.z * d.y;
    if (t.y * direction.z - t.z * direction.y).abs() > r {
        return false;
    }
    let r = e.x * d.z + e.z * d.x;
    if (t.z * direction.x - t.x * direction.z).abs() > r {
        return false;
    }
    let r = e.x * d.y + e.y * d.x;
    if (t.x * direction.y - t.y * direction.x).abs() > r {
        return false;
    }

    true
}

/// Moller-Trumbore against the segment; returns the hit point when it lies between start and end.
pub fn line_vs_triangle(line: &Line3, tri: &Triangle3) -> Option<Vec3> {
    let dir = line.vector();
    let edge1 = tri.b - tri.a;
    let edge2 = tri.c - tri.a;

    let p = dir.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let s = line.start - tri.a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    Some(line.start + dir * t)
}
