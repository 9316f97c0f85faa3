//! Sphere primitive for ray tracing.
//!
//! Implements ray-sphere intersection using the half-b form of the
//! quadratic formula.

use glam::DVec3;

use crate::hittable::{HitRecord, Hittable, MaterialId};
use crate::interval::Interval;
use crate::ray::Ray;

/// Sphere primitive defined by center, radius, and material handle.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    /// Center point of the sphere in world coordinates.
    pub center: DVec3,

    /// Radius of the sphere, strictly positive.
    pub radius: f64,

    /// Handle into the scene's material palette.
    pub material: MaterialId,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// # Panics
    ///
    /// Panics if `radius` is not strictly positive. A degenerate sphere is
    /// a scene-construction bug, not a renderable object.
    pub fn new(center: DVec3, radius: f64, material: MaterialId) -> Self {
        assert!(
            radius > 0.0,
            "sphere radius must be positive, got {radius}"
        );
        Self {
            center,
            radius,
            material,
        }
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, range: Interval) -> Option<HitRecord> {
        let oc = ray.origin - self.center;

        // Quadratic coefficients with b folded in half
        let a = ray.direction.length_squared();
        let half_b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Nearest root inside the open interval, then the far one
        let mut root = (-half_b - sqrtd) / a;
        if !range.surrounds(root) {
            root = (-half_b + sqrtd) / a;
            if !range.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(ray, root, outward_normal, self.material))
    }
}
