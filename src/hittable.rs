//! Ray-object intersection system.
//!
//! Defines the `Hittable` trait for geometric primitives, `HitRecord` for
//! intersection data, and `Scene`, the aggregate that owns every sphere
//! together with the material palette they index into.

use glam::DVec3;

use crate::interval::Interval;
use crate::material::Material;
use crate::ray::Ray;
use crate::sphere::Sphere;

/// Handle to a material slot in the scene's palette.
///
/// Spheres and hit records carry this index instead of owning material
/// data; the palette outlives every hit record for the duration of a
/// render, and any number of spheres may share one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialId(pub usize);

/// Ray-object intersection information.
///
/// Contains intersection point, surface normal, distance, and the material
/// handle needed for shading.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Point where the ray intersects the object
    pub point: DVec3,
    /// Surface normal at the intersection point (unit length, always
    /// pointing against the incident ray)
    pub normal: DVec3,
    /// Ray parameter of the intersection point
    pub t: f64,
    /// True if the ray hit the front face, false for the back face
    pub front_face: bool,
    /// Material of the object at the hit point
    pub material: MaterialId,
}

impl HitRecord {
    /// Build a record from an outward normal, flipping it to oppose the ray.
    pub fn new(ray: &Ray, t: f64, outward_normal: DVec3, material: MaterialId) -> Self {
        let front_face = ray.direction.dot(outward_normal) < 0.0;
        Self {
            point: ray.at(t),
            normal: if front_face {
                outward_normal
            } else {
                -outward_normal
            },
            t,
            front_face,
            material,
        }
    }
}

/// Trait for objects that can be intersected by rays.
///
/// Implementors must be thread-safe (`Sync + Send`) so a render can query
/// the same scene from every worker concurrently.
pub trait Hittable: Sync + Send {
    /// Test for ray intersection within the given parameter range.
    ///
    /// Returns the intersection closest to the ray origin whose parameter
    /// lies strictly inside `range`, or `None`.
    fn hit(&self, ray: &Ray, range: Interval) -> Option<HitRecord>;
}

/// A renderable world: spheres plus the material palette they reference.
///
/// The primitive set is closed, so the scene stores concrete spheres and
/// intersection uses a linear scan with static dispatch.
#[derive(Default)]
pub struct Scene {
    spheres: Vec<Sphere>,
    materials: Vec<Material>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material to the palette, returning its handle.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Add a sphere referencing a previously added material.
    pub fn add_sphere(&mut self, center: DVec3, radius: f64, material: MaterialId) {
        assert!(
            material.0 < self.materials.len(),
            "material id {} is not in the palette",
            material.0
        );
        self.spheres.push(Sphere::new(center, radius, material));
    }

    /// Look up a material by handle.
    pub fn material(&self, id: MaterialId) -> &Material {
        &self.materials[id.0]
    }

    /// Number of spheres in the scene.
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// True if the scene contains no spheres.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

impl Hittable for Scene {
    /// Find the nearest intersection over all spheres.
    ///
    /// The upper bound of the search interval narrows to the closest hit
    /// found so far, so nearer objects always win regardless of insertion
    /// order.
    fn hit(&self, ray: &Ray, range: Interval) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;
        let mut closest_so_far = range.max;

        for sphere in &self.spheres {
            if let Some(hit) = sphere.hit(ray, Interval::new(range.min, closest_so_far)) {
                closest_so_far = hit.t;
                closest = Some(hit);
            }
        }

        closest
    }
}
