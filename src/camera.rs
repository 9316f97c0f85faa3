//! Camera model and primary ray generation.
//!
//! Uses a pinhole camera with optional thin-lens defocus blur. Framing
//! parameters are public; derived viewport geometry is cached by
//! [`Camera::initialize`] and must be recomputed after any parameter
//! change.

use glam::DVec3;
use rand::Rng;

use crate::random;
use crate::ray::Ray;

/// Camera for primary ray generation.
///
/// Pixel (0, 0) is the top-left corner of the image; the row index grows
/// downward, which is why the vertical viewport edge runs along `-v`.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Rendered image width in pixel count
    pub image_width: u32,
    /// Rendered image height in pixel count
    pub image_height: u32,
    /// Vertical field of view in degrees
    pub vfov: f64,
    /// Point the camera looks from (camera position)
    pub lookfrom: DVec3,
    /// Point the camera looks at
    pub lookat: DVec3,
    /// Camera-relative "up" direction
    pub vup: DVec3,
    /// Variation angle of rays through each pixel, in degrees
    /// (0 disables defocus blur)
    pub defocus_angle: f64,
    /// Distance from `lookfrom` to the plane of perfect focus
    pub focus_dist: f64,

    /// World position of the top-left pixel's sample center
    pixel00_loc: DVec3,
    /// Offset from pixel to pixel horizontally
    pixel_delta_u: DVec3,
    /// Offset from pixel to pixel vertically (points down)
    pixel_delta_v: DVec3,
    /// Camera frame basis vector pointing right
    u: DVec3,
    /// Camera frame basis vector pointing up
    v: DVec3,
    /// Camera frame basis vector opposite the view direction
    w: DVec3,
    /// Defocus disk horizontal radius vector
    defocus_disk_u: DVec3,
    /// Defocus disk vertical radius vector
    defocus_disk_v: DVec3,
    /// Whether the derived fields match the public parameters
    initialized: bool,
}

impl Camera {
    /// Create a camera with default framing: 100x100 image, 90 degree FOV,
    /// looking down -z from the origin, no defocus blur.
    pub fn new() -> Self {
        Self {
            image_width: 100,
            image_height: 100,
            vfov: 90.0,
            lookfrom: DVec3::ZERO,
            lookat: DVec3::new(0.0, 0.0, -1.0),
            vup: DVec3::new(0.0, 1.0, 0.0),
            defocus_angle: 0.0,
            focus_dist: 1.0,
            pixel00_loc: DVec3::ZERO,
            pixel_delta_u: DVec3::ZERO,
            pixel_delta_v: DVec3::ZERO,
            u: DVec3::ZERO,
            v: DVec3::ZERO,
            w: DVec3::ZERO,
            defocus_disk_u: DVec3::ZERO,
            defocus_disk_v: DVec3::ZERO,
            initialized: false,
        }
    }

    /// Derive the viewport geometry from the current framing parameters.
    ///
    /// Always recomputes, so it can be called again after changing any
    /// public field.
    ///
    /// # Panics
    ///
    /// Panics if the image has a zero dimension, `lookfrom` coincides with
    /// `lookat`, or the focus distance is not positive. These are
    /// configuration bugs and failing here beats producing garbage pixels.
    pub fn initialize(&mut self) {
        assert!(
            self.image_width > 0 && self.image_height > 0,
            "image dimensions must be nonzero, got {}x{}",
            self.image_width,
            self.image_height
        );
        assert!(
            self.lookfrom != self.lookat,
            "lookfrom and lookat coincide, the view direction is undefined"
        );
        assert!(
            self.focus_dist > 0.0,
            "focus distance must be positive, got {}",
            self.focus_dist
        );

        // Viewport dimensions from the vertical field of view
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f64 / self.image_height as f64);

        // Orthonormal camera basis
        self.w = (self.lookfrom - self.lookat).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * self.u;
        let viewport_v = viewport_height * -self.v;

        self.pixel_delta_u = viewport_u / self.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        let viewport_upper_left =
            self.lookfrom - (self.focus_dist * self.w) - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        let defocus_radius = self.focus_dist * (self.defocus_angle.to_radians() / 2.0).tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        self.initialized = true;
    }

    /// Whether [`Camera::initialize`] has been called.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Generate a ray through pixel (i, j), jittered within the pixel for
    /// anti-aliasing. Column `i` runs left to right, row `j` top to bottom.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut impl Rng) -> Ray {
        debug_assert!(self.initialized, "camera used before initialize()");

        let offset = sample_square(rng);
        let pixel_sample = self.pixel00_loc
            + ((i as f64 + offset.x) * self.pixel_delta_u)
            + ((j as f64 + offset.y) * self.pixel_delta_v);

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.lookfrom
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Sample a ray origin on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut impl Rng) -> DVec3 {
        let p = random::random_in_unit_disk(rng);
        self.lookfrom + (p.x * self.defocus_disk_u) + (p.y * self.defocus_disk_v)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Random offset in the [-0.5, 0.5] unit square around a pixel center.
fn sample_square(rng: &mut impl Rng) -> DVec3 {
    DVec3::new(
        rng.random::<f64>() - 0.5,
        rng.random::<f64>() - 0.5,
        0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn default_camera() -> Camera {
        let mut camera = Camera::new();
        camera.initialize();
        camera
    }

    #[test]
    fn basis_is_orthonormal() {
        let mut camera = Camera::new();
        camera.lookfrom = DVec3::new(13.0, 2.0, 3.0);
        camera.lookat = DVec3::ZERO;
        camera.initialize();

        for vec in [camera.u, camera.v, camera.w] {
            assert!((vec.length() - 1.0).abs() < 1e-12);
        }
        assert!(camera.u.dot(camera.v).abs() < 1e-12);
        assert!(camera.u.dot(camera.w).abs() < 1e-12);
        assert!(camera.v.dot(camera.w).abs() < 1e-12);
    }

    #[test]
    fn default_framing_looks_down_negative_z() {
        let camera = default_camera();
        assert!((camera.w - DVec3::Z).length() < 1e-12);

        // 90 degree FOV at focus distance 1: viewport spans [-1, 1], and
        // the first sample center sits half a pixel in from the corner.
        let expected = DVec3::new(-1.0, 1.0, -1.0)
            + 0.5 * (camera.pixel_delta_u + camera.pixel_delta_v);
        assert!((camera.pixel00_loc - expected).length() < 1e-12);
    }

    #[test]
    fn rays_originate_at_lookfrom_without_defocus() {
        let camera = default_camera();
        let mut rng = ChaCha20Rng::seed_from_u64(11);

        for (i, j) in [(0, 0), (50, 50), (99, 99)] {
            let ray = camera.get_ray(i, j, &mut rng);
            assert_eq!(ray.origin, camera.lookfrom);
            // Every primary ray points into the scene (-z half space)
            assert!(ray.direction.z < 0.0);
        }
    }

    #[test]
    fn jitter_stays_within_one_pixel() {
        let camera = default_camera();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let center = camera.pixel00_loc + 50.0 * camera.pixel_delta_u + 50.0 * camera.pixel_delta_v;

        for _ in 0..100 {
            let ray = camera.get_ray(50, 50, &mut rng);
            let sample = ray.origin + ray.direction;
            let offset = sample - center;
            assert!(offset.x.abs() <= 0.5 * camera.pixel_delta_u.x + 1e-12);
            assert!(offset.y.abs() <= 0.5 * camera.pixel_delta_v.y.abs() + 1e-12);
        }
    }

    #[test]
    #[should_panic]
    fn zero_width_is_rejected() {
        let mut camera = Camera::new();
        camera.image_width = 0;
        camera.initialize();
    }

    #[test]
    #[should_panic]
    fn coincident_lookfrom_lookat_is_rejected() {
        let mut camera = Camera::new();
        camera.lookat = camera.lookfrom;
        camera.initialize();
    }
}
