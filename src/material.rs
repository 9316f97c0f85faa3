//! Material system for ray tracing.
//!
//! Implements three material types: Lambertian (diffuse), Metal (specular),
//! and Dielectric (transparent). Materials are immutable values stored in
//! the scene's palette and shared by any number of spheres.

use glam::DVec3;
use rand::Rng;

use crate::hittable::HitRecord;
use crate::random;
use crate::ray::Ray;

/// RGB color with linear f64 components.
pub type Color = DVec3;

/// Result of a successful scatter event.
#[derive(Debug, Clone, Copy)]
pub struct Scatter {
    /// Color filter applied to whatever the scattered ray gathers.
    pub attenuation: Color,
    /// The redirected ray, originating at the hit point.
    pub ray: Ray,
}

/// Material variants for ray tracing.
///
/// A closed set dispatched by pattern matching; the renderer never needs
/// dynamic dispatch to shade a hit.
#[derive(Debug, Clone, Copy)]
pub enum Material {
    /// Lambertian diffuse material for matte surfaces.
    Lambertian {
        /// Surface color/reflectance.
        albedo: Color,
    },

    /// Metallic material with specular reflection.
    Metal {
        /// Metal color.
        albedo: Color,
        /// Surface roughness (0.0 = mirror, 1.0 = rough).
        fuzz: f64,
    },

    /// Dielectric (transparent) material with refraction.
    Dielectric {
        /// Index of refraction (1.0 = air, 1.5 = glass, etc.).
        refraction_index: f64,
    },
}

impl Material {
    /// Compute ray scattering for this material.
    ///
    /// Returns the attenuated outgoing ray, or `None` if the incoming ray
    /// is absorbed.
    pub fn scatter(&self, ray_in: &Ray, hit: &HitRecord, rng: &mut impl Rng) -> Option<Scatter> {
        match *self {
            Material::Lambertian { albedo } => scatter_lambertian(albedo, hit, rng),
            Material::Metal { albedo, fuzz } => scatter_metal(albedo, fuzz, ray_in, hit, rng),
            Material::Dielectric { refraction_index } => {
                scatter_dielectric(refraction_index, ray_in, hit, rng)
            }
        }
    }
}

/// Lambertian diffuse scattering with cosine-weighted distribution.
fn scatter_lambertian(albedo: Color, hit: &HitRecord, rng: &mut impl Rng) -> Option<Scatter> {
    let mut direction = hit.normal + random::random_unit_vector(rng);

    // Catch degenerate scatter direction (very close to zero)
    if direction.length_squared() < 1e-16 {
        direction = hit.normal;
    }

    Some(Scatter {
        attenuation: albedo,
        ray: Ray::new(hit.point, direction),
    })
}

/// Metallic reflection with optional fuzzy perturbation.
fn scatter_metal(
    albedo: Color,
    fuzz: f64,
    ray_in: &Ray,
    hit: &HitRecord,
    rng: &mut impl Rng,
) -> Option<Scatter> {
    let reflected = reflect(ray_in.direction.normalize(), hit.normal)
        + fuzz.min(1.0) * random::random_in_unit_sphere(rng);

    // A perturbation below the surface means the ray is absorbed
    if reflected.dot(hit.normal) <= 0.0 {
        return None;
    }

    Some(Scatter {
        attenuation: albedo,
        ray: Ray::new(hit.point, reflected),
    })
}

/// Dielectric scattering, choosing between reflection and refraction.
fn scatter_dielectric(
    refraction_index: f64,
    ray_in: &Ray,
    hit: &HitRecord,
    rng: &mut impl Rng,
) -> Option<Scatter> {
    let ri = if hit.front_face {
        1.0 / refraction_index
    } else {
        refraction_index
    };

    let unit_direction = ray_in.direction.normalize();
    let cos_theta = (-unit_direction).dot(hit.normal).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

    let cannot_refract = ri * sin_theta > 1.0;

    let direction = if cannot_refract || reflectance(cos_theta, ri) > rng.random::<f64>() {
        reflect(unit_direction, hit.normal)
    } else {
        refract(unit_direction, hit.normal, ri)
    };

    Some(Scatter {
        // Glass doesn't attenuate light
        attenuation: Color::ONE,
        ray: Ray::new(hit.point, direction),
    })
}

/// Reflect a vector off a surface using the law of reflection.
fn reflect(v: DVec3, n: DVec3) -> DVec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through an interface using Snell's law.
fn refract(uv: DVec3, n: DVec3, etai_over_etat: f64) -> DVec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Compute Fresnel reflectance using Schlick's approximation.
fn reflectance(cosine: f64, refraction_index: f64) -> f64 {
    let r0 = (1.0 - refraction_index) / (1.0 + refraction_index);
    let r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::MaterialId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn front_hit() -> HitRecord {
        HitRecord {
            point: DVec3::new(0.0, 0.0, -1.0),
            normal: DVec3::new(0.0, 0.0, 1.0),
            t: 1.0,
            front_face: true,
            material: MaterialId(0),
        }
    }

    #[test]
    fn lambertian_always_scatters_with_bounded_attenuation() {
        let mat = Material::Lambertian {
            albedo: Color::new(0.1, 0.2, 0.5),
        };
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        for _ in 0..50 {
            let scatter = mat.scatter(&ray, &front_hit(), &mut rng).unwrap();
            for c in scatter.attenuation.to_array() {
                assert!((0.0..=1.0).contains(&c));
            }
            // Scattered ray leaves from the hit point
            assert_eq!(scatter.ray.origin, DVec3::new(0.0, 0.0, -1.0));
        }
    }

    /// Rng stub that yields only zeros, forcing `random_unit_vector` to
    /// return exactly -Z.
    struct ZeroRng;

    impl rand::RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
    }

    #[test]
    fn lambertian_degenerate_direction_falls_back_to_normal() {
        let mat = Material::Lambertian { albedo: Color::ONE };
        // Surface normal +Z plus the forced -Z sample sums to zero; the
        // scatter direction must substitute the normal instead.
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -1.0));
        let scatter = mat.scatter(&ray, &front_hit(), &mut ZeroRng).unwrap();
        assert_eq!(scatter.ray.direction, front_hit().normal);
    }

    #[test]
    fn mirror_metal_reflects_exactly() {
        let mat = Material::Metal {
            albedo: Color::new(0.8, 0.8, 0.8),
            fuzz: 0.0,
        };
        // 45 degree incidence in the x/z plane
        let ray = Ray::new(DVec3::new(-1.0, 0.0, 1.0), DVec3::new(1.0, 0.0, -1.0));
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let scatter = mat.scatter(&ray, &front_hit(), &mut rng).unwrap();
        let dir = scatter.ray.direction.normalize();
        let expected = DVec3::new(1.0, 0.0, 1.0).normalize();
        assert!((dir - expected).length() < 1e-12);
        assert_eq!(scatter.attenuation, Color::new(0.8, 0.8, 0.8));
    }

    #[test]
    fn fully_fuzzy_metal_can_absorb_grazing_rays() {
        let mat = Material::Metal {
            albedo: Color::ONE,
            fuzz: 1.0,
        };
        // Grazing incidence keeps the mirror direction nearly tangent, so a
        // unit-sphere perturbation frequently pushes it below the surface.
        let ray = Ray::new(
            DVec3::new(-1.0, 0.0, 1e-4),
            DVec3::new(1.0, 0.0, -1e-4),
        );
        let mut rng = ChaCha20Rng::seed_from_u64(2);

        let absorbed = (0..200)
            .filter(|_| mat.scatter(&ray, &front_hit(), &mut rng).is_none())
            .count();
        assert!(absorbed > 0);

        // Whenever the ray does scatter it must leave the surface
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        for _ in 0..200 {
            if let Some(scatter) = mat.scatter(&ray, &front_hit(), &mut rng) {
                assert!(scatter.ray.direction.dot(front_hit().normal) > 0.0);
            }
        }
    }

    #[test]
    fn dielectric_never_attenuates() {
        let mat = Material::Dielectric {
            refraction_index: 1.5,
        };
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.3, -0.2, -1.0));
        let mut rng = ChaCha20Rng::seed_from_u64(4);

        for _ in 0..50 {
            let scatter = mat.scatter(&ray, &front_hit(), &mut rng).unwrap();
            assert_eq!(scatter.attenuation, Color::ONE);
        }
    }

    #[test]
    fn dielectric_total_internal_reflection() {
        let mat = Material::Dielectric {
            refraction_index: 1.5,
        };
        // Inside the glass (back face), hitting the surface at a shallow
        // angle well past the critical angle: must reflect, never refract.
        let hit = HitRecord {
            front_face: false,
            ..front_hit()
        };
        let ray = Ray::new(DVec3::ZERO, DVec3::new(1.0, 0.0, -0.1).normalize());
        let mut rng = ChaCha20Rng::seed_from_u64(5);

        for _ in 0..50 {
            let scatter = mat.scatter(&ray, &hit, &mut rng).unwrap();
            // Reflection keeps the ray on the incoming side of the surface
            assert!(scatter.ray.direction.z > 0.0);
        }
    }
}
