//! Random sampling routines for path tracing.
//!
//! Every function takes the random source explicitly so that workers can
//! carry their own seeded generators and renders stay reproducible.
//! Includes specialized sampling for spheres, disks, and colors.

use glam::DVec3;
use rand::Rng;

/// Generate a random f64 in [min, max)
pub fn random_range(rng: &mut impl Rng, min: f64, max: f64) -> f64 {
    min + (max - min) * rng.random::<f64>()
}

/// Generate a random vector with components in [min, max)
pub fn random_vec_range(rng: &mut impl Rng, min: f64, max: f64) -> DVec3 {
    DVec3::new(
        random_range(rng, min, max),
        random_range(rng, min, max),
        random_range(rng, min, max),
    )
}

/// Generate a random unit vector uniformly distributed on the unit sphere.
pub fn random_unit_vector(rng: &mut impl Rng) -> DVec3 {
    // Uniform θ in [0, 2π), uniform cos(φ) in [-1, 1]
    let theta = 2.0 * std::f64::consts::PI * rng.random::<f64>();
    let cos_phi = 2.0 * rng.random::<f64>() - 1.0;
    let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();

    DVec3::new(sin_phi * theta.cos(), sin_phi * theta.sin(), cos_phi)
}

/// Generate a random point inside the unit sphere using rejection sampling.
pub fn random_in_unit_sphere(rng: &mut impl Rng) -> DVec3 {
    loop {
        let p = random_vec_range(rng, -1.0, 1.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Generate a random point inside the unit disk (z = 0) using rejection sampling.
pub fn random_in_unit_disk(rng: &mut impl Rng) -> DVec3 {
    loop {
        let p = DVec3::new(
            random_range(rng, -1.0, 1.0),
            random_range(rng, -1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Generate a random RGB color with components in [0.0, 1.0).
pub fn random_color(rng: &mut impl Rng) -> DVec3 {
    DVec3::new(rng.random(), rng.random(), rng.random())
}

/// Generate a random RGB color with components in [min, max).
pub fn random_color_range(rng: &mut impl Rng, min: f64, max: f64) -> DVec3 {
    random_vec_range(rng, min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn unit_vectors_have_unit_length() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..100 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn sphere_and_disk_samples_stay_inside() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(random_in_unit_sphere(&mut rng).length_squared() < 1.0);
            let d = random_in_unit_disk(&mut rng);
            assert!(d.length_squared() < 1.0);
            assert_eq!(d.z, 0.0);
        }
    }
}
