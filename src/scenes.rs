//! Demo scene construction.

use emberpath::hittable::Scene;
use emberpath::material::Material;
use emberpath::random;
use glam::DVec3;
use rand::Rng;

/// Build the classic book-cover scene: a gray ground sphere, a 22x22 grid
/// of small randomized spheres, and three large feature spheres.
///
/// All glass spheres share one palette slot; every other material gets its
/// own.
pub fn cover_scene(rng: &mut impl Rng) -> Scene {
    let mut scene = Scene::new();

    let ground = scene.add_material(Material::Lambertian {
        albedo: DVec3::new(0.5, 0.5, 0.5),
    });
    scene.add_sphere(DVec3::new(0.0, -1000.0, 0.0), 1000.0, ground);

    let glass = scene.add_material(Material::Dielectric {
        refraction_index: 1.5,
    });

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = rng.random::<f64>();
            let center = DVec3::new(
                a as f64 + 0.9 * rng.random::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.random::<f64>(),
            );

            // Keep the grid clear of the large feature spheres
            if (center - DVec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let material = if choose_mat < 0.8 {
                let albedo = random::random_color(rng) * random::random_color(rng);
                scene.add_material(Material::Lambertian { albedo })
            } else if choose_mat < 0.95 {
                let albedo = random::random_color_range(rng, 0.5, 1.0);
                let fuzz = random::random_range(rng, 0.0, 0.5);
                scene.add_material(Material::Metal { albedo, fuzz })
            } else {
                glass
            };

            scene.add_sphere(center, 0.2, material);
        }
    }

    scene.add_sphere(DVec3::new(0.0, 1.0, 0.0), 1.0, glass);

    let brown = scene.add_material(Material::Lambertian {
        albedo: DVec3::new(0.4, 0.2, 0.1),
    });
    scene.add_sphere(DVec3::new(-4.0, 1.0, 0.0), 1.0, brown);

    let steel = scene.add_material(Material::Metal {
        albedo: DVec3::new(0.7, 0.6, 0.5),
        fuzz: 0.0,
    });
    scene.add_sphere(DVec3::new(4.0, 1.0, 0.0), 1.0, steel);

    scene
}
