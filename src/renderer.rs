//! Path-tracing renderer and parallel row scheduler.
//!
//! `ray_color` is the Monte Carlo light-transport estimator; around it the
//! scheduler partitions the image into row bands, runs one OS thread per
//! band, and fills the shared framebuffer while bumping a row-progress
//! counter the caller may poll.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::camera::Camera;
use crate::framebuffer::Framebuffer;
use crate::hittable::{Hittable, Scene};
use crate::interval::Interval;
use crate::material::Color;
use crate::ray::Ray;
use crate::tiling::{partition_rows, worker_count, RowBand};

/// Channel range kept after tone mapping, just below 1.0 so that the
/// scale-by-256 quantization never overflows a byte.
const INTENSITY: Interval = Interval {
    min: 0.0,
    max: 0.999,
};

/// Minimum ray parameter for secondary rays, suppressing self-intersection
/// ("shadow acne") at the origin of a scattered ray.
const T_MIN: f64 = 0.001;

/// Sampling and scheduling parameters for one render.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    /// Number of jittered samples averaged per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,
    /// Fixed base seed for reproducible output; `None` draws one from OS
    /// entropy per render
    pub seed: Option<u64>,
    /// Worker thread override; `None` uses detected hardware parallelism
    pub threads: Option<NonZeroUsize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            seed: None,
            threads: None,
        }
    }
}

/// Compute the color seen along a ray.
///
/// Recursion is the natural shape here: attenuation compounds
/// multiplicatively along the path, and the depth budget caps the stack.
/// A ray that exhausts its budget contributes black.
pub fn ray_color(ray: &Ray, scene: &Scene, depth: u32, rng: &mut impl Rng) -> Color {
    if depth == 0 {
        return Color::ZERO;
    }

    if let Some(hit) = scene.hit(ray, Interval::new(T_MIN, f64::INFINITY)) {
        return match scene.material(hit.material).scatter(ray, &hit, rng) {
            Some(scatter) => {
                scatter.attenuation * ray_color(&scatter.ray, scene, depth - 1, rng)
            }
            None => Color::ZERO,
        };
    }

    background(ray)
}

/// Sky background: vertical white-to-blue gradient, independent of the
/// horizontal ray direction.
pub fn background(ray: &Ray) -> Color {
    let unit_direction = ray.direction.normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    (1.0 - a) * Color::new(1.0, 1.0, 1.0) + a * Color::new(0.5, 0.7, 1.0)
}

/// Gamma-2 transfer function applied per channel before quantization.
fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Average a sample sum, gamma-correct, clamp, and quantize to RGBA8.
fn to_rgba8(pixel_sum: Color, samples_per_pixel: u32) -> [u8; 4] {
    let scale = 1.0 / samples_per_pixel as f64;
    let r = 256.0 * INTENSITY.clamp(linear_to_gamma(pixel_sum.x * scale));
    let g = 256.0 * INTENSITY.clamp(linear_to_gamma(pixel_sum.y * scale));
    let b = 256.0 * INTENSITY.clamp(linear_to_gamma(pixel_sum.z * scale));
    [r as u8, g as u8, b as u8, 255]
}

/// Derive a per-row RNG seed from the render's base seed.
///
/// Splitmix finalizer, so every row gets a decorrelated stream no matter
/// how rows are grouped into bands. This is what makes output independent
/// of the worker count.
fn row_seed(base: u64, row: u32) -> u64 {
    let mut z = base ^ (u64::from(row)).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Render every row of one band into the shared framebuffer.
fn render_band(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    frame: &Framebuffer,
    band: RowBand,
    progress: &AtomicU32,
    base_seed: u64,
) {
    debug!("worker rendering rows {}..{}", band.start, band.end);

    for j in band.rows() {
        let mut rng = ChaCha20Rng::seed_from_u64(row_seed(base_seed, j));

        for i in 0..frame.width() {
            let mut pixel_sum = Color::ZERO;
            for _ in 0..config.samples_per_pixel {
                let ray = camera.get_ray(i, j, &mut rng);
                pixel_sum += ray_color(&ray, scene, config.max_depth, &mut rng);
            }
            frame.store(i, j, to_rgba8(pixel_sum, config.samples_per_pixel));
        }

        progress.fetch_add(1, Ordering::Relaxed);
    }
}

/// Reject caller bugs before any worker starts.
fn validate(camera: &Camera, config: &RenderConfig, frame: &Framebuffer) {
    assert!(
        config.samples_per_pixel > 0,
        "samples_per_pixel must be nonzero"
    );
    assert!(config.max_depth > 0, "max_depth must be nonzero");
    assert!(
        camera.is_initialized(),
        "camera must be initialized before rendering"
    );
    assert!(
        camera.image_width == frame.width() && camera.image_height == frame.height(),
        "framebuffer is {}x{} but the camera renders {}x{}",
        frame.width(),
        frame.height(),
        camera.image_width,
        camera.image_height
    );
}

/// Pick the base seed and log the render parameters.
fn start_render(config: &RenderConfig, frame: &Framebuffer, workers: NonZeroUsize) -> u64 {
    info!(
        "rendering {}x{} at {} spp, depth {}, {} workers",
        frame.width(),
        frame.height(),
        config.samples_per_pixel,
        config.max_depth,
        workers
    );
    config.seed.unwrap_or_else(|| rand::rng().random())
}

/// Render the scene, blocking until every worker has finished.
///
/// The framebuffer and progress counter are written in place; the progress
/// counter is reset to zero first and equals the image height on return.
///
/// # Panics
///
/// Panics on precondition violations: zero samples or depth, an
/// uninitialized camera, or a framebuffer whose size differs from the
/// camera's image size.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    frame: &Framebuffer,
    progress: &AtomicU32,
) {
    validate(camera, config, frame);
    progress.store(0, Ordering::Relaxed);

    let workers = worker_count(config.threads);
    let bands = partition_rows(frame.height(), workers);
    let base_seed = start_render(config, frame, workers);
    let started = Instant::now();

    thread::scope(|scope| {
        for band in bands {
            scope.spawn(move || render_band(scene, camera, config, frame, band, progress, base_seed));
        }
    });

    info!("render finished in {:.2?}", started.elapsed());
}

/// A detached render in flight. Dropping the handle abandons the workers;
/// they keep filling the framebuffer until done.
pub struct RenderHandle {
    workers: Vec<thread::JoinHandle<()>>,
    progress: Arc<AtomicU32>,
    total_rows: u32,
    started: Instant,
}

impl RenderHandle {
    /// Rows completed so far.
    pub fn rows_completed(&self) -> u32 {
        self.progress.load(Ordering::Relaxed)
    }

    /// Height of the image being rendered.
    pub fn total_rows(&self) -> u32 {
        self.total_rows
    }

    /// True once every worker has terminated.
    pub fn is_finished(&self) -> bool {
        self.workers.iter().all(|worker| worker.is_finished())
    }

    /// Wait for all workers to terminate.
    pub fn join(self) {
        for worker in self.workers {
            if let Err(panic) = worker.join() {
                std::panic::resume_unwind(panic);
            }
        }
        info!("render finished in {:.2?}", self.started.elapsed());
    }
}

/// Start a render and return immediately.
///
/// The caller keeps its clones of `frame` and `progress` and may poll or
/// display them while the workers run; call [`RenderHandle::join`] to wait
/// for completion.
///
/// # Panics
///
/// Same preconditions as [`render`].
pub fn spawn_render(
    scene: Arc<Scene>,
    camera: Camera,
    config: RenderConfig,
    frame: Arc<Framebuffer>,
    progress: Arc<AtomicU32>,
) -> RenderHandle {
    validate(&camera, &config, &frame);
    progress.store(0, Ordering::Relaxed);

    let workers = worker_count(config.threads);
    let bands = partition_rows(frame.height(), workers);
    let base_seed = start_render(&config, &frame, workers);
    let started = Instant::now();
    let total_rows = frame.height();

    let workers = bands
        .into_iter()
        .map(|band| {
            let scene = Arc::clone(&scene);
            let camera = camera.clone();
            let frame = Arc::clone(&frame);
            let progress = Arc::clone(&progress);
            thread::spawn(move || {
                render_band(&scene, &camera, &config, &frame, band, &progress, base_seed)
            })
        })
        .collect();

    RenderHandle {
        workers,
        progress,
        total_rows,
        started,
    }
}
