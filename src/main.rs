use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use glam::DVec3;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

mod cli;
mod logger;
mod output;
mod scenes;

use cli::Args;
use emberpath::camera::Camera;
use emberpath::framebuffer::Framebuffer;
use emberpath::renderer::{self, RenderConfig};
use logger::init_logger;
use output::save_framebuffer_as_png;

/// Create the camera for the book cover shot
fn create_camera(width: u32, height: u32) -> Camera {
    let mut camera = Camera::new();
    camera.image_width = width;
    camera.image_height = height;
    camera.vfov = 20.0;
    camera.lookfrom = DVec3::new(13.0, 2.0, 3.0);
    camera.lookat = DVec3::new(0.0, 0.0, 0.0);
    camera.vup = DVec3::new(0.0, 1.0, 0.0);
    camera.defocus_angle = 0.6;
    camera.focus_dist = 10.0;
    camera.initialize();
    camera
}

fn main() {
    let args = Args::parse();

    init_logger(args.debug_level.into());

    // Log application startup with version information
    info!("Emberpath - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));
    info!(
        "Image resolution: {}x{}, samples per pixel: {}",
        args.width, args.height, args.samples_per_pixel
    );

    // One base seed drives both scene generation and sampling, so a fixed
    // --seed reproduces the full image
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let mut scene_rng = ChaCha20Rng::seed_from_u64(seed);
    let scene = Arc::new(scenes::cover_scene(&mut scene_rng));
    info!("Scene contains {} spheres", scene.len());

    let camera = create_camera(args.width, args.height);
    let config = RenderConfig {
        samples_per_pixel: args.samples_per_pixel,
        max_depth: args.max_depth,
        seed: Some(seed),
        threads: args.threads,
    };

    let frame = Arc::new(Framebuffer::new(args.width, args.height));
    let progress = Arc::new(AtomicU32::new(0));

    // Render detached and feed the row counter into a progress bar
    let handle = renderer::spawn_render(
        Arc::clone(&scene),
        camera,
        config,
        Arc::clone(&frame),
        Arc::clone(&progress),
    );

    let pb = ProgressBar::new(args.height as u64);
    pb.set_style(ProgressStyle::default_bar().template("{bar:40} {pos}/{len} ETA: {eta}").unwrap());
    while !handle.is_finished() {
        pb.set_position(progress.load(Ordering::Relaxed) as u64);
        std::thread::sleep(Duration::from_millis(100));
    }
    handle.join();
    pb.set_position(progress.load(Ordering::Relaxed) as u64);
    pb.finish();

    if !save_framebuffer_as_png(&frame, &args.output) {
        std::process::exit(1);
    }
}
