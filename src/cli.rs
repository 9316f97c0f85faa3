use std::num::NonZeroUsize;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser)]
#[command(name = "emberpath")]
#[command(about = "A multithreaded CPU path tracer")]
pub struct Args {
    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, default_value = "800", help = "Image width in pixels")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "600", help = "Image height in pixels")]
    pub height: u32,

    /// Number of samples per pixel
    #[arg(long, short = 's', default_value = "100", help = "Number of samples per pixel")]
    pub samples_per_pixel: u32,

    /// Maximum number of ray bounces
    #[arg(long, default_value = "50", help = "Maximum number of ray bounces")]
    pub max_depth: u32,

    /// Base seed for the random sequence; a fixed seed reproduces the exact
    /// same image on every run
    #[arg(long, help = "Base seed for reproducible renders")]
    pub seed: Option<u64>,

    /// Number of worker threads (defaults to the detected CPU parallelism)
    #[arg(long, short = 't', help = "Number of worker threads")]
    pub threads: Option<NonZeroUsize>,

    /// Output file path
    #[arg(short, long, default_value = "output.png", help = "Output PNG file path")]
    pub output: String,
}
