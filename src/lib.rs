//! Rasterize the Safa logo.
//!
//! This crate turns `public/safalogo.svg` into a 5400 x 1800 opaque PNG at
//! `public/safalogo.png`.  The work happens in two phases:
//!
//! * [`preflight::ensure`] checks that the rasterizer can be used, optionally
//!   running a package manager once if it cannot.
//!
//! * [`convert::Converter`] rasterizes the SVG with [`raster::ResvgRasterizer`],
//!   composites transparent areas over white, and writes the PNG.  If anything
//!   in that path fails it runs the operating system's thumbnailer once
//!   instead.
//!
//! The result of a run is a [`Run`], which says which of those paths ended it.
//!
//! # Example
//!
//! ```no_run
//! use safalogo::convert::Converter;
//! use safalogo::preflight::NoInstaller;
//! use safalogo::process::SystemRunner;
//! use safalogo::raster::ResvgRasterizer;
//!
//! let rasterizer = ResvgRasterizer::new();
//! let converter = Converter::new(&rasterizer, &SystemRunner);
//!
//! let run = safalogo::run(&rasterizer, &NoInstaller, &[], &converter);
//! println!("{}", run.tag());
//! ```

#![warn(nonstandard_style, rust_2018_idioms, unused)]
#![deny(unsafe_code)]

pub mod convert;
pub mod error;
pub mod fallback;
pub mod log;
pub mod preflight;
pub mod process;
pub mod raster;
pub mod size;

use crate::convert::{Converter, Outcome};
use crate::error::PreflightError;
use crate::preflight::{Capability, Installer, Preflight};
use crate::process::CommandRunner;
use crate::raster::Rasterizer;

/// How a whole invocation ended.
#[derive(Debug)]
pub enum Run {
    /// Preflight could not provide the rasterizer; no file was touched.
    Aborted {
        reason: PreflightError,
        install_attempted: bool,
    },

    Converted {
        preflight: Preflight,
        outcome: Outcome,
    },
}

impl Run {
    pub fn tag(&self) -> &'static str {
        match self {
            Run::Aborted { .. } => "aborted",
            Run::Converted { outcome, .. } => outcome.tag(),
        }
    }
}

/// Runs preflight and, if it succeeds, the conversion.
pub fn run<C, I, Z, R>(
    capability: &C,
    installer: &I,
    packages: &[String],
    converter: &Converter<'_, Z, R>,
) -> Run
where
    C: Capability + ?Sized,
    I: Installer + ?Sized,
    Z: Rasterizer,
    R: CommandRunner,
{
    match preflight::ensure(capability, installer, packages) {
        Preflight::Unavailable {
            reason,
            install_attempted,
        } => Run::Aborted {
            reason,
            install_attempted,
        },
        preflight => Run::Converted {
            preflight,
            outcome: converter.convert(),
        },
    }
}
