//! The conversion itself: primary rasterization with a thumbnailer fallback.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, FallbackError};
use crate::fallback::Thumbnailer;
use crate::process::CommandRunner;
use crate::raster::{self, Rasterizer};
use crate::safalogo_log;
use crate::size::ConversionParams;

/// Input SVG, relative to the current directory.
pub const INPUT_PATH: &str = "public/safalogo.svg";

/// Output PNG, relative to the current directory.
pub const OUTPUT_PATH: &str = "public/safalogo.png";

/// What the primary path produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub bytes: u64,
}

impl Report {
    pub fn kilobytes(&self) -> f64 {
        self.bytes as f64 / 1024.0
    }
}

/// Which path ended the conversion.
#[derive(Debug)]
pub enum Outcome {
    PrimaryOk(Report),

    /// The primary path failed and the thumbnailer succeeded.
    FallbackOk { primary_error: ConvertError },

    Failed {
        primary_error: ConvertError,
        fallback_error: FallbackError,
    },
}

impl Outcome {
    pub fn tag(&self) -> &'static str {
        match self {
            Outcome::PrimaryOk(_) => "primary",
            Outcome::FallbackOk { .. } => "fallback",
            Outcome::Failed { .. } => "failed",
        }
    }
}

pub struct Converter<'a, Z: Rasterizer, R: CommandRunner> {
    pub input: PathBuf,
    pub output: PathBuf,
    pub params: ConversionParams,
    pub rasterizer: &'a Z,
    pub runner: &'a R,
    pub thumbnailer: Option<Thumbnailer>,
    pub fallback_enabled: bool,
}

impl<'a, Z: Rasterizer, R: CommandRunner> Converter<'a, Z, R> {
    /// A converter for the fixed input and output paths.
    pub fn new(rasterizer: &'a Z, runner: &'a R) -> Self {
        Self {
            input: PathBuf::from(INPUT_PATH),
            output: PathBuf::from(OUTPUT_PATH),
            params: ConversionParams::default(),
            rasterizer,
            runner,
            thumbnailer: Thumbnailer::native(),
            fallback_enabled: true,
        }
    }

    /// Replaces the thumbnailer; `None` means there is none on this host.
    pub fn with_thumbnailer(self, thumbnailer: Option<Thumbnailer>) -> Self {
        Self {
            thumbnailer,
            ..self
        }
    }

    /// A primary failure becomes final.
    pub fn without_fallback(self) -> Self {
        Self {
            fallback_enabled: false,
            ..self
        }
    }

    pub fn with_params(self, params: ConversionParams) -> Self {
        Self { params, ..self }
    }

    pub fn convert(&self) -> Outcome {
        let primary_error = match self.convert_primary() {
            Ok(report) => return Outcome::PrimaryOk(report),
            Err(e) => e,
        };

        safalogo_log!("primary conversion failed: {}", primary_error);

        match self.convert_fallback() {
            Ok(()) => Outcome::FallbackOk { primary_error },
            Err(fallback_error) => Outcome::Failed {
                primary_error,
                fallback_error,
            },
        }
    }

    pub fn convert_primary(&self) -> Result<Report, ConvertError> {
        let svg = fs::read(&self.input).map_err(|source| ConvertError::ReadInput {
            path: self.input.clone(),
            source,
        })?;

        let (width, height) = self.params.pixel_size()?;
        let resources_dir = self.input.parent().filter(|p| !p.as_os_str().is_empty());

        let rasterized = self
            .rasterizer
            .rasterize(&svg, resources_dir, width, height)?;

        let image = raster::decode(&rasterized)?;
        safalogo_log!(
            "rasterized {}x{} image, alpha: {}",
            image.width,
            image.height,
            image.has_alpha()
        );

        let flat = raster::flatten(image);
        self.write(&flat)?;

        let bytes = fs::metadata(&self.output)
            .map_err(|source| self.write_error(source))?
            .len();

        Ok(Report {
            path: self.output.clone(),
            width: flat.width,
            height: flat.height,
            bytes,
        })
    }

    pub fn convert_fallback(&self) -> Result<(), FallbackError> {
        if !self.fallback_enabled {
            return Err(FallbackError::Disabled);
        }

        match self.thumbnailer {
            Some(ref t) => t.run(self.runner, &self.input, &self.output),
            None => Err(FallbackError::Unsupported),
        }
    }

    fn write(&self, image: &raster::FlatImage) -> Result<(), ConvertError> {
        let file = File::create(&self.output).map_err(|source| self.write_error(source))?;
        let mut w = BufWriter::new(file);
        raster::encode(image, &mut w)?;
        w.flush().map_err(|source| self.write_error(source))
    }

    fn write_error(&self, source: std::io::Error) -> ConvertError {
        ConvertError::WriteOutput {
            path: self.output.clone(),
            source,
        }
    }
}

/// Directory the output will be written to.
pub fn output_dir(output: &Path) -> &Path {
    output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}
