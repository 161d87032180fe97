//! Rasterization backends and the pixel pipeline after them.
//!
//! A [`Rasterizer`] turns SVG data into encoded PNG bytes.  Those bytes are
//! decoded again with [`decode`], flattened onto white with [`flatten`], and
//! written out with [`encode`].

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use resvg::{tiny_skia, usvg};
use rgb::{ComponentBytes, FromSlice, RGB8, RGBA8};

use crate::error::{ConvertError, PreflightError};
use crate::preflight::Capability;
use crate::safalogo_log;
use crate::size::{fit_centered, Size};

/// Something that can rasterize an SVG document to PNG bytes.
pub trait Rasterizer {
    /// Renders `svg` into a `width` x `height` raster and returns it encoded as PNG.
    ///
    /// Relative references in the document are resolved against `resources_dir`.
    fn rasterize(
        &self,
        svg: &[u8],
        resources_dir: Option<&Path>,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ConvertError>;
}

/// The resvg backend.
#[derive(Debug, Clone, Copy)]
pub struct ResvgRasterizer {
    system_fonts: bool,
}

impl ResvgRasterizer {
    pub fn new() -> Self {
        Self { system_fonts: true }
    }

    /// Don't load the system font database; text will not render.
    pub fn without_system_fonts(self) -> Self {
        Self {
            system_fonts: false,
        }
    }
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for ResvgRasterizer {
    fn rasterize(
        &self,
        svg: &[u8],
        resources_dir: Option<&Path>,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ConvertError> {
        let mut opt = usvg::Options::default();
        opt.resources_dir = resources_dir.map(Path::to_path_buf);
        if self.system_fonts {
            Arc::make_mut(&mut opt.fontdb).load_system_fonts();
        }

        let tree =
            usvg::Tree::from_data(svg, &opt).map_err(|e| ConvertError::Parse(format!("{e}")))?;

        let natural = Size::new(
            f64::from(tree.size().width()),
            f64::from(tree.size().height()),
        );
        let target = Size::new(f64::from(width), f64::from(height));

        let placement = fit_centered(natural, target)
            .ok_or_else(|| ConvertError::Render(String::from("the SVG has no dimensions")))?;

        safalogo_log!(
            "rendering {}x{} document into {}x{} (scale {}, offset {},{})",
            natural.w,
            natural.h,
            width,
            height,
            placement.scale,
            placement.tx,
            placement.ty
        );

        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or(ConvertError::InvalidSize {
            w: target.w,
            h: target.h,
        })?;

        let transform = tiny_skia::Transform::from_row(
            placement.scale as f32,
            0.0,
            0.0,
            placement.scale as f32,
            placement.tx as f32,
            placement.ty as f32,
        );

        resvg::render(&tree, transform, &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| ConvertError::Encode(format!("{e}")))
    }
}

const PROBE_SVG: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4">
  <rect x="0" y="0" width="2" height="4" fill="#000000"/>
</svg>"##;

impl Capability for ResvgRasterizer {
    fn name(&self) -> &'static str {
        "resvg rasterizer"
    }

    fn probe(&self) -> Result<(), PreflightError> {
        let probe_error = |reason: String| PreflightError::Probe {
            capability: self.name(),
            reason,
        };

        let bytes = self
            .without_system_fonts()
            .rasterize(PROBE_SVG, None, 4, 4)
            .map_err(|e| probe_error(format!("{e}")))?;

        let image = decode(&bytes).map_err(|e| probe_error(format!("{e}")))?;

        match image.pixels {
            Pixels::Rgba(ref p) if p.len() == 16 && p[0].a == 255 && p[3].a == 0 => Ok(()),
            _ => Err(probe_error(String::from(
                "rendered probe image does not match",
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pixels {
    Rgba(Vec<RGBA8>),
    Rgb(Vec<RGB8>),
}

/// A decoded 8-bit image.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Pixels,
}

impl Image {
    pub fn has_alpha(&self) -> bool {
        matches!(self.pixels, Pixels::Rgba(_))
    }
}

/// An opaque RGB image, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<RGB8>,
}

#[cfg(test)]
impl FlatImage {
    pub fn pixel(&self, x: u32, y: u32) -> Option<RGB8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }
}

/// Decodes PNG bytes into 8-bit RGB or RGBA pixels.
///
/// Palette, grayscale and 16-bit images are normalized; a `tRNS` chunk
/// becomes an alpha channel.
pub fn decode(bytes: &[u8]) -> Result<Image, ConvertError> {
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let pixels = match info.color_type {
        png::ColorType::Rgba => Pixels::Rgba(buf.as_rgba().to_vec()),
        png::ColorType::Rgb => Pixels::Rgb(buf.as_rgb().to_vec()),
        png::ColorType::GrayscaleAlpha => Pixels::Rgba(
            buf.chunks_exact(2)
                .map(|c| RGBA8::new(c[0], c[0], c[0], c[1]))
                .collect(),
        ),
        png::ColorType::Grayscale => {
            Pixels::Rgb(buf.iter().map(|&g| RGB8::new(g, g, g)).collect())
        }
        png::ColorType::Indexed => {
            return Err(ConvertError::Decode(String::from(
                "palette image was not expanded",
            )))
        }
    };

    Ok(Image {
        width: info.width,
        height: info.height,
        pixels,
    })
}

/// Composites a straight-alpha pixel over opaque white.
#[inline]
pub fn over_white(p: RGBA8) -> RGB8 {
    let a = u32::from(p.a);
    let blend = |c: u8| ((u32::from(c) * a + 255 * (255 - a) + 127) / 255) as u8;
    RGB8::new(blend(p.r), blend(p.g), blend(p.b))
}

/// Removes the alpha channel by compositing the image over white.
///
/// Images without alpha are passed through.
pub fn flatten(image: Image) -> FlatImage {
    let pixels = match image.pixels {
        Pixels::Rgba(p) => p.into_iter().map(over_white).collect(),
        Pixels::Rgb(p) => p,
    };

    FlatImage {
        width: image.width,
        height: image.height,
        pixels,
    }
}

/// Writes an 8-bit RGB PNG with the best deflate compression.
pub fn encode<W: Write>(image: &FlatImage, w: W) -> Result<(), ConvertError> {
    let mut encoder = png::Encoder::new(w, image.width, image.height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Best);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.pixels.as_bytes())?;
    writer.finish()?;

    Ok(())
}
