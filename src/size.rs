//! Conversion parameters and pixel-size computations.

use crate::error::ConvertError;

#[derive(Clone, Copy, Debug)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub fn uniform(s: f64) -> Self {
        Self { x: s, y: s }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

/// Fixed parameters for a conversion.
///
/// The zoom multiplies the requested width and height, so the default
/// parameters produce a 5400 x 1800 raster.
#[derive(Clone, Copy, Debug)]
pub struct ConversionParams {
    pub width: u32,
    pub height: u32,
    pub zoom: Scale,
}

impl ConversionParams {
    pub const WIDTH: u32 = 1800;
    pub const HEIGHT: u32 = 600;
    pub const ZOOM: f64 = 3.0;

    /// Size of the final raster in pixels.
    pub fn target_size(&self) -> Size {
        Size::new(
            f64::from(self.width) * self.zoom.x,
            f64::from(self.height) * self.zoom.y,
        )
    }

    /// Integer pixel dimensions of the final raster.
    pub fn pixel_size(&self) -> Result<(u32, u32), ConvertError> {
        let size = self.target_size();
        // We use ceil() to avoid chopping off the last pixel if it is partially covered.
        match (checked_u32(size.w.ceil()), checked_u32(size.h.ceil())) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Ok((w, h)),
            _ => Err(ConvertError::InvalidSize {
                w: size.w,
                h: size.h,
            }),
        }
    }
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self {
            width: Self::WIDTH,
            height: Self::HEIGHT,
            zoom: Scale::uniform(Self::ZOOM),
        }
    }
}

fn checked_u32(x: f64) -> Option<u32> {
    cast::u32(x).ok()
}

/// Placement of the document inside the raster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub scale: f64,
    pub tx: f64,
    pub ty: f64,
}

/// Fits `natural` inside `target` preserving the aspect ratio, centered.
///
/// This is what `preserveAspectRatio="xMidYMid meet"` does.  Returns `None`
/// for a document with an empty dimension.
pub fn fit_centered(natural: Size, target: Size) -> Option<Placement> {
    if natural.w <= 0.0 || natural.h <= 0.0 {
        return None;
    }

    let scale = f64::min(target.w / natural.w, target.h / natural.h);

    Some(Placement {
        scale,
        tx: (target.w - natural.w * scale) / 2.0,
        ty: (target.h - natural.h * scale) / 2.0,
    })
}
