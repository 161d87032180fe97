use predicates::prelude::*;
use predicates::reflection::{Case, Child, PredicateReflection, Product};
use std::fmt;

/// Checks that the variable of type [u8] can be parsed as a PNG file.
#[derive(Debug)]
pub struct PngPredicate {}

impl PngPredicate {
    pub fn with_size(self, w: u32, h: u32) -> DetailPredicate<Self> {
        DetailPredicate::<Self> {
            p: self,
            d: Detail::Size(w, h),
        }
    }

    pub fn without_alpha(self) -> DetailPredicate<Self> {
        DetailPredicate::<Self> {
            p: self,
            d: Detail::Opaque,
        }
    }
}

impl Predicate<[u8]> for PngPredicate {
    fn eval(&self, data: &[u8]) -> bool {
        let decoder = png::Decoder::new(data);
        decoder.read_info().is_ok()
    }

    fn find_case<'a>(&'a self, _expected: bool, data: &[u8]) -> Option<Case<'a>> {
        let decoder = png::Decoder::new(data);
        match decoder.read_info() {
            Ok(_) => None,
            Err(e) => Some(Case::new(Some(self), false).add_product(Product::new("Error", e))),
        }
    }
}

impl PredicateReflection for PngPredicate {}

impl fmt::Display for PngPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "is a PNG")
    }
}

/// Extends a PngPredicate by a check for a given detail of the PNG file.
#[derive(Debug)]
pub struct DetailPredicate<PngPredicate> {
    p: PngPredicate,
    d: Detail,
}

#[derive(Debug)]
enum Detail {
    Size(u32, u32),

    /// No alpha channel and no tRNS chunk.
    Opaque,
}

impl DetailPredicate<PngPredicate> {
    fn eval_info(&self, info: &png::Info<'_>) -> bool {
        match self.d {
            Detail::Size(w, h) => info.width == w && info.height == h,
            Detail::Opaque => {
                matches!(
                    info.color_type,
                    png::ColorType::Rgb | png::ColorType::Grayscale | png::ColorType::Indexed
                ) && info.trns.is_none()
            }
        }
    }

    fn product_for_info(&self, info: &png::Info<'_>) -> Product {
        match self.d {
            Detail::Size(_, _) => {
                Product::new("actual size", format!("{} x {}", info.width, info.height))
            }
            Detail::Opaque => Product::new(
                "actual color type",
                format!("{:?} (tRNS: {})", info.color_type, info.trns.is_some()),
            ),
        }
    }

    fn find_case_for_info<'a>(&'a self, expected: bool, info: &png::Info<'_>) -> Option<Case<'a>> {
        if self.eval_info(info) == expected {
            let product = self.product_for_info(info);
            Some(Case::new(Some(self), false).add_product(product))
        } else {
            None
        }
    }
}

impl Predicate<[u8]> for DetailPredicate<PngPredicate> {
    fn eval(&self, data: &[u8]) -> bool {
        let decoder = png::Decoder::new(data);
        match decoder.read_info() {
            Ok(reader) => self.eval_info(reader.info()),
            _ => false,
        }
    }

    fn find_case<'a>(&'a self, expected: bool, data: &[u8]) -> Option<Case<'a>> {
        let decoder = png::Decoder::new(data);
        match decoder.read_info() {
            Ok(reader) => self.find_case_for_info(expected, reader.info()),
            Err(e) => Some(Case::new(Some(self), false).add_product(Product::new("Error", e))),
        }
    }
}

impl PredicateReflection for DetailPredicate<PngPredicate> {
    fn children<'a>(&'a self) -> Box<dyn Iterator<Item = Child<'a>> + 'a> {
        let params = vec![Child::new("predicate", &self.p)];
        Box::new(params.into_iter())
    }
}

impl fmt::Display for DetailPredicate<PngPredicate> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.d {
            Detail::Size(w, h) => write!(f, "is a PNG with size {} x {}", w, h),
            Detail::Opaque => write!(f, "is a PNG without an alpha channel"),
        }
    }
}
