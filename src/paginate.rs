//! Raster pagination: split one tall captured image into page-height slices.
//!
//! Image dimensions are in pixels, page dimensions in millimetres. The image is
//! scaled to the content width, keeping its aspect ratio, and cut into
//! vertical bands no taller than the content height.

use crate::error::{PassbookError, Result};

// A4 portrait (mm)
pub const A4_WIDTH: f64 = 210.0;
pub const A4_HEIGHT: f64 = 297.0;
pub const DEFAULT_MARGIN: f64 = 10.0;

// A page count that overshoots an integer by less than this is rounding noise.
const PAGE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSlice {
    pub page_index: usize,
    /// Top of the band in source pixels.
    pub source_y: f64,
    /// Band height in source pixels.
    pub source_height: f64,
    /// Rendered band height on the page (mm), never above the content height.
    pub dest_height: f64,
}

/// Where an image lands on a page: top-left origin, millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::a4(DEFAULT_MARGIN)
    }
}

impl PageLayout {
    pub fn a4(margin: f64) -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin,
        }
    }

    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    pub fn content_height(&self) -> f64 {
        self.page_height - 2.0 * self.margin
    }

    pub fn validate(&self) -> Result<()> {
        positive("page width", self.page_width)?;
        positive("page height", self.page_height)?;
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(PassbookError::InvalidGeometry(format!(
                "margin must be zero or positive, got {}",
                self.margin
            )));
        }
        positive("content width", self.content_width())?;
        positive("content height", self.content_height())
    }

    pub fn paginate(&self, image_width: f64, image_height: f64) -> Result<Vec<PageSlice>> {
        self.validate()?;
        paginate(image_width, image_height, self.content_width(), self.content_height())
    }

    /// Destination of a slice: content box centred horizontally, under the top margin.
    pub fn place(&self, slice: &PageSlice) -> Placement {
        Placement {
            x: (self.page_width - self.content_width()) / 2.0,
            y: self.margin,
            width: self.content_width(),
            height: slice.dest_height,
        }
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PassbookError::InvalidGeometry(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}

/// Partition an `image_width` x `image_height` raster into page slices for a
/// `content_width` x `content_height` content box.
///
/// Slices are contiguous and cover `[0, image_height)` exactly; the last one
/// takes whatever source rows remain.
pub fn paginate(
    image_width: f64,
    image_height: f64,
    content_width: f64,
    content_height: f64,
) -> Result<Vec<PageSlice>> {
    positive("image width", image_width)?;
    positive("image height", image_height)?;
    positive("content width", content_width)?;
    positive("content height", content_height)?;

    let scaled_height = image_height * content_width / image_width;
    positive("scaled height", scaled_height)?;

    let page_count = ((scaled_height / content_height - PAGE_EPSILON).ceil() as usize).max(1);
    let source_per_page = content_height * (image_height / scaled_height);
    log::debug!(
        "paginate {image_width}x{image_height}px into {content_width}x{content_height}mm: \
         scaled height {scaled_height:.3}mm, {page_count} page(s)"
    );

    let slices = (0..page_count)
        .map(|i| {
            let source_y = i as f64 * source_per_page;
            let remaining = image_height - source_y;
            let source_height = if i + 1 == page_count {
                remaining
            } else {
                source_per_page.min(remaining)
            };
            PageSlice {
                page_index: i,
                source_y,
                source_height,
                dest_height: content_height.min(scaled_height - i as f64 * content_height),
            }
        })
        .collect();
    Ok(slices)
}

/// A whole-pixel band of the source image and where it lands on its page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterCrop {
    pub page_index: usize,
    /// First source row, inclusive.
    pub top: u32,
    /// Last source row, exclusive.
    pub bottom: u32,
    pub placement: Placement,
}

/// Round each slice to whole pixel rows for cropping.
///
/// Neighbouring crops share one rounded edge, so together they cover
/// `0..image_height` with no gaps or overlaps. A crop rounded taller than its
/// slice is shrunk around its centre to stay inside the content box.
pub fn raster_crops(image_width: u32, image_height: u32, layout: &PageLayout) -> Result<Vec<RasterCrop>> {
    let slices = layout.paginate(image_width as f64, image_height as f64)?;
    let content_height = layout.content_height();

    let mut edges: Vec<u32> = slices
        .iter()
        .map(|s| (s.source_y.round() as u32).min(image_height))
        .collect();
    edges.push(image_height);

    let mut crops = Vec::with_capacity(slices.len());
    for (slice, bounds) in slices.iter().zip(edges.windows(2)) {
        let (top, bottom) = (bounds[0], bounds[1]);
        if bottom <= top {
            log::warn!("skipping empty crop for page {}", slice.page_index + 1);
            continue;
        }
        let mut placement = layout.place(slice);
        let full_width = placement.width;
        placement.height = full_width * (bottom - top) as f64 / image_width as f64;
        if placement.height > content_height {
            placement.width = full_width * content_height / placement.height;
            placement.height = content_height;
            placement.x += (full_width - placement.width) / 2.0;
        }
        crops.push(RasterCrop {
            page_index: slice.page_index,
            top,
            bottom,
            placement,
        });
    }
    Ok(crops)
}

/// Scale an image onto a single page: full content width, shrunk to the
/// content height when too tall, centred horizontally.
pub fn fit_single_page(image_width: f64, image_height: f64, layout: &PageLayout) -> Result<Placement> {
    layout.validate()?;
    positive("image width", image_width)?;
    positive("image height", image_height)?;

    let content_width = layout.content_width();
    let content_height = layout.content_height();
    let mut width = content_width;
    let mut height = image_height * content_width / image_width;
    if height > content_height {
        height = content_height;
        width = image_width * content_height / image_height;
    }
    Ok(Placement {
        x: layout.margin + (content_width - width) / 2.0,
        y: layout.margin,
        width,
        height,
    })
}
