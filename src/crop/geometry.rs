//! Display space → source pixel space.
//!
//! The image element letterboxes its bitmap (contain semantics): one uniform
//! scale fits the whole image inside the element, centered, with padding on
//! the shorter axis. A crop box is relative to the element, padding included,
//! so it has to be intersected with the rendered image before it can be
//! mapped back into natural pixels.

use super::CropBox;
use crate::error::CaptureError;

/// On-screen size of the rendered image element, in client pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub client_width: f64,
    pub client_height: f64,
}

impl Viewport {
    pub fn new(client_width: f64, client_height: f64) -> Self {
        Self { client_width, client_height }
    }

    /// Element exactly the size of the image, i.e. no letterboxing.
    pub fn fitted(natural: (u32, u32)) -> Self {
        Self::new(natural.0 as f64, natural.1 as f64)
    }
}

/// Integer rectangle in natural image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SourceRect {
    pub fn longest_edge(&self) -> u32 {
        self.width.max(self.height)
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Contain-fit of `natural` inside `viewport`: `(scale, offset_x, offset_y)`.
fn contain_fit(viewport: Viewport, natural: (u32, u32)) -> Result<(f64, f64, f64), CaptureError> {
    let (cw, ch) = (viewport.client_width, viewport.client_height);
    if !(cw > 0.0 && ch > 0.0) {
        return Err(CaptureError::ImageNotReady("image element has not been laid out"));
    }
    let (nw, nh) = (natural.0 as f64, natural.1 as f64);
    if natural.0 == 0 || natural.1 == 0 {
        return Err(CaptureError::ImageNotReady("natural image size is unknown"));
    }

    let scale = (cw / nw).min(ch / nh);
    let offset_x = (cw - nw * scale) / 2.0;
    let offset_y = (ch - nh * scale) / 2.0;
    Ok((scale, offset_x, offset_y))
}

/// Map a crop box into the source pixel rectangle it covers.
///
/// Width and height are never below 2 pixels, and the rectangle is pulled
/// back inside the image when rounding pushes it past the far edge.
pub fn source_rect(
    crop: &CropBox,
    viewport: Viewport,
    natural: (u32, u32),
) -> Result<SourceRect, CaptureError> {
    let (scale, offset_x, offset_y) = contain_fit(viewport, natural)?;
    let rendered_w = natural.0 as f64 * scale;
    let rendered_h = natural.1 as f64 * scale;

    let bx = crop.x * viewport.client_width;
    let by = crop.y * viewport.client_height;
    let bw = crop.w * viewport.client_width;
    let bh = crop.h * viewport.client_height;

    let ix = offset_x.max(bx);
    let iy = offset_y.max(by);
    let ir = (offset_x + rendered_w).min(bx + bw);
    let ib = (offset_y + rendered_h).min(by + bh);

    let iw = (ir - ix).max(2.0);
    let ih = (ib - iy).max(2.0);

    let mut x = ((ix - offset_x) / scale).round().max(0.0) as u32;
    let mut y = ((iy - offset_y) / scale).round().max(0.0) as u32;
    let mut width = (iw / scale).round().max(2.0) as u32;
    let mut height = (ih / scale).round().max(2.0) as u32;

    if natural.0 >= 2 {
        width = width.min(natural.0);
        x = x.min(natural.0 - width);
    }
    if natural.1 >= 2 {
        height = height.min(natural.1);
        y = y.min(natural.1 - height);
    }

    Ok(SourceRect { x, y, width, height })
}

/// Inverse of [`source_rect`]: the crop box that covers `rect` under the
/// same render geometry.
pub fn crop_box_from_source(
    rect: &SourceRect,
    viewport: Viewport,
    natural: (u32, u32),
) -> Result<CropBox, CaptureError> {
    let (scale, offset_x, offset_y) = contain_fit(viewport, natural)?;
    Ok(CropBox {
        x: (offset_x + rect.x as f64 * scale) / viewport.client_width,
        y: (offset_y + rect.y as f64 * scale) / viewport.client_height,
        w: rect.width as f64 * scale / viewport.client_width,
        h: rect.height as f64 * scale / viewport.client_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_without_letterbox() {
        let rect = source_rect(&CropBox::DEFAULT, Viewport::new(400.0, 300.0), (800, 600)).unwrap();
        assert_eq!(rect, SourceRect { x: 80, y: 90, width: 640, height: 420 });
    }

    #[test]
    fn full_box_skips_letterbox_padding() {
        // 800x600 inside a 400x400 element renders at 400x300 with 50px bands.
        let rect = source_rect(&CropBox::FULL, Viewport::new(400.0, 400.0), (800, 600)).unwrap();
        assert_eq!(rect, SourceRect { x: 0, y: 0, width: 800, height: 600 });
    }

    #[test]
    fn box_inside_padding_collapses_to_minimum() {
        let in_band = CropBox::new(0.0, 0.0, 1.0, 0.1);
        let rect = source_rect(&in_band, Viewport::new(400.0, 400.0), (800, 600)).unwrap();
        assert!(rect.height >= 2);
        assert!(rect.y + rect.height <= 600);
    }

    #[test]
    fn zero_layout_is_not_ready() {
        let err = source_rect(&CropBox::DEFAULT, Viewport::new(0.0, 300.0), (800, 600)).unwrap_err();
        assert!(matches!(err, CaptureError::ImageNotReady(_)));
        let err = source_rect(&CropBox::DEFAULT, Viewport::new(400.0, 300.0), (0, 600)).unwrap_err();
        assert!(matches!(err, CaptureError::ImageNotReady(_)));
    }

    #[test]
    fn round_trip_within_rounding() {
        let viewport = Viewport::new(390.0, 520.0);
        let natural = (1179, 1572);
        let crop = CropBox::new(0.123, 0.287, 0.55, 0.31);
        let rect = source_rect(&crop, viewport, natural).unwrap();
        let back = crop_box_from_source(&rect, viewport, natural).unwrap();

        // One source pixel, expressed as a fraction of the element.
        let (scale, _, _) = contain_fit(viewport, natural).unwrap();
        let tol_x = scale / viewport.client_width;
        let tol_y = scale / viewport.client_height;
        assert!((back.x - crop.x).abs() <= tol_x);
        assert!((back.y - crop.y).abs() <= tol_y);
        assert!((back.w - crop.w).abs() <= 2.0 * tol_x);
        assert!((back.h - crop.h).abs() <= 2.0 * tol_y);
    }
}
