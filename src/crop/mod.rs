//! Crop domain — the normalized crop box and everything that moves or maps it.
//!
//! Coordinates here are fractions of the *displayed* image element, so the
//! box is independent of render scale. Mapping into source pixels lives in
//! `geometry`; pointer interaction lives in `drag`.

pub mod drag;
pub mod geometry;

pub use drag::{transition, CropInteraction, DragMode, DragSession, PointerEvent};
pub use geometry::{crop_box_from_source, source_rect, SourceRect, Viewport};

use serde::{Deserialize, Serialize};

/// Smallest allowed crop width, as a fraction of the element width.
pub const MIN_CROP_W: f64 = 0.16;
/// Smallest allowed crop height, as a fraction of the element height.
pub const MIN_CROP_H: f64 = 0.08;

/// Normalized rectangle `{x, y, w, h}` with every component in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Default for CropBox {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl CropBox {
    /// Centered box the editor starts with after every new image.
    pub const DEFAULT: CropBox = CropBox { x: 0.1, y: 0.15, w: 0.8, h: 0.7 };

    /// The whole displayed element.
    pub const FULL: CropBox = CropBox { x: 0.0, y: 0.0, w: 1.0, h: 1.0 };

    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Whether the box lies inside the unit square and meets the minimum size.
    pub fn is_valid(&self) -> bool {
        const EPS: f64 = 1e-9;
        [self.x, self.y, self.w, self.h].iter().all(|v| v.is_finite())
            && self.x >= -EPS
            && self.y >= -EPS
            && self.right() <= 1.0 + EPS
            && self.bottom() <= 1.0 + EPS
            && self.w >= MIN_CROP_W - EPS
            && self.h >= MIN_CROP_H - EPS
    }

    /// Nearest valid box: size forced into `[MIN, 1]`, then position pulled
    /// inside the unit square. Non-finite components fall back to the minimum.
    pub fn clamped(&self) -> CropBox {
        let w = clamp(self.w, MIN_CROP_W, 1.0);
        let h = clamp(self.h, MIN_CROP_H, 1.0);
        CropBox {
            x: clamp(self.x, 0.0, 1.0 - w),
            y: clamp(self.y, 0.0, 1.0 - h),
            w,
            h,
        }
    }

    /// Grow the box around its center by `ratio`, clamped to the unit square.
    pub fn expanded(&self, ratio: f64) -> CropBox {
        let cx = self.x + self.w / 2.0;
        let cy = self.y + self.h / 2.0;
        let w = (self.w * ratio).min(1.0);
        let h = (self.h * ratio).min(1.0);
        CropBox {
            x: clamp(cx - w / 2.0, 0.0, 1.0 - w),
            y: clamp(cy - h / 2.0, 0.0, 1.0 - h),
            w,
            h,
        }
    }
}

/// `min(max, max(min, value))`. Never panics, unlike `f64::clamp`, when
/// rounding leaves `min` a hair above `max`.
pub(crate) fn clamp(value: f64, min: f64, max: f64) -> f64 {
    max.min(min.max(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_box_is_pulled_inside() {
        let b = CropBox::new(0.5, 0.5, 0.9, 0.9);
        assert!(!b.is_valid());
        let c = b.clamped();
        assert!(c.is_valid());
        assert_eq!((c.w, c.h), (0.9, 0.9));
        assert!((c.x - 0.1).abs() < 1e-12);
        assert!((c.y - 0.1).abs() < 1e-12);
    }

    #[test]
    fn negative_and_tiny_boxes_are_repaired() {
        let c = CropBox::new(-0.2, 1.3, 0.01, -0.5).clamped();
        assert!(c.is_valid());
        assert_eq!(c.x, 0.0);
        assert_eq!(c.w, MIN_CROP_W);
        assert_eq!(c.h, MIN_CROP_H);
        assert!((c.bottom() - 1.0).abs() < 1e-12);

        let c = CropBox::new(f64::NAN, 0.1, f64::INFINITY, 0.5).clamped();
        assert!(c.is_valid());
    }

    #[test]
    fn valid_boxes_pass_through() {
        assert!(CropBox::DEFAULT.is_valid());
        assert!(CropBox::FULL.is_valid());
        assert_eq!(CropBox::DEFAULT.clamped(), CropBox::DEFAULT);
    }

    #[test]
    fn expansion_is_centered() {
        let b = CropBox::new(0.3, 0.3, 0.4, 0.4).expanded(1.5);
        assert!((b.w - 0.6).abs() < 1e-12);
        assert!((b.h - 0.6).abs() < 1e-12);
        assert!((b.x - 0.2).abs() < 1e-12);
        assert!((b.y - 0.2).abs() < 1e-12);
    }

    #[test]
    fn expansion_is_clamped_to_bounds() {
        let b = CropBox::new(0.0, 0.8, 0.5, 0.2).expanded(1.4);
        assert_eq!(b.x, 0.0);
        assert!(b.bottom() <= 1.0 + 1e-12);
        assert!(b.w >= 0.5 && b.h >= 0.2);
    }

    #[test]
    fn expansion_caps_at_full_size() {
        let b = CropBox::DEFAULT.expanded(1.4);
        assert_eq!(b.w, 1.0);
        assert_eq!(b.x, 0.0);
        assert!((b.h - 0.98).abs() < 1e-12);
    }
}
