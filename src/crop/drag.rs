//! Pointer-driven crop box interaction as an explicit state machine.
//!
//! `Idle → Dragging → Idle`. A pointer-down on the box or one of its corner
//! handles captures a `DragSession`; every move recomputes the box from the
//! session's original box plus the pointer delta; up/cancel drops the session.
//! `transition` is pure, so hosts only have to translate their own pointer
//! events into `PointerEvent`s.

use super::{clamp, CropBox, MIN_CROP_H, MIN_CROP_W};

/// What a drag does to the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    ResizeNw,
    ResizeNe,
    ResizeSw,
    ResizeSe,
}

impl DragMode {
    /// Handle owns the left edge.
    fn west(self) -> bool {
        matches!(self, DragMode::ResizeNw | DragMode::ResizeSw)
    }

    /// Handle owns the top edge.
    fn north(self) -> bool {
        matches!(self, DragMode::ResizeNw | DragMode::ResizeNe)
    }
}

/// Captured at pointer-down, consumed at pointer-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub origin_client_x: f64,
    pub origin_client_y: f64,
    pub origin_box: CropBox,
    pub mode: DragMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CropInteraction {
    #[default]
    Idle,
    Dragging(DragSession),
}

impl CropInteraction {
    pub fn is_dragging(&self) -> bool {
        matches!(self, CropInteraction::Dragging(_))
    }
}

/// Host pointer events, in client (on-screen) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        client_x: f64,
        client_y: f64,
        mode: DragMode,
    },
    /// `rect_width`/`rect_height` are the rendered image element's on-screen size.
    Move {
        client_x: f64,
        client_y: f64,
        rect_width: f64,
        rect_height: f64,
    },
    Up,
    Cancel,
}

/// Advance the interaction by one event, returning the new state and box.
///
/// A second pointer-down while dragging is ignored; so is a move while idle
/// or over an element that has no on-screen size yet.
pub fn transition(
    state: CropInteraction,
    current: CropBox,
    event: PointerEvent,
) -> (CropInteraction, CropBox) {
    match (state, event) {
        (CropInteraction::Idle, PointerEvent::Down { client_x, client_y, mode }) => {
            let session = DragSession {
                origin_client_x: client_x,
                origin_client_y: client_y,
                origin_box: current,
                mode,
            };
            (CropInteraction::Dragging(session), current)
        }
        (
            CropInteraction::Dragging(session),
            PointerEvent::Move { client_x, client_y, rect_width, rect_height },
        ) => {
            if rect_width <= 0.0 || rect_height <= 0.0 {
                return (state, current);
            }
            let dx = (client_x - session.origin_client_x) / rect_width;
            let dy = (client_y - session.origin_client_y) / rect_height;
            (state, drag_box(&session, dx, dy))
        }
        (_, PointerEvent::Up | PointerEvent::Cancel) => (CropInteraction::Idle, current),
        _ => (state, current),
    }
}

/// Box produced by dragging `session` by a normalized delta.
pub fn drag_box(session: &DragSession, dx: f64, dy: f64) -> CropBox {
    let start = session.origin_box;
    if session.mode == DragMode::Move {
        return CropBox {
            x: clamp(start.x + dx, 0.0, 1.0 - start.w),
            y: clamp(start.y + dy, 0.0, 1.0 - start.h),
            ..start
        };
    }

    let mode = session.mode;
    let mut left = start.x;
    let mut top = start.y;
    let mut right = start.right();
    let mut bottom = start.bottom();

    if mode.west() {
        left += dx;
    } else {
        right += dx;
    }
    if mode.north() {
        top += dy;
    } else {
        bottom += dy;
    }

    left = clamp(left, 0.0, 1.0 - MIN_CROP_W);
    right = clamp(right, MIN_CROP_W, 1.0);
    top = clamp(top, 0.0, 1.0 - MIN_CROP_H);
    bottom = clamp(bottom, MIN_CROP_H, 1.0);

    // The dragged edge gives way, the anchored one stays put.
    if right - left < MIN_CROP_W {
        if mode.west() {
            left = right - MIN_CROP_W;
        } else {
            right = left + MIN_CROP_W;
        }
    }
    if bottom - top < MIN_CROP_H {
        if mode.north() {
            top = bottom - MIN_CROP_H;
        } else {
            bottom = top + MIN_CROP_H;
        }
    }

    left = clamp(left, 0.0, 1.0 - MIN_CROP_W);
    right = clamp(right, left + MIN_CROP_W, 1.0);
    top = clamp(top, 0.0, 1.0 - MIN_CROP_H);
    bottom = clamp(bottom, top + MIN_CROP_H, 1.0);

    CropBox {
        x: left,
        y: top,
        w: right - left,
        h: bottom - top,
    }
}
