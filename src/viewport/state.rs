use crate::foundation::core::{Canvas, Point, Rect, Vec2};

/// Scale change per wheel notch.
pub const ZOOM_STEP: f64 = 0.05;
/// Lower zoom bound relative to the fit scale.
pub const MIN_SCALE_RATIO: f64 = 0.5;
/// Upper zoom bound relative to the fit scale.
pub const MAX_SCALE_RATIO: f64 = 3.0;

/// Position and zoom of the source image on the canvas.
///
/// `min_scale <= scale <= max_scale` holds after every operation. Once [`place`](Self::place)
/// is called, drag and zoom are refused until the viewport is refit for a new image.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportState {
    pub image_width: u32,
    pub image_height: u32,
    pub scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Top-left corner of the scaled image in canvas pixels.
    pub origin: Point,
    pub placed: bool,
    drag_offset: Option<Vec2>,
}

impl ViewportState {
    /// Fit the image to the canvas width and center it.
    pub fn fit(canvas: Canvas, image_width: u32, image_height: u32) -> Self {
        let scale = if image_width == 0 {
            1.0
        } else {
            f64::from(canvas.width) / f64::from(image_width)
        };
        let mut state = Self {
            image_width,
            image_height,
            scale,
            min_scale: scale * MIN_SCALE_RATIO,
            max_scale: scale * MAX_SCALE_RATIO,
            origin: Point::ZERO,
            placed: false,
            drag_offset: None,
        };
        let size = state.scaled_size();
        state.origin = Point::new(
            (f64::from(canvas.width) - size.x) / 2.0,
            (f64::from(canvas.height) - size.y) / 2.0,
        );
        state
    }

    /// Width and height of the image at the current scale.
    pub fn scaled_size(&self) -> Vec2 {
        Vec2::new(
            f64::from(self.image_width) * self.scale,
            f64::from(self.image_height) * self.scale,
        )
    }

    /// Canvas-space rectangle covered by the image.
    pub fn bounds(&self) -> Rect {
        let size = self.scaled_size();
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + size.x,
            self.origin.y + size.y,
        )
    }

    /// Edge-inclusive hit test.
    pub fn contains(&self, p: Point) -> bool {
        let b = self.bounds();
        p.x >= b.x0 && p.x <= b.x1 && p.y >= b.y0 && p.y <= b.y1
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    /// Start dragging if `p` hits the image. Returns whether a drag started.
    pub fn begin_drag(&mut self, p: Point) -> bool {
        if self.placed || !self.contains(p) {
            return false;
        }
        self.drag_offset = Some(p - self.origin);
        true
    }

    /// Move the image so the grab point follows `p`. Returns whether anything moved.
    pub fn drag_to(&mut self, p: Point) -> bool {
        if self.placed {
            return false;
        }
        let Some(offset) = self.drag_offset else {
            return false;
        };
        self.origin = p - offset;
        true
    }

    pub fn end_drag(&mut self) {
        self.drag_offset = None;
    }

    /// Apply one wheel event. Positive `delta` zooms out; zero or negative zooms in, the same
    /// as a wheel notch toward the user. The image center stays fixed. Returns whether the
    /// event was accepted.
    pub fn zoom(&mut self, delta: f64) -> bool {
        if self.placed || delta.is_nan() {
            return false;
        }
        let center = self.bounds().center();
        let step = if delta > 0.0 { 1.0 } else { -1.0 };
        self.scale = (self.scale - step * ZOOM_STEP).clamp(self.min_scale, self.max_scale);
        let size = self.scaled_size();
        self.origin = Point::new(center.x - size.x / 2.0, center.y - size.y / 2.0);
        true
    }

    /// Freeze position and scale.
    pub fn place(&mut self) {
        self.placed = true;
        self.drag_offset = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/state.rs"]
mod tests;
