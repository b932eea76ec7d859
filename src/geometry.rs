//! Page geometry in PDF user space
//!
//! All coordinates are in points (1/72 inch) with the origin at the
//! bottom-left corner of the page, y increasing upward. The footer band
//! therefore covers the *low* end of the y axis.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// A rectangle with no area removes nothing and draws nothing.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Whether a point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// The footer band of a page: the bottom `footer_height` points of the
    /// media box, spanning its full width.
    ///
    /// Clamped so the band never exceeds the page: a height larger than the
    /// page covers the whole page, a non-positive height yields a degenerate
    /// band (callers skip those).
    pub fn footer_band(media_box: &Rect, footer_height: f64) -> Self {
        let clamped = footer_height.clamp(0.0, media_box.height());
        Self {
            x0: media_box.x0,
            y0: media_box.y0,
            x1: media_box.x1,
            y1: media_box.y0 + clamped,
        }
    }

    /// The region of the media box strictly above the band; used as the
    /// clip region for surviving page content. Degenerate when the band
    /// covers the whole page.
    pub fn above(&self, media_box: &Rect) -> Self {
        Self {
            x0: media_box.x0,
            y0: self.y1,
            x1: media_box.x1,
            y1: media_box.y1.max(self.y1),
        }
    }
}

/// 2x3 affine transformation matrix `[a b c d e f]`, as used by the `cm`
/// and `Tm` content stream operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self {
            e: tx,
            f: ty,
            ..Self::IDENTITY
        }
    }

    /// `self * other`: the result of applying `self` first, then `other`.
    /// Matches the PDF convention where `cm` pre-concatenates onto the CTM.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point from the matrix's source space to its target space.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}
