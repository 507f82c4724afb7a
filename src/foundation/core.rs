pub use kurbo::{Affine, Point, Rect, Vec2};

/// Rectangle inside a texture atlas, authored as `[x, y, width, height]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct SourceRect {
    /// Left edge in texture pixels.
    pub x: f64,
    /// Top edge in texture pixels.
    pub y: f64,
    /// Width in texture pixels.
    pub width: f64,
    /// Height in texture pixels.
    pub height: f64,
}

impl SourceRect {
    /// Build a rectangle from its origin and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rect is usable when every component is finite and the size is positive.
    pub fn is_well_formed(self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Cell `index` of a uniform sprite sheet whose cells are `cell` sized.
    pub fn from_sheet_cell(index: SheetIndex, cell: Vec2) -> Self {
        Self {
            x: f64::from(index.col) * cell.x,
            y: f64::from(index.row) * cell.y,
            width: cell.x,
            height: cell.y,
        }
    }

    /// Rectangle size as a vector.
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Convert to a kurbo rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

impl From<[f64; 4]> for SourceRect {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<SourceRect> for [f64; 4] {
    fn from(r: SourceRect) -> Self {
        [r.x, r.y, r.width, r.height]
    }
}

/// Cell coordinates inside a sprite sheet, authored as `[col, row]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct SheetIndex {
    /// Column.
    pub col: u32,
    /// Row.
    pub row: u32,
}

impl From<[u32; 2]> for SheetIndex {
    fn from(v: [u32; 2]) -> Self {
        Self { col: v[0], row: v[1] }
    }
}

impl From<SheetIndex> for [u32; 2] {
    fn from(s: SheetIndex) -> Self {
        [s.col, s.row]
    }
}

/// Screen placement of a sprite: where it goes, how it is turned and sized, and which
/// point of the source rect (as a unit fraction) sits on `translation`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    /// World position of the transform origin.
    pub translation: Vec2,
    /// Rotation in degrees.
    pub rotation_deg: f64,
    /// Uniform scale.
    pub scale: f64,
    /// Transform origin as a fraction of the source rect size.
    pub origin: Vec2,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            rotation_deg: 0.0,
            scale: 1.0,
            origin: Vec2::new(0.5, 0.5),
        }
    }
}

impl Placement {
    /// Affine mapping source-rect local pixels to world space.
    pub fn to_affine(self, rect: SourceRect) -> Affine {
        let pivot = Vec2::new(self.origin.x * rect.width, self.origin.y * rect.height);
        let t_translate = Affine::translate(self.translation);
        let t_rotate = Affine::rotate(self.rotation_deg.to_radians());
        let t_scale = Affine::scale(self.scale);
        let t_unpivot = Affine::translate(-pivot);

        // T(translation) * R(rot) * S(scale) * T(-pivot)
        t_translate * t_rotate * t_scale * t_unpivot
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
