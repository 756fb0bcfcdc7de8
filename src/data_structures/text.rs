//! Screen-space geometry for 2D entities.
//!
//! 2D entities are either a single textured quad (the logo) or a line of
//! glyphs cut out of a font atlas. Both are emitted as plain triangle lists of
//! [`FlatVertex`] in normalized device coordinates.

use cgmath::Vector2;

use crate::{camera::ClipSpace, data_structures::model::FlatVertex};

/// Width and height of one glyph relative to the entity scale.
pub const GLYPH_SIZE: f32 = 0.2;

/// Glyph used for characters outside the atlas.
pub const FALLBACK_GLYPH: char = '?';

pub const VERTICES_PER_QUAD: usize = 6;

/// A font atlas laid out as a grid of equally sized cells indexed by ASCII code,
/// left to right, top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphGrid {
    pub cols: u32,
    pub rows: u32,
}

impl GlyphGrid {
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    fn capacity(&self) -> u32 {
        self.cols * self.rows
    }

    /// Texture coordinates (top-left, bottom-right) of the cell for `c`.
    pub fn cell(&self, c: char) -> ([f32; 2], [f32; 2]) {
        let code = match u32::from(c) {
            code if c.is_ascii() && code < self.capacity() => code,
            _ => u32::from(FALLBACK_GLYPH).min(self.capacity() - 1),
        };
        let (col, row) = (code % self.cols, code / self.cols);
        let (w, h) = (1.0 / self.cols as f32, 1.0 / self.rows as f32);
        let top_left = [col as f32 * w, row as f32 * h];
        (top_left, [top_left[0] + w, top_left[1] + h])
    }
}

impl From<(u32, u32)> for GlyphGrid {
    fn from((cols, rows): (u32, u32)) -> Self {
        Self::new(cols, rows)
    }
}

/// Two triangles covering the rectangle with the given top-left corner and size.
///
/// Positions are given Y-up; for a Y-down clip space the vertical axis is mirrored
/// so overlays land on the same spot of the screen.
fn quad(
    top_left: Vector2<f32>,
    size: Vector2<f32>,
    uv: ([f32; 2], [f32; 2]),
    clip: ClipSpace,
) -> [FlatVertex; VERTICES_PER_QUAD] {
    let flip = match clip {
        ClipSpace::YUp => 1.0,
        ClipSpace::YDown => -1.0,
    };
    let (x0, x1) = (top_left.x, top_left.x + size.x);
    let (y0, y1) = (top_left.y * flip, (top_left.y - size.y) * flip);
    let ([u0, v0], [u1, v1]) = uv;
    let tl = FlatVertex { position: [x0, y0], tex_coords: [u0, v0] };
    let bl = FlatVertex { position: [x0, y1], tex_coords: [u0, v1] };
    let br = FlatVertex { position: [x1, y1], tex_coords: [u1, v1] };
    let tr = FlatVertex { position: [x1, y0], tex_coords: [u1, v0] };
    [tl, bl, br, tl, br, tr]
}

/// A single `scale`-sized quad centred on `centre`, showing the whole texture.
pub fn layout_sprite(centre: Vector2<f32>, scale: f32, clip: ClipSpace) -> Vec<FlatVertex> {
    let half = scale / 2.0;
    quad(
        Vector2::new(centre.x - half, centre.y + half),
        Vector2::new(scale, scale),
        ([0.0, 0.0], [1.0, 1.0]),
        clip,
    )
    .to_vec()
}

/// One quad per character of `text`, starting at `origin` (top-left) and advancing right.
pub fn layout_label(
    origin: Vector2<f32>,
    scale: f32,
    text: &str,
    grid: GlyphGrid,
    clip: ClipSpace,
) -> Vec<FlatVertex> {
    let advance = scale * GLYPH_SIZE;
    text.chars()
        .enumerate()
        .flat_map(|(i, c)| {
            quad(
                Vector2::new(origin.x + i as f32 * advance, origin.y),
                Vector2::new(advance, advance),
                grid.cell(c),
                clip,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_cells_are_read_row_by_row() {
        let grid = GlyphGrid::new(16, 16);
        // 'A' is 65: column 1, row 4
        let (tl, br) = grid.cell('A');
        assert_eq!(tl, [1.0 / 16.0, 4.0 / 16.0]);
        assert_eq!(br, [2.0 / 16.0, 5.0 / 16.0]);
    }

    #[test]
    fn unknown_characters_use_the_fallback_glyph() {
        let grid = GlyphGrid::new(16, 16);
        assert_eq!(grid.cell('é'), grid.cell(FALLBACK_GLYPH));
        assert_eq!(grid.cell('✓'), grid.cell(FALLBACK_GLYPH));
    }

    #[test]
    fn label_emits_one_quad_per_character() {
        let grid = GlyphGrid::new(16, 16);
        let vertices = layout_label(Vector2::new(0.2, 0.6), 0.5, "Time1.5", grid, ClipSpace::YUp);
        assert_eq!(vertices.len(), 7 * VERTICES_PER_QUAD);
        // first glyph starts at the origin, the next one a glyph further right
        assert_eq!(vertices[0].position, [0.2, 0.6]);
        let second = vertices[VERTICES_PER_QUAD].position;
        assert!((second[0] - 0.3).abs() < 1e-6);
        assert_eq!(second[1], 0.6);
    }

    #[test]
    fn sprite_is_centred() {
        let vertices = layout_sprite(Vector2::new(-0.7, 0.7), 0.5, ClipSpace::YUp);
        assert_eq!(vertices.len(), VERTICES_PER_QUAD);
        let (sx, sy) = vertices
            .iter()
            .fold((0.0, 0.0), |(x, y), v| (x + v.position[0], y + v.position[1]));
        // tl and br appear twice, their mean is still the centre
        assert!((sx / 6.0 + 0.7).abs() < 1e-5);
        assert!((sy / 6.0 - 0.7).abs() < 1e-5);
    }

    #[test]
    fn y_down_mirrors_the_vertical_axis() {
        let up = layout_sprite(Vector2::new(0.1, 0.4), 0.2, ClipSpace::YUp);
        let down = layout_sprite(Vector2::new(0.1, 0.4), 0.2, ClipSpace::YDown);
        for (u, d) in up.iter().zip(&down) {
            assert_eq!(u.position[0], d.position[0]);
            assert_eq!(u.position[1], -d.position[1]);
            assert_eq!(u.tex_coords, d.tex_coords);
        }
    }
}
