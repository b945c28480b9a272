//! Pieces module - tetromino shapes and the falling piece
//!
//! Every kind has four rotation states. A shape is the set of occupied cells
//! inside a small bounding box, expressed as `(dx, dy)` offsets from the
//! piece origin (the top-left corner of the box). `dx` grows to the right and
//! `dy` grows downward, matching board coordinates.
//!
//! Rotation just swaps in the next shape of the table; there is no pivot
//! correction and no wall kick. The table is the sole source of truth for
//! what a rotation looks like.

use crate::types::{PieceKind, Rotation, BOARD_WIDTH};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Origin used for every freshly spawned piece: column 4, row 0.
pub const SPAWN_POSITION: (i8, i8) = ((BOARD_WIDTH / 2 - 1) as i8, 0);

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => get_i_shape(rotation),
        PieceKind::O => get_o_shape(rotation),
        PieceKind::T => get_t_shape(rotation),
        PieceKind::L => get_l_shape(rotation),
        PieceKind::J => get_j_shape(rotation),
        PieceKind::S => get_s_shape(rotation),
        PieceKind::Z => get_z_shape(rotation),
    }
}

/// Shape for a raw rotation index. Indices wrap modulo 4.
pub fn shape_for_index(kind: PieceKind, rotation_index: u8) -> PieceShape {
    get_shape(kind, Rotation::from_index(rotation_index))
}

/// I piece: a 1x4 bar, vertical in the odd states
fn get_i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North | Rotation::South => [(0, 0), (1, 0), (2, 0), (3, 0)],
        Rotation::East | Rotation::West => [(0, 0), (0, 1), (0, 2), (0, 3)],
    }
}

/// O piece shapes (same for all rotations)
fn get_o_shape(_rotation: Rotation) -> PieceShape {
    [(0, 0), (1, 0), (0, 1), (1, 1)]
}

fn get_t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(0, 0), (0, 1), (1, 1), (0, 2)],
        Rotation::South => [(0, 0), (1, 0), (2, 0), (1, 1)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn get_l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (0, 2), (1, 2)],
        Rotation::East => [(0, 0), (1, 0), (2, 0), (0, 1)],
        Rotation::South => [(0, 0), (1, 0), (1, 1), (1, 2)],
        Rotation::West => [(2, 0), (0, 1), (1, 1), (2, 1)],
    }
}

fn get_j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (1, 1), (0, 2), (1, 2)],
        Rotation::East => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::South => [(0, 0), (1, 0), (0, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (2, 0), (2, 1)],
    }
}

/// S and Z only have two distinct states
fn get_s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North | Rotation::South => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East | Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn get_z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North | Rotation::South => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East | Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

/// Bounding box `(width, height)` of a shape
pub fn shape_extent(shape: &PieceShape) -> (i8, i8) {
    let w = shape.iter().map(|&(dx, _)| dx).max().unwrap_or(0) + 1;
    let h = shape.iter().map(|&(_, dy)| dy).max().unwrap_or(0) + 1;
    (w, h)
}

/// Render a shape as an occupancy matrix of its bounding box, rows first.
///
/// Useful for preview panels and for asserting table entries in tests.
pub fn occupancy(kind: PieceKind, rotation: Rotation) -> Vec<Vec<bool>> {
    let shape = get_shape(kind, rotation);
    let (w, h) = shape_extent(&shape);
    let mut rows = vec![vec![false; w as usize]; h as usize];
    for (dx, dy) in shape {
        rows[dy as usize][dx as usize] = true;
    }
    rows
}

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a new tetromino at spawn position
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: SPAWN_POSITION.0,
            y: SPAWN_POSITION.1,
        }
    }

    /// Place a piece at an arbitrary origin and rotation
    pub fn at(kind: PieceKind, rotation: Rotation, x: i8, y: i8) -> Self {
        Self {
            kind,
            rotation,
            x,
            y,
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute board coordinates of the four minos
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// The same piece translated by `(dx, dy)` and rotated `drot` steps
    pub fn shifted(&self, dx: i8, dy: i8, drot: u8) -> Self {
        Self {
            kind: self.kind,
            rotation: self.rotation.offset(drot),
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_shape_has_four_distinct_cells() {
        for kind in PieceKind::ALL {
            for r in 0..4 {
                let shape = shape_for_index(kind, r);
                for i in 0..4 {
                    for j in (i + 1)..4 {
                        assert_ne!(shape[i], shape[j], "{:?} rotation {}", kind, r);
                    }
                }
            }
        }
    }

    #[test]
    fn test_shapes_are_anchored_to_origin() {
        // Every state touches row 0 and column 0 of its box.
        for kind in PieceKind::ALL {
            for r in 0..4 {
                let shape = shape_for_index(kind, r);
                assert!(shape.iter().any(|&(_, dy)| dy == 0));
                assert!(shape.iter().any(|&(dx, _)| dx == 0));
            }
        }
    }

    #[test]
    fn test_i_shape_alternates_orientation() {
        assert_eq!(shape_extent(&get_shape(PieceKind::I, Rotation::North)), (4, 1));
        assert_eq!(shape_extent(&get_shape(PieceKind::I, Rotation::East)), (1, 4));
        assert_eq!(
            get_shape(PieceKind::I, Rotation::North),
            get_shape(PieceKind::I, Rotation::South)
        );
    }

    #[test]
    fn test_o_shape_is_rotation_invariant() {
        let base = get_shape(PieceKind::O, Rotation::North);
        for r in 1..4 {
            assert_eq!(shape_for_index(PieceKind::O, r), base);
        }
    }

    #[test]
    fn test_t_occupancy() {
        assert_eq!(
            occupancy(PieceKind::T, Rotation::North),
            vec![vec![false, true, false], vec![true, true, true]]
        );
        assert_eq!(
            occupancy(PieceKind::T, Rotation::South),
            vec![vec![true, true, true], vec![false, true, false]]
        );
    }

    #[test]
    fn test_l_and_j_are_mirrors_at_spawn() {
        assert_eq!(
            occupancy(PieceKind::L, Rotation::North),
            vec![vec![true, false], vec![true, false], vec![true, true]]
        );
        assert_eq!(
            occupancy(PieceKind::J, Rotation::North),
            vec![vec![false, true], vec![false, true], vec![true, true]]
        );
    }

    #[test]
    fn test_rotation_index_wraps() {
        assert_eq!(
            shape_for_index(PieceKind::T, 5),
            get_shape(PieceKind::T, Rotation::East)
        );
    }

    #[test]
    fn test_tetromino_new() {
        let piece = Tetromino::new(PieceKind::T);
        assert_eq!(piece.kind, PieceKind::T);
        assert_eq!(piece.rotation, Rotation::North);
        assert_eq!((piece.x, piece.y), (4, 0));
    }

    #[test]
    fn test_tetromino_cells_and_shift() {
        let piece = Tetromino::new(PieceKind::O);
        assert_eq!(piece.cells(), [(4, 0), (5, 0), (4, 1), (5, 1)]);

        let moved = piece.shifted(-1, 2, 1);
        assert_eq!((moved.x, moved.y), (3, 2));
        assert_eq!(moved.rotation, Rotation::East);
        assert_eq!(moved.kind, PieceKind::O);
    }
}
