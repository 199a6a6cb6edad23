use glam::Vec3;
use mazewalk_common::Aabb;
use serde::{Deserialize, Serialize};

/// Half the edge length of every block. Blocks are 2x2x2 cubes.
pub const BLOCK_HALF_EXTENT: f32 = 1.0;
/// Spacing between neighbouring maze cells, equal to the block edge.
pub const CELL_SPACING: f32 = 2.0 * BLOCK_HALF_EXTENT;

/// Feet sit this far above the point the ground probe tests.
const FOOT_PROBE_OFFSET: f32 = 0.1;
/// How far below a block's top face the probe still counts as standing on it.
const SUPPORT_DEPTH: f32 = 0.5;
/// Probes at or below this height fall back to the flat plane at Y=0.
const FLAT_GROUND_CEILING: f32 = 0.1;

/// Errors from parsing a maze layout.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze layout has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unexpected character {ch:?} at row {row}, column {col}")]
    BadCell { row: usize, col: usize, ch: char },
}

/// Grid of wall and passage cells, row-major with rows running along +Z.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeLayout {
    rows: Vec<Vec<bool>>,
}

impl Default for MazeLayout {
    /// The stock 8x8 maze with the entrance at cell (1,1) and exit at (6,6).
    fn default() -> Self {
        const STOCK: [&str; 8] = [
            "########",
            "#.#....#",
            "#.#.##.#",
            "#....#.#",
            "####.#.#",
            "#......#",
            "#.####.#",
            "########",
        ];
        Self {
            rows: STOCK
                .iter()
                .map(|row| row.bytes().map(|b| b == b'#').collect())
                .collect(),
        }
    }
}

impl MazeLayout {
    /// Parse rows of `#` (wall) and `.` (passage). Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, MazeError> {
        let mut rows: Vec<Vec<bool>> = Vec::new();
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let row_index = rows.len();
            let row = line
                .chars()
                .enumerate()
                .map(|(col, ch)| match ch {
                    '#' => Ok(true),
                    '.' => Ok(false),
                    _ => Err(MazeError::BadCell {
                        row: row_index,
                        col,
                        ch,
                    }),
                })
                .collect::<Result<Vec<bool>, MazeError>>()?;
            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(MazeError::Ragged {
                        row: row_index,
                        expected: first.len(),
                        found: row.len(),
                    });
                }
            }
            rows.push(row);
        }
        if rows.is_empty() {
            return Err(MazeError::Empty);
        }
        Ok(Self { rows })
    }

    /// Cells along X.
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Cells along Z.
    pub fn depth(&self) -> usize {
        self.rows.len()
    }

    pub fn is_wall(&self, x: usize, z: usize) -> bool {
        self.rows
            .get(z)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    /// World position of a cell's centre at floor level.
    pub fn cell_center(x: usize, z: usize) -> Vec3 {
        Vec3::new(x as f32 * CELL_SPACING, 0.0, z as f32 * CELL_SPACING)
    }
}

/// Static block geometry: an ordered list of 2x2x2 block centres.
///
/// The world is built once and never mutated by the controller. All queries
/// scan every block linearly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockWorld {
    blocks: Vec<Vec3>,
}

impl BlockWorld {
    pub fn new(blocks: Vec<Vec3>) -> Self {
        Self { blocks }
    }

    /// Floor blocks under every cell (one layer at Y=-1), then two stacked
    /// blocks (Y=0 and Y=2) for every wall cell, in row order.
    pub fn from_maze(layout: &MazeLayout) -> Self {
        let mut blocks = Vec::with_capacity(layout.width() * layout.depth() * 3);
        for x in 0..layout.width() {
            for z in 0..layout.depth() {
                blocks.push(MazeLayout::cell_center(x, z) - Vec3::Y * BLOCK_HALF_EXTENT);
            }
        }
        for z in 0..layout.depth() {
            for x in 0..layout.width() {
                if layout.is_wall(x, z) {
                    let base = MazeLayout::cell_center(x, z);
                    blocks.push(base);
                    blocks.push(base + Vec3::Y * CELL_SPACING);
                }
            }
        }
        tracing::debug!(
            width = layout.width(),
            depth = layout.depth(),
            blocks = blocks.len(),
            "built block world from maze"
        );
        Self { blocks }
    }

    pub fn blocks(&self) -> &[Vec3] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Bounding box of the block centred on `center`.
    pub fn block_aabb(center: Vec3) -> Aabb {
        Aabb::from_center(center, Vec3::splat(BLOCK_HALF_EXTENT))
    }

    /// Centre of the first block overlapping `aabb`, in world order.
    pub fn first_overlap(&self, aabb: &Aabb) -> Option<Vec3> {
        self.blocks
            .iter()
            .copied()
            .find(|&c| Self::block_aabb(c).overlaps(aabb))
    }

    pub fn overlaps(&self, aabb: &Aabb) -> bool {
        self.first_overlap(aabb).is_some()
    }

    /// Height of the support surface under a body of `radius` standing at
    /// `position`, if any.
    ///
    /// A block supports the body when its X/Z extent overlaps the body's
    /// footprint and the foot point (`position.y - 0.1`) lies no more than
    /// 0.5 below the block's top face. The first supporting block wins.
    /// Without a supporting block, a foot at or below 0.1 stands on the
    /// plane Y=0.
    pub fn ground_height(&self, position: Vec3, radius: f32) -> Option<f32> {
        let foot_y = position.y - FOOT_PROBE_OFFSET;
        let footprint = Aabb::from_feet(position, radius, 0.0);

        let supported = self.blocks.iter().find_map(|&c| {
            let block = Self::block_aabb(c);
            let top = block.max.y;
            let on_top = foot_y <= top && foot_y >= top - SUPPORT_DEPTH;
            (on_top && footprint.overlaps_xz(&block)).then_some(top)
        });

        supported.or_else(|| (foot_y <= FLAT_GROUND_CEILING).then_some(0.0))
    }
}
