use glam::{Mat4, Vec3};
use mazewalk_common::{EPSILON, ViewConfig, perspective};
use mazewalk_kernel::{BLOCK_HALF_EXTENT, BlockWorld, CELL_SPACING, PlayerController};

/// Perspective projection parameters. Kept apart from the view so a window
/// resize only touches the aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn from_config(config: &ViewConfig) -> Self {
        Self {
            fov_degrees: config.fov_degrees,
            aspect: config.aspect,
            near: config.near,
            far: config.far,
        }
    }

    /// Track a framebuffer resize. A zero-sized (minimised) viewport keeps
    /// the previous aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            tracing::trace!(width, height, "ignoring empty viewport");
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn matrix(&self) -> Mat4 {
        perspective(self.fov_degrees, self.aspect, self.near, self.far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::from_config(&ViewConfig::default())
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Eye position, head bob included.
    pub eye: Vec3,
    /// Unit facing direction.
    pub front: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
}

impl RenderView {
    pub fn from_controller(controller: &PlayerController, projection: &Projection) -> Self {
        Self {
            eye: controller.eye_position(),
            front: controller.orientation().front(),
            view: controller.view_matrix(),
            projection: projection.matrix(),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Renderer-agnostic interface.
///
/// A renderer reads the block world and a view and produces output. It never
/// mutates the world.
pub trait Renderer {
    type Output;

    fn render(&self, world: &BlockWorld, view: &RenderView) -> Self::Output;
}

/// How a block is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Floor layer (centre at or below y = -1).
    Ground,
    Wall,
}

impl BlockKind {
    pub fn classify(center: Vec3) -> Self {
        if center.y <= -BLOCK_HALF_EXTENT + EPSILON {
            Self::Ground
        } else {
            Self::Wall
        }
    }
}

/// Cells marked specially on the map, as (x, z) grid indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapMarkers {
    pub entrance: (usize, usize),
    pub exit: (usize, usize),
}

impl Default for MapMarkers {
    /// Entrance at world (2, 2), exit at world (12, 12).
    fn default() -> Self {
        Self {
            entrance: (1, 1),
            exit: (6, 6),
        }
    }
}

/// Arrow for the horizontal facing direction, `^` being -Z (map up).
pub fn facing_arrow(front: Vec3) -> char {
    let (x, z) = (front.x, front.z);
    if x.abs() < EPSILON && z.abs() < EPSILON {
        '*'
    } else if x.abs() >= z.abs() {
        if x >= 0.0 { '>' } else { '<' }
    } else if z < 0.0 {
        '^'
    } else {
        'v'
    }
}

/// Cells per map axis. Blocks past this are left off the map.
pub const MAX_MAP_EXTENT: usize = 256;

fn grid_cell(v: f32) -> Option<usize> {
    let cell = (v / CELL_SPACING).round();
    (cell.is_finite() && cell >= 0.0 && cell < MAX_MAP_EXTENT as f32).then_some(cell as usize)
}

/// Text renderer: a pose header followed by a top-down map.
///
/// Map legend: `#` wall, `.` floor, `E` entrance, `X` exit, `@` player.
/// Rows run along +Z, so `^` on the header means facing -Z.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    markers: MapMarkers,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_markers(markers: MapMarkers) -> Self {
        Self { markers }
    }

    fn map_rows(&self, world: &BlockWorld, eye: Vec3) -> Vec<String> {
        let mut cells: Vec<(usize, usize, BlockKind)> = Vec::with_capacity(world.len());
        let mut skipped = 0usize;
        for &center in world.blocks() {
            match (grid_cell(center.x), grid_cell(center.z)) {
                (Some(x), Some(z)) => cells.push((x, z, BlockKind::classify(center))),
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::debug!(skipped, "blocks outside the map extent");
        }
        let Some(width) = cells.iter().map(|c| c.0 + 1).max() else {
            return Vec::new();
        };
        let depth = cells.iter().map(|c| c.1 + 1).max().unwrap_or(0);

        let mut grid = vec![vec![' '; width]; depth];
        for &(x, z, kind) in &cells {
            let slot = &mut grid[z][x];
            match kind {
                BlockKind::Wall => *slot = '#',
                BlockKind::Ground if *slot == ' ' => *slot = '.',
                BlockKind::Ground => {}
            }
        }

        for ((x, z), mark) in [(self.markers.entrance, 'E'), (self.markers.exit, 'X')] {
            if let Some(slot) = grid.get_mut(z).and_then(|row| row.get_mut(x)) {
                if *slot != '#' {
                    *slot = mark;
                }
            }
        }

        if let (Some(x), Some(z)) = (grid_cell(eye.x), grid_cell(eye.z)) {
            if let Some(slot) = grid.get_mut(z).and_then(|row| row.get_mut(x)) {
                *slot = '@';
            }
        }

        grid.into_iter().map(|row| row.into_iter().collect()).collect()
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, world: &BlockWorld, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Maze ({} blocks) ===\n", world.len()));
        out.push_str(&format!(
            "Eye: ({:.2}, {:.2}, {:.2}) facing {} front=({:.2}, {:.2}, {:.2})\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            facing_arrow(view.front),
            view.front.x,
            view.front.y,
            view.front.z
        ));
        for row in self.map_rows(world, view.eye) {
            out.push_str(row.trim_end());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use mazewalk_kernel::MazeLayout;

    fn maze() -> BlockWorld {
        BlockWorld::from_maze(&MazeLayout::default())
    }

    #[test]
    fn classify_floor_and_walls() {
        assert_eq!(BlockKind::classify(Vec3::new(2.0, -1.0, 2.0)), BlockKind::Ground);
        assert_eq!(BlockKind::classify(Vec3::new(0.0, 0.0, 0.0)), BlockKind::Wall);
        assert_eq!(BlockKind::classify(Vec3::new(0.0, 2.0, 0.0)), BlockKind::Wall);
    }

    #[test]
    fn arrows_follow_horizontal_front() {
        assert_eq!(facing_arrow(Vec3::new(0.0, 0.0, -1.0)), '^');
        assert_eq!(facing_arrow(Vec3::new(0.0, 0.0, 1.0)), 'v');
        assert_eq!(facing_arrow(Vec3::new(1.0, 0.3, 0.2)), '>');
        assert_eq!(facing_arrow(Vec3::new(-1.0, 0.0, 0.5)), '<');
        assert_eq!(facing_arrow(Vec3::Y), '*');
    }

    #[test]
    fn projection_matches_glam() {
        let p = Projection::default();
        let expected = Mat4::perspective_rh_gl(90f32.to_radians(), 800.0 / 600.0, 0.1, 100.0);
        assert!(p.matrix().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn viewport_resize_updates_aspect() {
        let mut p = Projection::default();
        p.set_viewport(1920, 1080);
        assert!((p.aspect - 16.0 / 9.0).abs() < 1e-6);
        p.set_viewport(0, 1080);
        assert!((p.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn point_ahead_lands_in_screen_centre() {
        let controller = PlayerController::default();
        let view = RenderView::from_controller(&controller, &Projection::default());
        let target = view.eye + view.front * 5.0;
        let clip = view.view_projection() * Vec4::new(target.x, target.y, target.z, 1.0);
        assert!(clip.w > 0.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4, "{ndc:?}");
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn map_shows_walls_markers_and_player() {
        let controller = PlayerController::default();
        let view = RenderView::from_controller(&controller, &Projection::default());
        let out = DebugTextRenderer::new().render(&maze(), &view);
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].contains("148 blocks"), "{}", lines[0]);
        assert!(lines[1].contains("facing ^"));
        assert_eq!(lines.len(), 2 + 8);
        assert_eq!(lines[2], "########");
        // spawn sits on the entrance cell
        assert_eq!(lines[3], "#@#....#");
        assert_eq!(lines[8], "#.####X#");
        assert_eq!(lines[9], "########");
    }

    #[test]
    fn entrance_visible_when_player_elsewhere() {
        let mut controller = PlayerController::default();
        controller.set_position(Vec3::new(2.0, 0.0, 10.0));
        let view = RenderView::from_controller(&controller, &Projection::default());
        let out = DebugTextRenderer::new().render(&maze(), &view);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[3], "#E#....#");
        assert_eq!(lines[7], "#@.....#");
    }

    #[test]
    fn far_block_is_left_off_the_map() {
        let mut blocks = maze().blocks().to_vec();
        blocks.push(Vec3::new(1.0e9, 0.0, 2.0));
        blocks.push(Vec3::new(2.0, 0.0, 1.0e9));
        let world = BlockWorld::new(blocks);
        let view = RenderView::from_controller(&PlayerController::default(), &Projection::default());
        let out = DebugTextRenderer::new().render(&world, &view);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("150 blocks"));
        assert_eq!(lines.len(), 2 + 8);
        assert!(lines[2..].iter().all(|row| row.len() <= 8));
    }

    #[test]
    fn empty_world_has_header_only() {
        let view = RenderView::from_controller(&PlayerController::default(), &Projection::default());
        let out = DebugTextRenderer::new().render(&BlockWorld::default(), &view);
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("0 blocks"));
    }
}
