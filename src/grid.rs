use image::{Rgba, RgbaImage};

pub const DEFAULT_GRID_SIZE: usize = 16;
pub const MIN_GRID_SIZE: usize = 4;
pub const MAX_GRID_SIZE: usize = 64;
/// Pixels per cell used when exporting the grid as an image.
pub const DEFAULT_EXPORT_SCALE: u32 = 16;

/// One grid cell: either a painted colour or nothing at all.
///
/// `Transparent` is a sentinel distinct from every colour, including a
/// colour whose alpha happens to be zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Transparent,
    Color(Rgba<u8>),
}

impl Cell {
    pub fn color(self) -> Option<Rgba<u8>> {
        match self {
            Cell::Transparent => None,
            Cell::Color(c) => Some(c),
        }
    }

    pub fn is_transparent(self) -> bool {
        matches!(self, Cell::Transparent)
    }
}

impl From<Rgba<u8>> for Cell {
    fn from(color: Rgba<u8>) -> Self {
        Cell::Color(color)
    }
}

/// Square cell grid, stored row-major.  `cells.len() == size * size` always.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    size: usize,
    cells: Vec<Cell>,
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

impl PixelGrid {
    /// Create a fully transparent grid.  `size` is clamped to the supported range.
    pub fn new(size: usize) -> Self {
        let size = size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
        Self {
            size,
            cells: vec![Cell::Transparent; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.size && y < self.size).then(|| y * self.size + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Throw the current contents away and start over at `size × size`.
    /// Nothing is carried across sizes.
    pub fn resize(&mut self, size: usize) {
        *self = Self::new(size);
        crate::log_info!("Grid reset to {}x{}", self.size, self.size);
    }

    /// Set one cell.  Returns `true` if the cell actually changed.
    pub fn paint_cell(&mut self, x: usize, y: usize, cell: Cell) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        if self.cells[i] == cell {
            return false;
        }
        self.cells[i] = cell;
        true
    }

    pub fn erase_cell(&mut self, x: usize, y: usize) -> bool {
        self.paint_cell(x, y, Cell::Transparent)
    }

    /// 4-connected flood fill from `(x, y)` replacing the seed's colour with
    /// `replacement`.  Returns how many cells changed.
    ///
    /// Cells are painted as they are pushed, so each one enters the stack at
    /// most once and the loop ends after at most `size²` iterations.
    pub fn flood_fill(&mut self, x: usize, y: usize, replacement: Cell) -> usize {
        let Some(seed) = self.get(x, y) else {
            return 0;
        };
        if seed == replacement {
            return 0;
        }

        let size = self.size;
        let mut filled = 0;
        let mut stack: Vec<(usize, usize)> = Vec::with_capacity(size * 2);
        self.cells[y * size + x] = replacement;
        stack.push((x, y));
        filled += 1;

        while let Some((cx, cy)) = stack.pop() {
            let neighbours = [
                (cx.checked_sub(1), Some(cy)),
                (Some(cx + 1), Some(cy)),
                (Some(cx), cy.checked_sub(1)),
                (Some(cx), Some(cy + 1)),
            ];
            for (nx, ny) in neighbours {
                let (Some(nx), Some(ny)) = (nx, ny) else {
                    continue;
                };
                let Some(i) = self.index(nx, ny) else {
                    continue;
                };
                if self.cells[i] == seed {
                    self.cells[i] = replacement;
                    stack.push((nx, ny));
                    filled += 1;
                }
            }
        }
        filled
    }

    /// Set every cell to `replacement`, regardless of its current value.
    pub fn fill_screen(&mut self, replacement: Cell) -> usize {
        let mut changed = 0;
        for cell in &mut self.cells {
            if *cell != replacement {
                *cell = replacement;
                changed += 1;
            }
        }
        changed
    }

    /// Colour of a painted cell; `None` for transparent or out-of-bounds cells.
    pub fn pick_cell(&self, x: usize, y: usize) -> Option<Rgba<u8>> {
        self.get(x, y).and_then(Cell::color)
    }

    /// Rasterise at `scale` pixels per cell.  Transparent cells stay
    /// fully transparent in the output.
    pub fn export_image(&self, scale: u32) -> RgbaImage {
        let scale = scale.max(1);
        let side = self.size as u32 * scale;
        let mut image = RgbaImage::new(side, side);
        for (i, cell) in self.cells.iter().enumerate() {
            let Cell::Color(color) = *cell else {
                continue;
            };
            let x0 = (i % self.size) as u32 * scale;
            let y0 = (i / self.size) as u32 * scale;
            for y in y0..y0 + scale {
                for x in x0..x0 + scale {
                    image.put_pixel(x, y, color);
                }
            }
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Cell = Cell::Color(Rgba([255, 0, 0, 255]));
    const GREEN: Cell = Cell::Color(Rgba([0, 255, 0, 255]));
    const BLUE: Cell = Cell::Color(Rgba([0, 0, 255, 255]));

    #[test]
    fn size_is_clamped_and_resize_discards_contents() {
        assert_eq!(PixelGrid::new(1).size(), MIN_GRID_SIZE);
        assert_eq!(PixelGrid::new(500).size(), MAX_GRID_SIZE);

        let mut grid = PixelGrid::new(8);
        grid.paint_cell(1, 1, RED);
        grid.resize(10);
        assert_eq!(grid.size(), 10);
        assert_eq!(grid.cells().len(), 100);
        assert!(grid.cells().iter().all(|c| c.is_transparent()));
    }

    #[test]
    fn paint_is_idempotent_and_bounds_checked() {
        let mut grid = PixelGrid::new(4);
        assert!(grid.paint_cell(2, 3, RED));
        assert!(!grid.paint_cell(2, 3, RED));
        assert!(!grid.paint_cell(4, 0, RED));
        assert!(grid.erase_cell(2, 3));
        assert_eq!(grid.get(2, 3), Some(Cell::Transparent));
    }

    #[test]
    fn flood_fill_with_same_color_is_a_noop() {
        let mut grid = PixelGrid::new(4);
        grid.paint_cell(1, 1, RED);
        let before = grid.clone();
        assert_eq!(grid.flood_fill(1, 1, RED), 0);
        assert_eq!(grid, before);
        assert_eq!(grid.cells().iter().filter(|c| **c == RED).count(), 1);
    }

    #[test]
    fn flood_fill_uniform_grid_fills_everything() {
        let mut grid = PixelGrid::new(64);
        assert_eq!(grid.flood_fill(63, 0, BLUE), 64 * 64);
        assert!(grid.cells().iter().all(|c| *c == BLUE));
    }

    #[test]
    fn flood_fill_checkerboard_only_touches_seed() {
        let mut grid = PixelGrid::new(6);
        for y in 0..6 {
            for x in 0..6 {
                let cell = if (x + y) % 2 == 0 { RED } else { GREEN };
                grid.paint_cell(x, y, cell);
            }
        }
        // Same-parity cells are only diagonally adjacent, never 4-connected.
        assert_eq!(grid.flood_fill(2, 2, BLUE), 1);
        assert_eq!(grid.get(2, 2), Some(BLUE));
        assert_eq!(grid.get(3, 3), Some(RED));
        assert_eq!(grid.get(2, 3), Some(GREEN));
    }

    #[test]
    fn flood_fill_stops_at_region_border() {
        let mut grid = PixelGrid::new(5);
        for y in 0..5 {
            grid.paint_cell(2, y, RED);
        }
        assert_eq!(grid.flood_fill(0, 0, GREEN), 10);
        assert_eq!(grid.get(1, 4), Some(GREEN));
        assert_eq!(grid.get(2, 4), Some(RED));
        assert_eq!(grid.get(3, 0), Some(Cell::Transparent));
    }

    #[test]
    fn flood_fill_out_of_bounds_seed_is_ignored() {
        let mut grid = PixelGrid::new(4);
        assert_eq!(grid.flood_fill(4, 1, RED), 0);
        assert_eq!(grid, PixelGrid::new(4));
    }

    #[test]
    fn fill_screen_sets_every_cell() {
        let mut grid = PixelGrid::new(4);
        grid.paint_cell(0, 0, RED);
        grid.fill_screen(GREEN);
        assert_eq!(grid.cells().len(), 16);
        assert!(grid.cells().iter().all(|c| *c == GREEN));
    }

    #[test]
    fn pick_ignores_transparent_cells() {
        let mut grid = PixelGrid::new(4);
        assert_eq!(grid.pick_cell(0, 0), None);
        grid.paint_cell(0, 0, BLUE);
        assert_eq!(grid.pick_cell(0, 0), BLUE.color());
        assert_eq!(grid.pick_cell(9, 9), None);
    }

    #[test]
    fn export_is_sparse_and_scaled() {
        let mut grid = PixelGrid::new(4);
        grid.paint_cell(1, 0, RED);
        let image = grid.export_image(3);
        assert_eq!(image.dimensions(), (12, 12));
        assert_eq!(*image.get_pixel(3, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(*image.get_pixel(5, 2), Rgba([255, 0, 0, 255]));
        assert_eq!(image.get_pixel(0, 0)[3], 0);
        assert_eq!(image.get_pixel(6, 0)[3], 0);
    }
}
