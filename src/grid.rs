use rand::Rng;

use crate::types::Cell;

/// Board geometry derived from the surface size and the cell size.
///
/// Surface dimensions are expected to be exact multiples of `cell_size`;
/// anything left over is truncated away and never addressable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub width: u32,
    pub height: u32,
    pub cell_size: u32,
    pub rows: u32,
    pub cols: u32,
}

impl Grid {
    /// The surface must hold at least one whole cell in each direction;
    /// `random_cell` has nothing to pick from otherwise.
    pub fn new(width: u32, height: u32, cell_size: u32) -> Self {
        debug_assert!(cell_size > 0, "cell size must be positive");
        debug_assert!(
            width >= cell_size && height >= cell_size,
            "{}x{} surface holds no {}px cell",
            width,
            height,
            cell_size
        );
        Grid {
            width,
            height,
            cell_size,
            rows: height / cell_size,
            cols: width / cell_size,
        }
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size as i32
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    /// Cell at column `col`, row `row`.
    pub fn cell_at(&self, col: i32, row: i32) -> Cell {
        Cell::new(col * self.cell_size(), row * self.cell_size())
    }

    /// Uniformly random cell on the board. May land on the snake, the food
    /// or a pending power-up.
    pub fn random_cell(&self, rng: &mut impl Rng) -> Cell {
        let col = rng.gen_range(0..self.cols) as i32;
        let row = rng.gen_range(0..self.rows) as i32;
        self.cell_at(col, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn rows_and_cols_follow_surface_size() {
        let grid = Grid::new(400, 300, 20);
        assert_eq!(grid.cols, 20);
        assert_eq!(grid.rows, 15);
    }

    #[test]
    fn uneven_surface_is_truncated() {
        let grid = Grid::new(410, 395, 20);
        assert_eq!(grid.cols, 20);
        assert_eq!(grid.rows, 19);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "holds no")]
    fn surface_smaller_than_a_cell_is_refused() {
        Grid::new(10, 400, 20);
    }

    #[test]
    fn bounds_are_half_open() {
        let grid = Grid::new(400, 400, 20);
        assert!(grid.contains(Cell::new(0, 0)));
        assert!(grid.contains(Cell::new(380, 380)));
        assert!(!grid.contains(Cell::new(400, 0)));
        assert!(!grid.contains(Cell::new(0, 400)));
        assert!(!grid.contains(Cell::new(-20, 100)));
        assert!(!grid.contains(Cell::new(100, -20)));
    }

    #[test]
    fn random_cells_are_aligned_and_on_board() {
        let grid = Grid::new(200, 100, 20);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let cell = grid.random_cell(&mut rng);
            assert!(grid.contains(cell), "{:?} off board", cell);
            assert_eq!(cell.x % 20, 0);
            assert_eq!(cell.y % 20, 0);
        }
    }

    #[test]
    fn random_cells_reach_every_corner() {
        let grid = Grid::new(40, 40, 20);
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(grid.random_cell(&mut rng));
        }
        assert_eq!(seen.len(), 4);
    }
}
