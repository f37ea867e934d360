/// Wall bits of a cell bitmask.
pub mod walls {
    pub const NORTH: u32 = 0b0001;
    pub const EAST: u32 = 0b0010;
    pub const SOUTH: u32 = 0b0100;
    pub const WEST: u32 = 0b1000;
    pub const ALL: u32 = NORTH | EAST | SOUTH | WEST;
}

/// Largest accepted width or height.
pub const MAX_SIDE: usize = 256;

/// Maze size in cells. Fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MazeDimensions {
    pub width: usize,
    pub height: usize,
}

impl MazeDimensions {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Like [`MazeDimensions::new`], but `None` for an empty maze or a side
    /// longer than [`MAX_SIDE`].
    pub fn try_new(width: usize, height: usize) -> Option<Self> {
        let valid = (1..=MAX_SIDE).contains(&width) && (1..=MAX_SIDE).contains(&height);
        valid.then_some(Self { width, height })
    }

    /// True when `[row][col]` addresses a cell of this maze.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }
}

impl Default for MazeDimensions {
    /// The 7x4 maze the controller firmware is built for.
    fn default() -> Self {
        Self::new(7, 4)
    }
}

/// Fixed-size row-major grid indexed `[row][col]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    dims: MazeDimensions,
    cells: Vec<T>,
}

/// Wall bitmask per cell.
pub type MazeGrid = Grid<u32>;

/// Flood-fill distance per cell.
pub type DistanceGrid = Grid<u32>;

impl<T: Clone + Default> Grid<T> {
    /// A grid with every cell at `T::default()`.
    pub fn new(dims: MazeDimensions) -> Self {
        Self {
            dims,
            cells: vec![T::default(); dims.cell_count()],
        }
    }
}

impl<T> Grid<T> {
    pub fn dimensions(&self) -> MazeDimensions {
        self.dims
    }

    pub fn width(&self) -> usize {
        self.dims.width
    }

    pub fn height(&self) -> usize {
        self.dims.height
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.index(row, col).map(|idx| &self.cells[idx])
    }

    /// Overwrite one cell. Returns `false` and leaves the grid untouched when
    /// the coordinates are out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> bool {
        match self.index(row, col) {
            Some(idx) => {
                self.cells[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Cells of one row, west to east.
    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.dims.height {
            return None;
        }
        let start = row * self.dims.width;
        Some(&self.cells[start..start + self.dims.width])
    }

    /// All rows from row 0 upward.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[T]> + '_ {
        // chunks(0) panics; a zero-width grid simply has no rows to show.
        let width = self.dims.width.max(1);
        self.cells.chunks(width)
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        self.dims
            .contains(row, col)
            .then(|| row * self.dims.width + col)
    }
}

impl Grid<u32> {
    /// True when `wall` (one of [`walls`]) is set on the cell.
    pub fn has_wall(&self, row: usize, col: usize, wall: u32) -> bool {
        self.get(row, col).is_some_and(|mask| mask & wall != 0)
    }
}
