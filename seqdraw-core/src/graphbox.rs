//! Constraint grid layout
//!
//! A [`Graphic`] owns a matrix of grid points and a list of placed items. Each item
//! contributes spacing constraints relative to its grid position; [`Graphic::resolve`]
//! turns those constraints into pixel coordinates for every point. Items are then drawn in
//! placement order with their resolved anchor.
//!
//! Spacing is stored as a delta per point: the minimum distance to the previous column
//! (`dx`) and the previous row (`dy`). Column deltas live on row 0 and row deltas on
//! column 0 while constraints are applied, and are broadcast to every cell afterwards.

use std::fmt;

use tracing::trace;

use crate::canvas::Canvas;
use crate::error::LayoutBoundsError;

/// A resolved pixel position
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Minimum spacing from the previous column and row
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Delta {
    pub dx: f64,
    pub dy: f64,
}

/// Integer grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Space required around a grid point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sides {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Sides {
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn horizontal(left: f64, right: f64) -> Self {
        Self::new(left, right, 0.0, 0.0)
    }

    pub fn vertical(top: f64, bottom: f64) -> Self {
        Self::new(0.0, 0.0, top, bottom)
    }
}

/// Sizing primitive contributed by a placed item
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Raise the gaps around `at` to at least `sides`
    Floor { at: GridPos, sides: Sides },
    /// Grow the gaps around `at` by `sides`
    Add { at: GridPos, sides: Sides },
    /// Ensure the distance between two points is at least `size`, spreading any deficit
    /// evenly over the gaps in between
    Span {
        from: GridPos,
        to: GridPos,
        size: Size,
    },
}

#[derive(Debug, Clone, Copy, Default)]
struct GridPoint {
    point: Point,
    delta: Delta,
}

/// Matrix of `(rows + 1) × (cols + 1)` points
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<GridPoint>,
    /// Space after the last column and row
    trailing: Delta,
}

impl Grid {
    /// `rows` and `cols` are the last valid indices
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![GridPoint::default(); (rows + 1) * (cols + 1)],
            trailing: Delta::default(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, at: GridPos) -> bool {
        at.row <= self.rows && at.col <= self.cols
    }

    /// Resolved position; out-of-range coordinates are clamped to the last row/column
    pub fn point(&self, row: usize, col: usize) -> Point {
        self.cell(row.min(self.rows), col.min(self.cols)).point
    }

    pub fn delta(&self, row: usize, col: usize) -> Delta {
        self.cell(row.min(self.rows), col.min(self.cols)).delta
    }

    pub fn trailing(&self) -> Delta {
        self.trailing
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * (self.cols + 1) + col
    }

    fn cell(&self, row: usize, col: usize) -> &GridPoint {
        &self.cells[self.index(row, col)]
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> &mut GridPoint {
        let index = self.index(row, col);
        &mut self.cells[index]
    }

    /// Gap before column `col`; `cols + 1` addresses the trailing gap
    fn col_gap(&self, col: usize) -> f64 {
        if col > self.cols {
            self.trailing.dx
        } else {
            self.cell(0, col).delta.dx
        }
    }

    fn col_gap_mut(&mut self, col: usize) -> &mut f64 {
        if col > self.cols {
            &mut self.trailing.dx
        } else {
            &mut self.cell_mut(0, col).delta.dx
        }
    }

    fn row_gap(&self, row: usize) -> f64 {
        if row > self.rows {
            self.trailing.dy
        } else {
            self.cell(row, 0).delta.dy
        }
    }

    fn row_gap_mut(&mut self, row: usize) -> &mut f64 {
        if row > self.rows {
            &mut self.trailing.dy
        } else {
            &mut self.cell_mut(row, 0).delta.dy
        }
    }

    fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = GridPoint::default();
        }
        self.trailing = Delta::default();
    }

    fn apply(&mut self, constraint: Constraint) {
        match constraint {
            Constraint::Floor { at, sides } => {
                self.update_sides(at, sides, f64::max);
            }
            Constraint::Add { at, sides } => {
                self.update_sides(at, sides, |gap, extra| gap + extra);
            }
            Constraint::Span { from, to, size } => {
                let (c1, c2) = (from.col.min(to.col), from.col.max(to.col));
                if c2 > c1 {
                    let current: f64 = (c1 + 1..=c2).map(|c| self.col_gap(c)).sum();
                    if current < size.width {
                        let share = (size.width - current) / (c2 - c1) as f64;
                        for c in c1 + 1..=c2 {
                            let left = self.col_gap(c) + share;
                            self.apply(Constraint::Floor {
                                at: GridPos::new(from.row, c),
                                sides: Sides::horizontal(left, 0.0),
                            });
                        }
                    }
                }

                let (r1, r2) = (from.row.min(to.row), from.row.max(to.row));
                if r2 > r1 {
                    let current: f64 = (r1 + 1..=r2).map(|r| self.row_gap(r)).sum();
                    if current < size.height {
                        let share = (size.height - current) / (r2 - r1) as f64;
                        for r in r1 + 1..=r2 {
                            let top = self.row_gap(r) + share;
                            self.apply(Constraint::Floor {
                                at: GridPos::new(r, from.col),
                                sides: Sides::vertical(top, 0.0),
                            });
                        }
                    }
                }
            }
        }
    }

    fn update_sides(&mut self, at: GridPos, sides: Sides, op: impl Fn(f64, f64) -> f64) {
        let GridPos { row, col } = at;
        if sides.left != 0.0 {
            let gap = self.col_gap_mut(col);
            *gap = op(*gap, sides.left);
        }
        if sides.right != 0.0 {
            let gap = self.col_gap_mut(col + 1);
            *gap = op(*gap, sides.right);
        }
        if sides.top != 0.0 {
            let gap = self.row_gap_mut(row);
            *gap = op(*gap, sides.top);
        }
        if sides.bottom != 0.0 {
            let gap = self.row_gap_mut(row + 1);
            *gap = op(*gap, sides.bottom);
        }
    }

    /// Copy the packed column/row deltas to every cell
    fn broadcast(&mut self) {
        for row in 0..=self.rows {
            let dy = self.cell(row, 0).delta.dy;
            for col in 0..=self.cols {
                let dx = self.cell(0, col).delta.dx;
                self.cell_mut(row, col).delta = Delta { dx, dy };
            }
        }
    }

    /// Accumulate deltas into positions and return the total extent
    fn layout(&mut self, margin: f64) -> Size {
        let mut y = margin;
        let mut max_x = margin;
        for row in 0..=self.rows {
            y += self.cell(row, 0).delta.dy;
            let mut x = margin;
            for col in 0..=self.cols {
                x += self.cell(row, col).delta.dx;
                self.cell_mut(row, col).point = Point::new(x, y);
            }
            max_x = max_x.max(x);
        }
        Size::new(
            max_x + self.trailing.dx + margin,
            y + self.trailing.dy + margin,
        )
    }
}

/// Constraint sink handed to [`GraphicItem::constraints`]
pub struct Constrainer<'a> {
    grid: &'a mut Grid,
}

impl Constrainer<'_> {
    pub fn apply(&mut self, constraint: Constraint) {
        self.grid.apply(constraint);
    }

    pub fn floor(&mut self, at: GridPos, sides: Sides) {
        self.apply(Constraint::Floor { at, sides });
    }

    pub fn add(&mut self, at: GridPos, sides: Sides) {
        self.apply(Constraint::Add { at, sides });
    }

    pub fn span(&mut self, from: GridPos, to: GridPos, size: Size) {
        self.apply(Constraint::Span { from, to, size });
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }
}

/// Canvas handle plus read-only access to the resolved grid
pub struct DrawContext<'a> {
    pub canvas: &'a mut dyn Canvas,
    grid: &'a Grid,
}

impl<'a> DrawContext<'a> {
    pub fn new(canvas: &'a mut dyn Canvas, grid: &'a Grid) -> Self {
        Self { canvas, grid }
    }

    /// Resolved position of another grid point, for items spanning several cells
    pub fn point(&self, row: usize, col: usize) -> Point {
        self.grid.point(row, col)
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }
}

/// Something that can be placed on the grid
pub trait GraphicItem: fmt::Debug {
    /// Contribute spacing constraints for an item anchored at `at`
    fn constraints(&self, at: GridPos, constrainer: &mut Constrainer<'_>);

    /// Draw at the resolved anchor `point`
    fn draw(&self, ctx: &mut DrawContext<'_>, point: Point);
}

#[derive(Debug)]
struct Placed {
    at: GridPos,
    item: Box<dyn GraphicItem>,
}

/// A grid plus the items placed on it, in placement order
#[derive(Debug)]
pub struct Graphic {
    grid: Grid,
    items: Vec<Placed>,
    margin: f64,
    rejected: usize,
}

impl Graphic {
    pub fn new(rows: usize, cols: usize, margin: f64) -> Self {
        Self {
            grid: Grid::new(rows, cols),
            items: Vec::new(),
            margin,
            rejected: 0,
        }
    }

    /// Place an item; placement order is both constraint order and z-order
    pub fn put(
        &mut self,
        row: usize,
        col: usize,
        item: impl GraphicItem + 'static,
    ) -> Result<(), LayoutBoundsError> {
        let at = GridPos::new(row, col);
        if !self.grid.contains(at) {
            self.rejected += 1;
            return Err(LayoutBoundsError {
                row,
                col,
                rows: self.grid.rows(),
                cols: self.grid.cols(),
            });
        }
        self.items.push(Placed {
            at,
            item: Box::new(item),
        });
        Ok(())
    }

    /// Recompute every grid point from scratch and return the canvas size
    pub fn resolve(&mut self) -> Size {
        self.grid.clear();
        for placed in &self.items {
            let mut constrainer = Constrainer {
                grid: &mut self.grid,
            };
            placed.item.constraints(placed.at, &mut constrainer);
        }
        self.grid.broadcast();
        let size = self.grid.layout(self.margin);
        trace!(
            width = size.width,
            height = size.height,
            items = self.items.len(),
            "resolved grid"
        );
        size
    }

    /// Resolve, then draw every item in placement order
    pub fn draw(&mut self, canvas: &mut dyn Canvas) -> Size {
        let size = self.resolve();
        canvas.set_size(size);
        for placed in &self.items {
            let point = self.grid.point(placed.at.row, placed.at.col);
            let mut ctx = DrawContext::new(&mut *canvas, &self.grid);
            placed.item.draw(&mut ctx, point);
        }
        canvas.close();
        size
    }

    pub fn point(&self, row: usize, col: usize) -> Point {
        self.grid.point(row, col)
    }

    /// All resolved points, row-major
    pub fn points(&self) -> Vec<Point> {
        self.grid.cells.iter().map(|cell| cell.point).collect()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of `put` calls that fell outside the grid
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Issues fixed constraints regardless of its anchor
    #[derive(Debug)]
    struct Probe(Vec<Constraint>);

    impl Probe {
        fn floor(at: GridPos, sides: Sides) -> Self {
            Probe(vec![Constraint::Floor { at, sides }])
        }
    }

    impl GraphicItem for Probe {
        fn constraints(&self, _at: GridPos, c: &mut Constrainer<'_>) {
            for constraint in &self.0 {
                c.apply(*constraint);
            }
        }

        fn draw(&self, _ctx: &mut DrawContext<'_>, _point: Point) {}
    }

    #[test]
    fn test_floor_takes_maximum() {
        let at = GridPos::new(0, 1);
        let mut graphic = Graphic::new(1, 2, 0.0);
        graphic.put(0, 1, Probe::floor(at, Sides::horizontal(30.0, 0.0))).unwrap();
        graphic.put(0, 1, Probe::floor(at, Sides::horizontal(20.0, 0.0))).unwrap();
        graphic.resolve();
        assert_eq!(graphic.point(0, 1).x, 30.0);
    }

    #[test]
    fn test_add_accumulates() {
        let add = |left| {
            Probe(vec![Constraint::Add {
                at: GridPos::new(0, 1),
                sides: Sides::horizontal(left, 0.0),
            }])
        };
        let mut graphic = Graphic::new(0, 1, 0.0);
        graphic.put(0, 1, add(10.0)).unwrap();
        graphic.put(0, 1, add(15.0)).unwrap();
        graphic.resolve();
        assert_eq!(graphic.point(0, 1).x, 25.0);
    }

    #[test]
    fn test_span_distributes_deficit() {
        let span = Probe(vec![Constraint::Span {
            from: GridPos::new(0, 0),
            to: GridPos::new(0, 4),
            size: Size::new(100.0, 0.0),
        }]);
        let mut graphic = Graphic::new(0, 4, 0.0);
        graphic
            .put(0, 2, Probe::floor(GridPos::new(0, 2), Sides::horizontal(40.0, 0.0)))
            .unwrap();
        graphic.put(0, 0, span).unwrap();
        graphic.resolve();

        // 60 missing, 15 per gap on top of what is already there
        let xs: Vec<f64> = (0..=4).map(|c| graphic.point(0, c).x).collect();
        assert_eq!(xs, vec![0.0, 15.0, 70.0, 85.0, 100.0]);
    }

    #[test]
    fn test_span_already_satisfied() {
        let span = Probe(vec![Constraint::Span {
            from: GridPos::new(0, 0),
            to: GridPos::new(0, 1),
            size: Size::new(10.0, 0.0),
        }]);
        let mut graphic = Graphic::new(0, 1, 0.0);
        graphic
            .put(0, 1, Probe::floor(GridPos::new(0, 1), Sides::horizontal(50.0, 0.0)))
            .unwrap();
        graphic.put(0, 0, span).unwrap();
        graphic.resolve();
        assert_eq!(graphic.point(0, 1).x, 50.0);
    }

    #[test]
    fn test_right_and_bottom_of_last_use_trailing() {
        let mut graphic = Graphic::new(1, 1, 5.0);
        graphic
            .put(1, 1, Probe::floor(GridPos::new(1, 1), Sides::new(0.0, 12.0, 0.0, 8.0)))
            .unwrap();
        let size = graphic.resolve();
        assert_eq!(graphic.grid().trailing(), Delta { dx: 12.0, dy: 8.0 });
        assert_eq!(size, Size::new(5.0 + 12.0 + 5.0, 5.0 + 8.0 + 5.0));
    }

    #[test]
    fn test_deltas_broadcast_to_every_cell() {
        let mut graphic = Graphic::new(2, 2, 0.0);
        graphic
            .put(2, 1, Probe::floor(GridPos::new(2, 1), Sides::new(7.0, 0.0, 3.0, 0.0)))
            .unwrap();
        graphic.resolve();
        for row in 0..=2 {
            assert_eq!(graphic.point(row, 1).x, 7.0);
            assert_eq!(graphic.grid().delta(row, 1).dx, 7.0);
        }
        for col in 0..=2 {
            assert_eq!(graphic.point(2, col).y, 3.0);
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut graphic = Graphic::new(1, 2, 10.0);
        graphic
            .put(1, 1, Probe::floor(GridPos::new(1, 1), Sides::new(5.0, 5.0, 9.0, 1.0)))
            .unwrap();
        let first = graphic.resolve();
        let points = graphic.points();
        assert_eq!(graphic.resolve(), first);
        assert_eq!(graphic.points(), points);
    }

    #[test]
    fn test_out_of_bounds_put_is_rejected() {
        let mut graphic = Graphic::new(1, 1, 0.0);
        let err = graphic
            .put(2, 0, Probe(Vec::new()))
            .unwrap_err();
        assert_eq!(
            err,
            LayoutBoundsError {
                row: 2,
                col: 0,
                rows: 1,
                cols: 1
            }
        );
        assert_eq!(graphic.rejected(), 1);
        assert!(graphic.is_empty());
    }

    #[test]
    fn test_point_lookup_is_clamped() {
        let mut graphic = Graphic::new(0, 0, 4.0);
        graphic.resolve();
        assert_eq!(graphic.point(9, 9), Point::new(4.0, 4.0));
    }
}
