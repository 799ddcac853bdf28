/// Walk along a half-line in fixed sub-pixel increments, yielding each integer
/// cell the walk enters.
///
/// The walk starts at the center of `start` and the starting cell itself is not
/// yielded. Cells are signed, as the walk may leave the image: bounds are the
/// caller's business. A diagonal increment may enter a cell that only shares a
/// corner with the previous one.
pub struct CellWalk {
    /// The current sub-pixel position.
    pos: (f32, f32),
    /// The cell containing `pos`.
    cell: (i64, i64),
    inc: (f32, f32),
    /// Increments left before the walk gives up.
    remaining: usize,
}

impl CellWalk {
    /// `direction` is expected to be a unit vector, so that `max_steps * step`
    /// bounds the distance travelled.
    pub fn new(start: (u32, u32), direction: (f32, f32), step: f32, max_steps: usize) -> Self {
        debug_assert!(step > 0.);
        CellWalk {
            pos: (start.0 as f32 + 0.5, start.1 as f32 + 0.5),
            cell: (start.0 as i64, start.1 as i64),
            inc: (direction.0 * step, direction.1 * step),
            remaining: max_steps,
        }
    }

    /// Number of increments needed to travel `distance` with increments of `step`.
    pub fn steps_for(distance: f32, step: f32) -> usize {
        (distance / step).ceil() as usize + 1
    }
}

impl Iterator for CellWalk {
    type Item = (i64, i64);
    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            self.remaining -= 1;
            self.pos.0 += self.inc.0;
            self.pos.1 += self.inc.1;
            let cell = (self.pos.0.floor() as i64, self.pos.1.floor() as i64);
            if cell != self.cell {
                self.cell = cell;
                return Some(cell);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_walk_visits_every_cell() {
        let cells: Vec<_> = CellWalk::new((2, 3), (1., 0.), 0.05, 1000).take(4).collect();
        assert_eq!(cells, vec![(3, 3), (4, 3), (5, 3), (6, 3)]);
    }

    #[test]
    fn walk_may_go_negative() {
        let cells: Vec<_> = CellWalk::new((1, 0), (-1., 0.), 0.05, 1000).take(2).collect();
        assert_eq!(cells, vec![(0, 0), (-1, 0)]);
    }

    #[test]
    fn walk_stops_after_budget() {
        // 0.5 to leave the first cell, then one cell per 1.0.
        let steps = CellWalk::steps_for(2.5, 0.1);
        let cells: Vec<_> = CellWalk::new((0, 0), (0., 1.), 0.1, steps).collect();
        assert!(cells.len() >= 2 && cells.len() <= 3, "{:?}", cells);
        assert!(cells.iter().all(|&(x, _)| x == 0));
    }

    #[test]
    fn null_direction_never_moves() {
        assert_eq!(CellWalk::new((4, 4), (0., 0.), 0.05, 100).next(), None);
    }
}
