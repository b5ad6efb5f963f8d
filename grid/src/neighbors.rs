//! Eight-neighbour iteration over row-major grids.

/// Row-major indices of the up to eight cells surrounding `index`.
///
/// Neighbours outside the grid are skipped rather than wrapped. Indices are
/// yielded column by column: `dx` is the outer loop and `dy` the inner one,
/// so the sequence for an interior cell is
/// `(-1,-1) (-1,0) (-1,1) (0,-1) (0,1) (1,-1) (1,0) (1,1)`.
/// Stages that draw randomness per neighbour depend on this order.
pub fn neighbors(index: usize, width: usize, height: usize) -> impl Iterator<Item = usize> {
    let mut candidates = [None; 8];
    let mut count = 0;

    if width != 0 {
        let column = index % width;
        let row = index / width;

        for dx in [-1isize, 0, 1] {
            let Some(x) = column.checked_add_signed(dx).filter(|x| *x < width) else {
                continue;
            };
            for dy in [-1isize, 0, 1] {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let Some(y) = row.checked_add_signed(dy).filter(|y| *y < height) else {
                    continue;
                };
                candidates[count] = Some(y * width + x);
                count += 1;
            }
        }
    }

    candidates.into_iter().take(count).flatten()
}
