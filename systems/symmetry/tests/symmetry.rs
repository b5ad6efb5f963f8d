use splat_core::{RandomStream, SeededStream};
use splat_grid::PixelGrid;
use splat_system_symmetry::MirrorFlags;

fn numbered(width: u32, height: u32) -> PixelGrid {
    let pixels = (1..=width * height).collect();
    PixelGrid::from_pixels(width, height, pixels).expect("grid dimensions")
}

fn flags(x: bool, y: bool, positive: bool, negative: bool) -> MirrorFlags {
    MirrorFlags {
        x,
        y,
        positive,
        negative,
    }
}

#[test]
fn x_mirror_makes_rows_palindromic() {
    for width in [1, 4, 5] {
        let mut grid = numbered(width, 3);
        flags(true, false, false, false).apply(&mut grid);
        for y in 0..3 {
            for x in 0..width {
                assert_eq!(grid.pixel(x, y), grid.pixel(width - 1 - x, y));
            }
        }
    }
}

#[test]
fn y_mirror_copies_top_rows_down() {
    let mut grid = numbered(3, 5);
    flags(false, true, false, false).apply(&mut grid);
    for y in 0..5 {
        assert_eq!(grid.row(y), grid.row(4 - y));
    }
    assert_eq!(grid.row(2), &[7, 8, 9], "middle row is untouched");
}

#[test]
fn positive_diagonal_copies_lower_triangle() {
    let mut grid = numbered(4, 4);
    flags(false, false, true, false).apply(&mut grid);
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(grid.pixel(x, y), grid.pixel(y, x));
        }
    }
    assert_eq!(grid.pixel(0, 1), 5, "lower triangle is the source");
}

#[test]
fn negative_diagonal_reflects_across_anti_diagonal() {
    let mut grid = numbered(3, 3);
    flags(false, false, false, true).apply(&mut grid);
    for y in 0..3 {
        for x in 0..3 {
            assert_eq!(grid.pixel(x, y), grid.pixel(2 - y, 2 - x));
        }
    }
}

#[test]
fn diagonal_mirrors_skip_non_square_grids() {
    let mut grid = numbered(4, 3);
    let before = grid.clone();
    flags(false, false, true, true).apply(&mut grid);
    assert_eq!(grid, before);
}

#[test]
fn mirrors_apply_in_fixed_order() {
    let mut combined = numbered(2, 2);
    flags(true, false, true, false).apply(&mut combined);
    assert_eq!(combined.pixels(), &[1, 3, 3, 3]);

    let mut reversed = numbered(2, 2);
    flags(false, false, true, false).apply(&mut reversed);
    flags(true, false, false, false).apply(&mut reversed);
    assert_eq!(reversed.pixels(), &[1, 1, 3, 3]);
}

#[test]
fn draw_consumes_four_floats() {
    let mut drawn = SeededStream::new(31);
    let probabilities = splat_system_symmetry::MirrorProbabilities {
        x: 0.5,
        y: 0.5,
        positive: 0.5,
        negative: 0.5,
    };
    let _ = MirrorFlags::draw(probabilities, &mut drawn);

    let mut skipped = SeededStream::new(31);
    for _ in 0..4 {
        let _ = skipped.next_unit();
    }
    assert_eq!(drawn.next_word(), skipped.next_word());
}
