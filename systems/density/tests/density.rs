use splat_core::{RandomStream, SeededStream, Specs};
use splat_system_density::DensityField;

#[test]
fn full_density_occupies_every_cell() {
    let field = DensityField::new(0.5, 0.5, 1.0, 1.0);
    let grid = field.sample(8, 8, &mut SeededStream::new(1));
    assert_eq!(grid.occupied_count(), 64);
}

#[test]
fn zero_density_leaves_grid_empty() {
    let field = DensityField::new(0.5, 0.5, 0.0, 0.0);
    let grid = field.sample(16, 16, &mut SeededStream::new(2));
    assert_eq!(grid.occupied_count(), 0);
}

#[test]
fn consumes_one_draw_per_cell() {
    let field = DensityField::from_specs(&Specs::default());
    let mut sampled = SeededStream::new(77);
    let _ = field.sample(5, 3, &mut sampled);

    let mut skipped = SeededStream::new(77);
    for _ in 0..15 {
        let _ = skipped.next_unit();
    }

    assert_eq!(sampled.next_word(), skipped.next_word());
}

#[test]
fn sampling_is_deterministic_for_a_seed() {
    let field = DensityField::new(0.3, 0.7, 0.1, 0.9);
    let first = field.sample(12, 9, &mut SeededStream::new(0xabc));
    let second = field.sample(12, 9, &mut SeededStream::new(0xabc));
    assert_eq!(first, second);
}

#[test]
fn centre_fills_more_often_than_edges() {
    let field = DensityField::new(0.5, 0.5, 0.0, 1.0);
    let mut rng = SeededStream::new(5);
    let mut centre = 0;
    let mut corner = 0;
    for _ in 0..200 {
        let grid = field.sample(9, 9, &mut rng);
        centre += usize::from(grid.is_occupied(4, 4));
        corner += usize::from(grid.is_occupied(0, 0));
    }
    assert!(centre > corner, "centre {centre} corner {corner}");
}
