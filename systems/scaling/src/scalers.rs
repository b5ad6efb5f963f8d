//! Built-in pixel-art scalers.
//!
//! Every scaler reads the 3x3 neighbourhood around each source pixel,
//! clamping at the border, and writes a `ratio` by `ratio` block:
//!
//! ```text
//! A B C
//! D E F
//! G H I
//! ```

use splat_grid::PixelGrid;

use crate::Scaler;

#[derive(Clone, Copy)]
struct Window {
    a: u32,
    b: u32,
    c: u32,
    d: u32,
    e: u32,
    f: u32,
    g: u32,
    h: u32,
    i: u32,
}

impl Window {
    fn around(grid: &PixelGrid, x: i64, y: i64) -> Self {
        Self {
            a: grid.clamped_pixel(x - 1, y - 1),
            b: grid.clamped_pixel(x, y - 1),
            c: grid.clamped_pixel(x + 1, y - 1),
            d: grid.clamped_pixel(x - 1, y),
            e: grid.clamped_pixel(x, y),
            f: grid.clamped_pixel(x + 1, y),
            g: grid.clamped_pixel(x - 1, y + 1),
            h: grid.clamped_pixel(x, y + 1),
            i: grid.clamped_pixel(x + 1, y + 1),
        }
    }
}

/// Expands every source pixel into a `ratio` by `ratio` block produced by
/// `block`, which fills its slice row-major.
fn expand(grid: &PixelGrid, ratio: u32, block: impl Fn(Window, &mut [u32])) -> PixelGrid {
    let width = grid.width() * ratio;
    let height = grid.height() * ratio;
    let mut scaled = PixelGrid::new(width, height);
    let side = ratio as usize;
    let mut cells = vec![0; side * side];

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            block(
                Window::around(grid, i64::from(x), i64::from(y)),
                &mut cells,
            );
            for (offset, pixel) in cells.iter().enumerate() {
                let dx = (offset % side) as u32;
                let dy = (offset / side) as u32;
                scaled.set_pixel(x * ratio + dx, y * ratio + dy, *pixel);
            }
        }
    }
    scaled
}

/// Plain pixel duplication at 2x.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestNeighbor;

impl Scaler for NearestNeighbor {
    fn ratio(&self) -> u32 {
        2
    }

    fn scale(&self, grid: &PixelGrid) -> PixelGrid {
        expand(grid, 2, |window, out| out.fill(window.e))
    }
}

/// EPX / AdvMAME2x edge-directed scaler.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scale2x;

impl Scaler for Scale2x {
    fn ratio(&self) -> u32 {
        2
    }

    fn scale(&self, grid: &PixelGrid) -> PixelGrid {
        expand(grid, 2, |w, out| {
            out[0] = if w.d == w.b && w.b != w.f && w.d != w.h {
                w.d
            } else {
                w.e
            };
            out[1] = if w.b == w.f && w.b != w.d && w.f != w.h {
                w.f
            } else {
                w.e
            };
            out[2] = if w.d == w.h && w.d != w.b && w.h != w.f {
                w.d
            } else {
                w.e
            };
            out[3] = if w.h == w.f && w.d != w.h && w.b != w.f {
                w.f
            } else {
                w.e
            };
        })
    }
}

/// AdvMAME3x edge-directed scaler.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scale3x;

impl Scaler for Scale3x {
    fn ratio(&self) -> u32 {
        3
    }

    fn scale(&self, grid: &PixelGrid) -> PixelGrid {
        expand(grid, 3, |w, out| {
            out.fill(w.e);
            if w.b == w.h || w.d == w.f {
                return;
            }
            let pick = |condition: bool, color: u32| if condition { color } else { w.e };

            out[0] = pick(w.d == w.b, w.d);
            out[1] = pick(
                (w.d == w.b && w.e != w.c) || (w.b == w.f && w.e != w.a),
                w.b,
            );
            out[2] = pick(w.b == w.f, w.f);
            out[3] = pick(
                (w.d == w.b && w.e != w.g) || (w.d == w.h && w.e != w.a),
                w.d,
            );
            out[5] = pick(
                (w.b == w.f && w.e != w.i) || (w.h == w.f && w.e != w.c),
                w.f,
            );
            out[6] = pick(w.d == w.h, w.d);
            out[7] = pick(
                (w.d == w.h && w.e != w.i) || (w.h == w.f && w.e != w.g),
                w.h,
            );
            out[8] = pick(w.h == w.f, w.f);
        })
    }
}

/// Eagle scaler at 2x: each corner takes the diagonal neighbour when the
/// three pixels around that corner agree.
#[derive(Clone, Copy, Debug, Default)]
pub struct Eagle2x;

impl Scaler for Eagle2x {
    fn ratio(&self) -> u32 {
        2
    }

    fn scale(&self, grid: &PixelGrid) -> PixelGrid {
        expand(grid, 2, |w, out| {
            let corners = eagle_corners(w);
            out.copy_from_slice(&corners);
        })
    }
}

/// Eagle scaler at 3x: corners follow [`Eagle2x`]; edge centres take the
/// facing neighbour when the three pixels along that side agree.
#[derive(Clone, Copy, Debug, Default)]
pub struct Eagle3x;

impl Scaler for Eagle3x {
    fn ratio(&self) -> u32 {
        3
    }

    fn scale(&self, grid: &PixelGrid) -> PixelGrid {
        expand(grid, 3, |w, out| {
            let [top_left, top_right, bottom_left, bottom_right] = eagle_corners(w);
            let side = |p: u32, q: u32, r: u32| if p == q && q == r { q } else { w.e };

            out[0] = top_left;
            out[1] = side(w.a, w.b, w.c);
            out[2] = top_right;
            out[3] = side(w.a, w.d, w.g);
            out[4] = w.e;
            out[5] = side(w.c, w.f, w.i);
            out[6] = bottom_left;
            out[7] = side(w.g, w.h, w.i);
            out[8] = bottom_right;
        })
    }
}

fn eagle_corners(w: Window) -> [u32; 4] {
    let corner = |p: u32, q: u32, r: u32| if p == q && q == r { q } else { w.e };
    [
        corner(w.d, w.a, w.b),
        corner(w.b, w.c, w.f),
        corner(w.d, w.g, w.h),
        corner(w.f, w.i, w.h),
    ]
}
