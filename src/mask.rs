use std::ops::Deref;

use crate::error::{QrError, QrResult};
use crate::matrix::Matrix;
use crate::metadata::Color;

// Mask pattern
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QrResult<Self> {
        if pattern < 8 {
            Ok(Self(pattern))
        } else {
            Err(QrError::InvalidMaskPattern)
        }
    }

    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        match self.0 {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid pattern"),
        }
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

// Mask evaluation
//------------------------------------------------------------------------------

pub fn apply_best_mask(mat: &mut Matrix) -> MaskPattern {
    let best_mask = (0..8)
        .min_by_key(|m| {
            let mut mat = mat.clone();
            mat.apply_mask(MaskPattern(*m));
            compute_total_penalty(&mat)
        })
        .expect("Should return atleast 1 mask");
    let best_mask = MaskPattern(best_mask);
    mat.apply_mask(best_mask);
    best_mask
}

pub fn compute_total_penalty(mat: &Matrix) -> u32 {
    let adj_pen_h = compute_adjacent_penalty(mat, true);
    let adj_pen_v = compute_adjacent_penalty(mat, false);
    let blk_pen = compute_block_penalty(mat);
    let fp_pen_h = compute_finder_pattern_penalty(mat, true);
    let fp_pen_v = compute_finder_pattern_penalty(mat, false);
    let bal_pen = compute_balance_penalty(mat);
    adj_pen_h + adj_pen_v + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

// 3 points for a same colored run of 5, 1 more for every added module
fn compute_adjacent_penalty(mat: &Matrix, is_hor: bool) -> u32 {
    let mut pen = 0;
    let w = mat.width() as i16;
    for i in 0..w {
        let mut run_clr = None;
        let mut run_len = 0u32;
        for j in 0..w {
            let clr = if is_hor { *mat.get(i, j) } else { *mat.get(j, i) };
            if Some(clr) == run_clr {
                run_len += 1;
                if run_len == 5 {
                    pen += 3;
                } else if run_len > 5 {
                    pen += 1;
                }
            } else {
                run_clr = Some(clr);
                run_len = 1;
            }
        }
    }
    pen
}

// 3 points for every same colored 2x2 block, overlaps included
fn compute_block_penalty(mat: &Matrix) -> u32 {
    let mut pen = 0;
    let w = mat.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *mat.get(r, c);
            if clr == *mat.get(r + 1, c)
                && clr == *mat.get(r, c + 1)
                && clr == *mat.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

const FINDER_QZ_BEFORE: [Color; 11] = {
    use Color::{Dark as D, Light as L};
    [L, L, L, L, D, L, D, D, D, L, D]
};

const FINDER_QZ_AFTER: [Color; 11] = {
    use Color::{Dark as D, Light as L};
    [D, L, D, D, D, L, D, L, L, L, L]
};

// 40 points for every 1:1:3:1:1 finder-like run with 4 light modules on
// either side. Lines are extended with 4 virtual light modules at both ends
// so runs at the edge count, matching how scanners see the quiet zone.
fn compute_finder_pattern_penalty(mat: &Matrix, is_hor: bool) -> u32 {
    let mut pen = 0;
    let w = mat.width() as i16;
    let mut line = Vec::with_capacity(w as usize + 8);
    for i in 0..w {
        line.clear();
        line.extend([Color::Light; 4]);
        for j in 0..w {
            line.push(if is_hor { *mat.get(i, j) } else { *mat.get(j, i) });
        }
        line.extend([Color::Light; 4]);
        for win in line.windows(11) {
            if win == FINDER_QZ_BEFORE.as_slice() || win == FINDER_QZ_AFTER.as_slice() {
                pen += 40;
            }
        }
    }
    pen
}

// 10 points per 5% step the dark module ratio deviates from 50%. The side
// length is odd, so the ratio can never land exactly on half.
fn compute_balance_penalty(mat: &Matrix) -> u32 {
    let dark = mat.count_dark_modules();
    let total = mat.width() * mat.width();
    let k = ((dark * 20).abs_diff(total * 10) + total - 1) / total - 1;
    (k * 10) as u32
}
