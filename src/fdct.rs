/*
 * Ported from libjpeg jfdctflt.c to rust
 *
 * This file was part of the Independent JPEG Group's software:
 * Copyright (C) 1991-1996, Thomas G. Lane.
 * libjpeg-turbo Modifications:
 * Copyright (C) 2015, 2020, D. R. Commander.
 *
 * Conditions of distribution and use:
 * In plain English:
 *
 * 1. We don't promise that this software works.  (But if you find any bugs,
 *    please let us know!)
 * 2. You can use this software for whatever you want.  You don't have to pay us.
 * 3. You may not pretend that you wrote this software.  If you use it in a
 *    program, you must acknowledge somewhere in your documentation that
 *    you've used the IJG code.
 *
 * In legalese:
 *
 * The authors make NO WARRANTY or representation, either express or implied,
 * with respect to this software, its quality, accuracy, merchantability, or
 * fitness for a particular purpose.  This software is provided "AS IS", and you,
 * its user, assume the entire risk as to its quality and accuracy.
 *
 * This software is copyright (C) 1991-2020, Thomas G. Lane, Guido Vollbeding.
 * All Rights Reserved except as specified below.
 *
 * Permission is hereby granted to use, copy, modify, and distribute this
 * software (or portions thereof) for any purpose, without fee, subject to these
 * conditions:
 * (1) If any part of the source code for this software is distributed, then this
 * README file must be included, with this copyright and no-warranty notice
 * unaltered; and any additions, deletions, or changes to the original files
 * must be clearly indicated in accompanying documentation.
 * (2) If only executable code is distributed, then the accompanying
 * documentation must state that "this software is based in part on the work of
 * the Independent JPEG Group".
 * (3) Permission for use of this software is granted only if the user accepts
 * full responsibility for any undesirable consequences; the authors accept
 * NO LIABILITY for damages of any kind.
 *
 * These conditions apply to any software derived from or based on the IJG code,
 * not just to the unmodified library.  If you use our work, you ought to
 * acknowledge us.
 *
 * Permission is NOT granted for the use of any IJG author's name or company name
 * in advertising or publicity relating to this software or products derived from
 * it.  This software may be referred to only as "the Independent JPEG Group's
 * software".
 *
 * We specifically permit and encourage the use of this software as the basis of
 * commercial products, provided that all warranty or liability claims are
 * assumed by the product vendor.
 *
 * This file contains a floating-point implementation of the
 * forward DCT (Discrete Cosine Transform).
 *
 * This implementation should be more accurate than either of the integer
 * DCT implementations.  However, it may not give the same results on all
 * machines because of differences in roundoff behavior.  Speed will depend
 * on the hardware's floating point capacity.
 *
 * A 2-D DCT can be done by 1-D DCT on each row followed by 1-D DCT
 * on each column.  Direct algorithms are also available, but they are
 * much more complex and seem not to be any faster when reduced to code.
 *
 * This implementation is based on Arai, Agui, and Nakajima's algorithm for
 * scaled DCT.  Their original paper (Trans. IEICE E-71(11):1095) is in
 * Japanese, but the algorithm is described in the Pennebaker & Mitchell
 * JPEG textbook (see REFERENCES section in file README.ijg).  The following
 * code is based directly on figure 4-8 in P&M.
 * While an 8-point DCT cannot be done in less than 11 multiplies, it is
 * possible to arrange the computation so that many of the multiplies are
 * simple scalings of the final outputs.  These multiplies can then be
 * folded into the multiplications or divisions by the JPEG quantization
 * table entries.  The AA&N method leaves only 5 multiplies and 29 adds
 * to be done in the DCT itself.
 * The primary disadvantage of this method is that with a fixed-point
 * implementation, accuracy is lost due to imprecise representation of the
 * scaled quantization values.  However, that problem does not arise if
 * we use floating point arithmetic.
 */

const DCT_SIZE: usize = 8;
const CENTER: f32 = 128.0;

const FIX_0_382683433: f32 = 0.382683433;
const FIX_0_541196100: f32 = 0.541196100;
const FIX_0_707106781: f32 = 0.707106781;
const FIX_1_306562965: f32 = 1.306562965;

/// One 8 point AAN butterfly over `data[offset + stride * k]` for k in 0..8
#[inline(always)]
fn fdct_1d(data: &mut [f32; 64], offset: usize, stride: usize) {
    let at = |k: usize| offset + stride * k;

    let tmp0 = data[at(0)] + data[at(7)];
    let tmp7 = data[at(0)] - data[at(7)];
    let tmp1 = data[at(1)] + data[at(6)];
    let tmp6 = data[at(1)] - data[at(6)];
    let tmp2 = data[at(2)] + data[at(5)];
    let tmp5 = data[at(2)] - data[at(5)];
    let tmp3 = data[at(3)] + data[at(4)];
    let tmp4 = data[at(3)] - data[at(4)];

    /* Even part */

    let tmp10 = tmp0 + tmp3; /* phase 2 */
    let tmp13 = tmp0 - tmp3;
    let tmp11 = tmp1 + tmp2;
    let tmp12 = tmp1 - tmp2;

    data[at(0)] = tmp10 + tmp11; /* phase 3 */
    data[at(4)] = tmp10 - tmp11;

    let z1 = (tmp12 + tmp13) * FIX_0_707106781; /* c4 */
    data[at(2)] = tmp13 + z1; /* phase 5 */
    data[at(6)] = tmp13 - z1;

    /* Odd part */

    let tmp10 = tmp4 + tmp5; /* phase 2 */
    let tmp11 = tmp5 + tmp6;
    let tmp12 = tmp6 + tmp7;

    /* The rotator is modified from fig 4-8 to avoid extra negations. */
    let z5 = (tmp10 - tmp12) * FIX_0_382683433; /* c6 */
    let z2 = FIX_0_541196100 * tmp10 + z5; /* c2-c6 */
    let z4 = FIX_1_306562965 * tmp12 + z5; /* c2+c6 */
    let z3 = tmp11 * FIX_0_707106781; /* c4 */

    let z11 = tmp7 + z3; /* phase 5 */
    let z13 = tmp7 - z3;

    data[at(5)] = z13 + z2; /* phase 6 */
    data[at(3)] = z13 - z2;
    data[at(1)] = z11 + z4;
    data[at(7)] = z11 - z4;
}

/// In place AAN DCT of an already level shifted block
///
/// The result is scaled up by `8 * AAN_SCALE_FACTOR[row] * AAN_SCALE_FACTOR[col]`
/// compared to a true DCT. The quantization divisors remove that factor.
pub fn fdct_float(data: &mut [f32; 64]) {
    /* Pass 1: process rows. */
    for y in 0..DCT_SIZE {
        fdct_1d(data, y * DCT_SIZE, 1);
    }

    /* Pass 2: process columns. */
    for x in 0..DCT_SIZE {
        fdct_1d(data, x, DCT_SIZE);
    }
}

/// Level shifts 64 samples in pixel domain (0..=255) and transforms them
pub fn forward_dct(samples: &[f32; 64]) -> [f32; 64] {
    let mut data = [0f32; 64];
    for (out, &sample) in data.iter_mut().zip(samples.iter()) {
        *out = sample - CENTER;
    }

    fdct_float(&mut data);
    data
}

/// Rounds half away from zero, e.g. 2.5 -> 3 and -2.5 -> -3
#[inline(always)]
fn round_half_away_from_zero(value: f64) -> i32 {
    let truncated = value as i32;
    // Exact for every value an i32 can hold, so no half-ULP carry as with `value + 0.5`
    let fraction = value - f64::from(truncated);

    if fraction >= 0.5 {
        truncated.saturating_add(1)
    } else if fraction <= -0.5 {
        truncated.saturating_sub(1)
    } else {
        truncated
    }
}

/// Quantizes DCT output with the reciprocal divisors of a
/// [QuantizationTable](crate::QuantizationTable). Natural order in and out.
pub fn quantize_block(coefficients: &[f32; 64], divisors: &[f64; 64]) -> [i32; 64] {
    let mut out = [0i32; 64];
    for i in 0..64 {
        out[i] = round_half_away_from_zero(f64::from(coefficients[i]) * divisors[i]);
    }
    out
}
