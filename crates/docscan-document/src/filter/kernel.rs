// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-pixel scan-look transforms over an interleaved RGBA buffer.
//
// Every transform touches only R, G, and B of one pixel at a time; alpha is
// never read or written, and no pixel depends on its neighbours.

use docscan_core::FilterMode;
use rayon::prelude::*;

/// ITU-R BT.709 luma coefficients.
pub const LUMA_R: f64 = 0.2126;
pub const LUMA_G: f64 = 0.7152;
pub const LUMA_B: f64 = 0.0722;

/// Luma above this becomes white in black/white mode.
pub const BW_THRESHOLD: f64 = 128.0;

/// Contrast factor used by the "magic" filter.
pub const MAGIC_CONTRAST: f64 = 1.2;

/// Gamma used by the "lighten" filter.
pub const LIGHTEN_GAMMA: f64 = 1.4;

/// Round to nearest (ties to even) and clamp into a channel value.
#[inline]
pub fn to_channel(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}

/// BT.709 luma of an RGB triple, unrounded.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    LUMA_R * r as f64 + LUMA_G * g as f64 + LUMA_B * b as f64
}

/// Hard threshold of a luma value: 255 strictly above [`BW_THRESHOLD`], else 0.
#[inline]
pub fn threshold(luma: f64) -> u8 {
    if luma > BW_THRESHOLD { 255 } else { 0 }
}

/// Linear contrast stretch around mid-grey (128 is a fixed point).
#[inline]
pub fn contrast(channel: u8, factor: f64) -> u8 {
    let intercept = 128.0 * (1.0 - factor);
    to_channel(channel as f64 * factor + intercept)
}

/// Gamma brightening: `255 * (c / 255) ^ (1 / gamma)`.
#[inline]
pub fn gamma_lighten(channel: u8, gamma: f64) -> u8 {
    to_channel(255.0 * (channel as f64 / 255.0).powf(1.0 / gamma))
}

/// A resolved per-pixel transform.
///
/// Channel-independent modes are precomputed into a 256-entry lookup table so
/// the hot loop is a single index per channel.
#[derive(Debug, Clone)]
pub enum PixelTransform {
    Grayscale,
    Threshold,
    Channel(Box<[u8; 256]>),
}

impl PixelTransform {
    /// Resolve the transform for `mode`; `None` for the identity mode.
    pub fn for_mode(mode: FilterMode) -> Option<Self> {
        match mode {
            FilterMode::Original => None,
            FilterMode::Grayscale => Some(Self::Grayscale),
            FilterMode::Bw => Some(Self::Threshold),
            FilterMode::Magic => Some(Self::channel_table(|c| contrast(c, MAGIC_CONTRAST))),
            FilterMode::Lighten => {
                Some(Self::channel_table(|c| gamma_lighten(c, LIGHTEN_GAMMA)))
            }
        }
    }

    fn channel_table(f: impl Fn(u8) -> u8) -> Self {
        let mut table = Box::new([0u8; 256]);
        for (value, slot) in table.iter_mut().enumerate() {
            *slot = f(value as u8);
        }
        Self::Channel(table)
    }

    /// Transform one RGBA pixel in place. `pixel[3]` is left alone.
    #[inline]
    pub fn apply(&self, pixel: &mut [u8]) {
        match self {
            Self::Grayscale => {
                let v = to_channel(luma(pixel[0], pixel[1], pixel[2]));
                pixel[..3].fill(v);
            }
            Self::Threshold => {
                let v = threshold(luma(pixel[0], pixel[1], pixel[2]));
                pixel[..3].fill(v);
            }
            Self::Channel(table) => {
                for channel in &mut pixel[..3] {
                    *channel = table[*channel as usize];
                }
            }
        }
    }
}

/// Apply `mode` to an RGBA buffer in place.
///
/// Buffers holding at least `parallel_threshold` pixels are processed across
/// the rayon pool; the output is identical either way.
pub fn apply_in_place(buffer: &mut [u8], mode: FilterMode, parallel_threshold: usize) {
    debug_assert_eq!(buffer.len() % 4, 0, "RGBA buffer length must be a multiple of 4");

    let Some(transform) = PixelTransform::for_mode(mode) else {
        return;
    };

    if buffer.len() / 4 >= parallel_threshold {
        buffer
            .par_chunks_exact_mut(4)
            .for_each(|pixel| transform.apply(pixel));
    } else {
        buffer
            .chunks_exact_mut(4)
            .for_each(|pixel| transform.apply(pixel));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filtered(pixels: &[[u8; 4]], mode: FilterMode) -> Vec<[u8; 4]> {
        let mut buffer: Vec<u8> = pixels.iter().flatten().copied().collect();
        apply_in_place(&mut buffer, mode, usize::MAX);
        buffer
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
            .collect()
    }

    #[test]
    fn red_becomes_bt709_gray() {
        let out = filtered(&[[255, 0, 0, 255]; 4], FilterMode::Grayscale);
        assert!(out.iter().all(|p| *p == [54, 54, 54, 255]), "got {out:?}");
    }

    #[test]
    fn grayscale_sets_all_channels_to_rounded_luma() {
        let input = [[12, 200, 90, 255], [255, 255, 0, 3], [1, 2, 3, 0]];
        for (src, out) in input.iter().zip(filtered(&input, FilterMode::Grayscale)) {
            let expected = (0.2126 * src[0] as f64 + 0.7152 * src[1] as f64
                + 0.0722 * src[2] as f64)
                .round_ties_even() as u8;
            assert_eq!(out, [expected, expected, expected, src[3]]);
        }
    }

    #[test]
    fn grayscale_rounds_half_levels_to_even() {
        // 0.7152 * 14 + 0.0722 * 76 lands on the 15/16 boundary.
        let out = filtered(&[[0, 14, 76, 255]], FilterMode::Grayscale);
        assert_eq!(out, vec![[15, 15, 15, 255]]);
        assert_eq!(to_channel(2.5), 2);
        assert_eq!(to_channel(3.5), 4);
        assert_eq!(to_channel(-0.5), 0);
        assert_eq!(to_channel(300.0), 255);
    }

    #[test]
    fn light_gray_thresholds_to_white() {
        let out = filtered(&[[200, 200, 200, 255]], FilterMode::Bw);
        assert_eq!(out, vec![[255, 255, 255, 255]]);
    }

    #[test]
    fn bw_splits_around_mid_gray() {
        assert_eq!(threshold(128.0), 0);
        assert_eq!(threshold(128.01), 255);
        // Pure grey keeps its value as luma (coefficients sum to one).
        let out = filtered(&[[127, 127, 127, 255], [129, 129, 129, 255]], FilterMode::Bw);
        assert_eq!(out, vec![[0, 0, 0, 255], [255, 255, 255, 255]]);
    }

    #[test]
    fn bw_output_is_binary() {
        let input: Vec<[u8; 4]> = (0..=255u8)
            .map(|v| [v, v.wrapping_mul(7), 255 - v, 200])
            .collect();
        for (src, out) in input.iter().zip(filtered(&input, FilterMode::Bw)) {
            let v = out[0];
            assert!(v == 0 || v == 255);
            assert_eq!(out[..3], [v, v, v]);
            assert_eq!(v == 255, luma(src[0], src[1], src[2]) > 128.0);
        }
    }

    #[test]
    fn magic_fixes_mid_gray_and_clamps_extremes() {
        assert_eq!(contrast(128, MAGIC_CONTRAST), 128);
        assert_eq!(contrast(0, MAGIC_CONTRAST), 0);
        assert_eq!(contrast(255, MAGIC_CONTRAST), 255);
        assert_eq!(contrast(238, MAGIC_CONTRAST), 255);
        assert_eq!(contrast(100, MAGIC_CONTRAST), 94);
        assert_eq!(contrast(200, MAGIC_CONTRAST), 214);
    }

    #[test]
    fn lighten_brightens_midtones_only() {
        assert_eq!(gamma_lighten(0, LIGHTEN_GAMMA), 0);
        assert_eq!(gamma_lighten(255, LIGHTEN_GAMMA), 255);
        for c in 1..255u8 {
            assert!(gamma_lighten(c, LIGHTEN_GAMMA) >= c, "channel {c} darkened");
        }
        assert!(gamma_lighten(128, LIGHTEN_GAMMA) > 128);
    }

    #[test]
    fn higher_gamma_is_brighter() {
        for c in [16u8, 64, 128, 200] {
            let low = 255.0 * (c as f64 / 255.0).powf(1.0 / 1.2);
            let high = 255.0 * (c as f64 / 255.0).powf(1.0 / 1.8);
            assert!(high > low, "gamma did not brighten channel {c}");
            assert!(gamma_lighten(c, 1.8) >= gamma_lighten(c, 1.2));
        }
    }

    #[test]
    fn alpha_untouched_by_every_mode() {
        let input = [[10, 20, 30, 0], [200, 150, 100, 77], [255, 255, 255, 254]];
        for mode in FilterMode::ALL {
            for (src, out) in input.iter().zip(filtered(&input, mode)) {
                assert_eq!(src[3], out[3], "{mode} changed alpha");
            }
        }
    }

    #[test]
    fn original_is_identity() {
        let input = [[10, 20, 30, 40], [250, 0, 125, 255]];
        assert_eq!(filtered(&input, FilterMode::Original), input.to_vec());
    }

    #[test]
    fn parallel_matches_sequential() {
        let buffer: Vec<u8> = (0..64 * 64 * 4).map(|i| (i * 31 % 256) as u8).collect();
        for mode in FilterMode::ALL {
            let mut sequential = buffer.clone();
            let mut parallel = buffer.clone();
            apply_in_place(&mut sequential, mode, usize::MAX);
            apply_in_place(&mut parallel, mode, 0);
            assert_eq!(sequential, parallel, "{mode} diverged in parallel");
        }
    }
}
