//! Bit-exact encode/decode of primitives and SH bands (spec.md §4.1).

use glam::{Quat, Vec3};
use half::f16;

use crate::error::Error;
use crate::primitive::{Encoding, ExtendedPrimitive, PackedPrimitive, Primitive, ShBand};

/// Fixed quantization range for spherical-harmonic coefficients.
///
/// spec.md's `encode_sh_band_k` takes no range parameter, so the domain
/// must be a crate-wide constant rather than something carried by
/// [`Encoding`]. `±8.0` covers the residual SH coefficient magnitudes
/// produced by the common splat trainers this format targets (resolved
/// Open Question, see DESIGN.md).
pub const SH_COEFF_MIN: f32 = -8.0;
pub const SH_COEFF_MAX: f32 = 8.0;

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    (v - a) / (b - a)
}

fn quantize_u8(t: f32) -> u8 {
    (t.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn dequantize_u8(v: u8) -> f32 {
    v as f32 / 255.0
}

/// Folded-octahedral encoding of a unit axis into a `[0, 1]^2` point.
fn oct_encode(axis: Vec3) -> (f32, f32) {
    let l1 = axis.x.abs() + axis.y.abs() + axis.z.abs();
    let mut p = (axis.x / l1, axis.y / l1);
    if axis.z < 0.0 {
        p = (
            (1.0 - p.1.abs()) * p.0.signum(),
            (1.0 - p.0.abs()) * p.1.signum(),
        );
    }
    p
}

/// Inverse of [`oct_encode`]. The fold is an involution, so un-folding uses
/// the same formula applied to the decoded `z < 0` case.
fn oct_decode(p: (f32, f32)) -> Vec3 {
    let z = 1.0 - p.0.abs() - p.1.abs();
    let (x, y) = if z < 0.0 {
        (
            (1.0 - p.1.abs()) * sign_nonzero(p.0),
            (1.0 - p.0.abs()) * sign_nonzero(p.1),
        )
    } else {
        p
    };
    Vec3::new(x, y, z).normalize_or(Vec3::X)
}

/// `f32::signum` returns `1.0` for `0.0`, which matches the convention used
/// by the folded-octahedral mapping (a zero component folds towards the
/// positive side).
fn sign_nonzero(v: f32) -> f32 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Encodes a unit quaternion into 24 bits: 8 bits per octahedral axis
/// channel plus 8 bits for `theta / pi`.
fn encode_quat(q: Quat) -> [u8; 3] {
    let q = if q.w < 0.0 { -q } else { q };
    let w = q.w.clamp(-1.0, 1.0);
    let theta = 2.0 * w.acos();
    let half_sin = (theta / 2.0).sin();
    let axis = if half_sin.abs() < 1e-6 {
        Vec3::X
    } else {
        Vec3::new(q.x, q.y, q.z) / half_sin
    };
    let (px, py) = oct_encode(axis);
    let qx = quantize_u8((px + 1.0) / 2.0);
    let qy = quantize_u8((py + 1.0) / 2.0);
    let qt = quantize_u8(theta / std::f32::consts::PI);
    [qx, qy, qt]
}

/// Decodes the 24-bit quaternion encoding produced by [`encode_quat`].
fn decode_quat(bytes: [u8; 3]) -> Quat {
    let px = dequantize_u8(bytes[0]) * 2.0 - 1.0;
    let py = dequantize_u8(bytes[1]) * 2.0 - 1.0;
    let theta = dequantize_u8(bytes[2]) * std::f32::consts::PI;
    let axis = oct_decode((px, py));
    let half = theta / 2.0;
    let (s, c) = half.sin_cos();
    Quat::from_xyzw(axis.x * s, axis.y * s, axis.z * s, c)
}

fn encode_scale_channel(scale: f32, enc: &Encoding) -> u8 {
    if scale == 0.0 {
        return 0;
    }
    let ln = scale.ln().clamp(enc.ln_scale_min(), enc.ln_scale_max());
    let t = inverse_lerp(enc.ln_scale_min(), enc.ln_scale_max(), ln);
    1 + (t.clamp(0.0, 1.0) * 254.0).round() as u8
}

fn decode_scale_channel(byte: u8, enc: &Encoding) -> f32 {
    if byte == 0 {
        return 0.0;
    }
    let t = (byte - 1) as f32 / 254.0;
    lerp(enc.ln_scale_min(), enc.ln_scale_max(), t).exp()
}

/// Encodes a single primitive into its 16-byte packed representation.
pub fn encode(p: &Primitive, enc: &Encoding) -> PackedPrimitive {
    let mut out = [0u8; 16];

    out[0] = quantize_u8(inverse_lerp(enc.rgb_min(), enc.rgb_max(), p.color.x));
    out[1] = quantize_u8(inverse_lerp(enc.rgb_min(), enc.rgb_max(), p.color.y));
    out[2] = quantize_u8(inverse_lerp(enc.rgb_min(), enc.rgb_max(), p.color.z));
    out[3] = quantize_u8(p.opacity.clamp(0.0, enc.opacity_max()) / enc.opacity_max());

    let cx = f16::from_f32(p.center.x).to_le_bytes();
    let cy = f16::from_f32(p.center.y).to_le_bytes();
    let cz = f16::from_f32(p.center.z).to_le_bytes();
    out[4..6].copy_from_slice(&cx);
    out[6..8].copy_from_slice(&cy);
    out[8..10].copy_from_slice(&cz);

    let quat = encode_quat(p.orientation);
    out[10] = quat[0];
    out[11] = quat[1];
    out[15] = quat[2];

    out[12] = encode_scale_channel(p.scales.x, enc);
    out[13] = encode_scale_channel(p.scales.y, enc);
    out[14] = encode_scale_channel(p.scales.z, enc);

    out
}

/// Decodes a 16-byte packed primitive back into a [`Primitive`].
///
/// The result carries no SH coefficients; those are encoded/decoded
/// separately via [`encode_sh_band`]/[`decode_sh_band`].
pub fn decode(bytes: &PackedPrimitive, enc: &Encoding) -> Primitive {
    let color = Vec3::new(
        lerp(enc.rgb_min(), enc.rgb_max(), dequantize_u8(bytes[0])),
        lerp(enc.rgb_min(), enc.rgb_max(), dequantize_u8(bytes[1])),
        lerp(enc.rgb_min(), enc.rgb_max(), dequantize_u8(bytes[2])),
    );
    let opacity = dequantize_u8(bytes[3]) * enc.opacity_max();

    let center = Vec3::new(
        f16::from_le_bytes([bytes[4], bytes[5]]).to_f32(),
        f16::from_le_bytes([bytes[6], bytes[7]]).to_f32(),
        f16::from_le_bytes([bytes[8], bytes[9]]).to_f32(),
    );

    let orientation = decode_quat([bytes[10], bytes[11], bytes[15]]);

    let scales = Vec3::new(
        decode_scale_channel(bytes[12], enc),
        decode_scale_channel(bytes[13], enc),
        decode_scale_channel(bytes[14], enc),
    );

    Primitive {
        center,
        scales,
        orientation,
        opacity,
        color,
        sh: Vec::new(),
    }
}

fn pack_signed_bits(values: &[f32], bits: u32, min: f32, max: f32, num_words: usize) -> Vec<u32> {
    let max_code = (1u32 << bits) - 1;
    let mut words = vec![0u32; num_words];
    let mut bit_pos: u64 = 0;
    for &v in values {
        let t = inverse_lerp(min, max, v.clamp(min, max)).clamp(0.0, 1.0);
        let code = (t * max_code as f32).round() as u32;
        write_bits(&mut words, bit_pos, bits, code);
        bit_pos += bits as u64;
    }
    words
}

fn unpack_signed_bits(words: &[u32], bits: u32, count: usize, min: f32, max: f32) -> Vec<f32> {
    let max_code = (1u32 << bits) - 1;
    let mut out = Vec::with_capacity(count);
    let mut bit_pos: u64 = 0;
    for _ in 0..count {
        let code = read_bits(words, bit_pos, bits);
        bit_pos += bits as u64;
        let t = code as f32 / max_code as f32;
        out.push(lerp(min, max, t));
    }
    out
}

fn write_bits(words: &mut [u32], bit_pos: u64, bits: u32, value: u32) {
    let mut remaining = bits;
    let mut value = value;
    let mut pos = bit_pos;
    while remaining > 0 {
        let word_idx = (pos / 32) as usize;
        let bit_off = (pos % 32) as u32;
        let avail = 32 - bit_off;
        let take = remaining.min(avail);
        let mask = if take == 32 { u32::MAX } else { (1u32 << take) - 1 };
        words[word_idx] |= (value & mask) << bit_off;
        value >>= take;
        remaining -= take;
        pos += take as u64;
    }
}

fn read_bits(words: &[u32], bit_pos: u64, bits: u32) -> u32 {
    let mut remaining = bits;
    let mut pos = bit_pos;
    let mut out: u32 = 0;
    let mut shift = 0u32;
    while remaining > 0 {
        let word_idx = (pos / 32) as usize;
        let bit_off = (pos % 32) as u32;
        let avail = 32 - bit_off;
        let take = remaining.min(avail);
        let mask = if take == 32 { u32::MAX } else { (1u32 << take) - 1 };
        let bits_here = (words[word_idx] >> bit_off) & mask;
        out |= bits_here << shift;
        shift += take;
        remaining -= take;
        pos += take as u64;
    }
    out
}

/// Encodes one SH band's coefficients into its packed `u32` words
/// (spec.md §4.1: band 1 → 7-bit/2 words, band 2 → 8-bit/4 words,
/// band 3 → 6-bit/4 words).
pub fn encode_sh_band(coeffs: &[f32], band: ShBand) -> Vec<u32> {
    assert_eq!(coeffs.len(), band.coeff_count());
    pack_signed_bits(
        coeffs,
        band.bits_per_coeff(),
        SH_COEFF_MIN,
        SH_COEFF_MAX,
        band.num_words(),
    )
}

/// Decodes the packed words produced by [`encode_sh_band`].
pub fn decode_sh_band(words: &[u32], band: ShBand) -> Vec<f32> {
    assert_eq!(words.len(), band.num_words());
    unpack_signed_bits(
        words,
        band.bits_per_coeff(),
        band.coeff_count(),
        SH_COEFF_MIN,
        SH_COEFF_MAX,
    )
}

/// Encodes a primitive into the 32-byte extended representation.
///
/// Word 0: center as three `f32`s, alpha as `f16`, padding.
/// Word 1: three lanes of `(rgb_f16_high, ln_scale_f16_low)` packed two
/// half-floats per `u32`, plus a 10/10/12-bit folded-octahedral quaternion
/// in the fourth lane (resolved Open Question, see DESIGN.md §4.1).
pub fn encode_extended(p: &Primitive, enc: &Encoding) -> ExtendedPrimitive {
    let mut out = [0u32; 8];

    out[0] = p.center.x.to_bits();
    out[1] = p.center.y.to_bits();
    out[2] = p.center.z.to_bits();
    out[3] = f16::from_f32(p.opacity.clamp(0.0, enc.opacity_max())).to_bits() as u32;

    for (i, (&rgb, &scale)) in [p.color.x, p.color.y, p.color.z]
        .iter()
        .zip([p.scales.x, p.scales.y, p.scales.z].iter())
        .enumerate()
    {
        let ln_scale = if scale > 0.0 {
            scale.ln().clamp(enc.ln_scale_min(), enc.ln_scale_max())
        } else {
            f32::NEG_INFINITY
        };
        let rgb_bits = f16::from_f32(rgb).to_bits() as u32;
        let scale_bits = f16::from_f32(ln_scale).to_bits() as u32;
        out[4 + i] = (rgb_bits << 16) | scale_bits;
    }

    let quat = encode_quat_10_10_12(p.orientation);
    out[7] = quat;

    out
}

/// Decodes an extended primitive back into a [`Primitive`] (no SH data).
pub fn decode_extended(bytes: &ExtendedPrimitive) -> Primitive {
    let center = Vec3::new(
        f32::from_bits(bytes[0]),
        f32::from_bits(bytes[1]),
        f32::from_bits(bytes[2]),
    );
    let opacity = f16::from_bits(bytes[3] as u16).to_f32();

    let mut color = Vec3::ZERO;
    let mut scales = Vec3::ZERO;
    for i in 0..3 {
        let word = bytes[4 + i];
        let rgb = f16::from_bits((word >> 16) as u16).to_f32();
        let ln_scale = f16::from_bits((word & 0xFFFF) as u16).to_f32();
        color[i] = rgb;
        scales[i] = if ln_scale.is_finite() {
            ln_scale.exp()
        } else {
            0.0
        };
    }

    let orientation = decode_quat_10_10_12(bytes[7]);

    Primitive {
        center,
        scales,
        orientation,
        opacity,
        color,
        sh: Vec::new(),
    }
}

fn encode_quat_10_10_12(q: Quat) -> u32 {
    let q = if q.w < 0.0 { -q } else { q };
    let w = q.w.clamp(-1.0, 1.0);
    let theta = 2.0 * w.acos();
    let half_sin = (theta / 2.0).sin();
    let axis = if half_sin.abs() < 1e-6 {
        Vec3::X
    } else {
        Vec3::new(q.x, q.y, q.z) / half_sin
    };
    let (px, py) = oct_encode(axis);
    let qx = (((px + 1.0) / 2.0).clamp(0.0, 1.0) * 1023.0).round() as u32;
    let qy = (((py + 1.0) / 2.0).clamp(0.0, 1.0) * 1023.0).round() as u32;
    let qt = ((theta / std::f32::consts::PI).clamp(0.0, 1.0) * 4095.0).round() as u32;
    qx | (qy << 10) | (qt << 20)
}

fn decode_quat_10_10_12(bits: u32) -> Quat {
    let qx = bits & 0x3FF;
    let qy = (bits >> 10) & 0x3FF;
    let qt = (bits >> 20) & 0xFFF;
    let px = qx as f32 / 1023.0 * 2.0 - 1.0;
    let py = qy as f32 / 1023.0 * 2.0 - 1.0;
    let theta = qt as f32 / 4095.0 * std::f32::consts::PI;
    let axis = oct_decode((px, py));
    let half = theta / 2.0;
    let (s, c) = half.sin_cos();
    Quat::from_xyzw(axis.x * s, axis.y * s, axis.z * s, c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn sample_primitive() -> Primitive {
        Primitive {
            center: Vec3::new(1.5, -2.25, 100.0),
            scales: Vec3::new(0.1, 0.2, 0.3),
            orientation: Quat::from_axis_angle(Vec3::new(0.2, 0.7, 0.4).normalize(), 1.2),
            opacity: 0.75,
            color: Vec3::new(0.2, 0.4, 0.9),
            sh: Vec::new(),
        }
    }

    #[test]
    fn round_trip_within_tolerance() {
        let enc = Encoding::new(0.0, 1.0, -10.0, 4.0, false).unwrap();
        let p = sample_primitive();
        let packed = encode(&p, &enc);
        let decoded = decode(&packed, &enc);

        // P1: center L-infinity error <= 2^-14 * |center|.
        let tol = Vec3::splat(2f32.powi(-14)) * p.center.abs();
        assert!((decoded.center.x - p.center.x).abs() <= tol.x.max(1e-6));
        assert!((decoded.center.y - p.center.y).abs() <= tol.y.max(1e-6));
        assert!((decoded.center.z - p.center.z).abs() <= tol.z.max(1e-6));

        // Scale relative error <= (max-min)/254.
        let scale_tol = (4.0 - (-10.0)) / 254.0;
        for i in 0..3 {
            let rel = (decoded.scales[i].ln() - p.scales[i].ln()).abs();
            assert!(rel <= scale_tol + 1e-4);
        }

        // Color error <= (max-min)/255.
        for i in 0..3 {
            assert!((decoded.color[i] - p.color[i]).abs() <= 1.0 / 255.0 + 1e-6);
        }

        // Opacity error <= 1/255.
        assert!((decoded.opacity - p.opacity).abs() <= 1.0 / 255.0 + 1e-6);

        // Quaternion angular error <= pi/256.
        let dot = decoded.orientation.dot(p.orientation).abs().min(1.0);
        let angle = 2.0 * dot.acos();
        assert!(angle <= std::f32::consts::PI / 256.0 + 1e-3);
    }

    #[test]
    fn zero_scale_round_trips_exactly() {
        let enc = Encoding::default();
        let mut p = sample_primitive();
        p.scales = Vec3::new(0.0, 0.3, 0.0);
        let packed = encode(&p, &enc);
        assert_eq!(packed[12], 0);
        assert_eq!(packed[14], 0);
        let decoded = decode(&packed, &enc);
        assert_eq!(decoded.scales.x, 0.0);
        assert_eq!(decoded.scales.z, 0.0);
    }

    #[test]
    fn quaternion_fold_boundary() {
        // S6: encode (0, 0, sin(pi/2), cos(pi/2)) = (0, 0, 1, 0).
        let q = Quat::from_xyzw(0.0, 0.0, FRAC_PI_2.sin(), FRAC_PI_2.cos());
        let bytes = encode_quat(q);
        let decoded = decode_quat(bytes);
        let dot = q.dot(decoded).abs();
        assert!(dot >= (std::f32::consts::PI / 256.0).cos() - 1e-4);
    }

    #[test]
    fn sh_band_round_trip() {
        for band in [ShBand::One, ShBand::Two, ShBand::Three] {
            let coeffs: Vec<f32> = (0..band.coeff_count())
                .map(|i| (i as f32 / band.coeff_count() as f32) * 6.0 - 3.0)
                .collect();
            let words = encode_sh_band(&coeffs, band);
            assert_eq!(words.len(), band.num_words());
            let decoded = decode_sh_band(&words, band);
            let tol = (SH_COEFF_MAX - SH_COEFF_MIN) / ((1u32 << band.bits_per_coeff()) - 1) as f32;
            for (a, b) in coeffs.iter().zip(decoded.iter()) {
                assert!((a - b).abs() <= tol + 1e-4);
            }
        }
    }

    #[test]
    fn extended_round_trip() {
        let enc = Encoding::default();
        let p = sample_primitive();
        let bytes = encode_extended(&p, &enc);
        let decoded = decode_extended(&bytes);
        assert!((decoded.center - p.center).length() < 1e-3);
        assert!((decoded.opacity - p.opacity).abs() < 1e-2);
        let dot = decoded.orientation.dot(p.orientation).abs().min(1.0);
        assert!(dot > 0.99);
    }
}
