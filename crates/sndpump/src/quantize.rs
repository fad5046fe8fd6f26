//! Normalized float to fixed-point sample conversion.

/// Convert normalized float samples to signed 32-bit integers with
/// saturation.
///
/// Per sample, promoted to `f64` before scaling:
/// - values at or below `-1.0` saturate to [`i32::MIN`],
/// - values at or above `1.0` saturate to [`i32::MAX`],
/// - everything else maps to `i32::MAX as f64 * sample`, truncated toward
///   zero.
///
/// Truncation (rather than rounding) is deliberate: output files stay
/// bit-exact with those produced by earlier versions of the converter.
///
/// # Panics
///
/// Panics if `dst` is shorter than `src`.
pub fn quantize_to_i32(src: &[f32], dst: &mut [i32]) {
    assert!(
        dst.len() >= src.len(),
        "destination holds {} samples, need {}",
        dst.len(),
        src.len()
    );
    for (out, &sample) in dst.iter_mut().zip(src) {
        let sample = f64::from(sample);
        *out = if sample <= -1.0 {
            i32::MIN
        } else if sample >= 1.0 {
            i32::MAX
        } else {
            (i32::MAX as f64 * sample) as i32
        };
    }
}
