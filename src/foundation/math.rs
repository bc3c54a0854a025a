pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Map an opacity in `[0, 1]` to an 8-bit coverage value.
pub(crate) fn unit_to_u8(v: f32) -> u8 {
    ((v.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u8
}

/// Reduce `v` into `[0, 1)`. Non-finite input maps to `0`.
pub fn wrap01(v: f64) -> f64 {
    if !v.is_finite() {
        return 0.0;
    }
    let r = v.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs.
    if r >= 1.0 { 0.0 } else { r }
}

/// Normalized position of `elapsed_ms` inside a repeating cycle, always in `[0, 1)`.
pub fn cycle_progress(elapsed_ms: f64, cycle_ms: f64) -> f64 {
    if !cycle_ms.is_finite() || cycle_ms <= 0.0 {
        return 0.0;
    }
    wrap01(elapsed_ms / cycle_ms)
}

/// Two-phase split of a cycle: which half `p` is in, and progress inside that half.
pub fn half_phase(p: f64) -> (bool, f64) {
    let p = wrap01(p);
    if p < 0.5 {
        (false, p * 2.0)
    } else {
        (true, (p - 0.5) * 2.0)
    }
}

/// Symmetric triangle wave: `0` at `p = 0`, `1` at `p = 0.5`, back to `0` at `p = 1`.
pub fn triangle(p: f64) -> f64 {
    let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
    if p < 0.5 { 2.0 * p } else { 2.0 * (1.0 - p) }
}

pub(crate) fn smoothstep(a: f32, b: f32, x: f32) -> f32 {
    if x <= a {
        return 0.0;
    }
    if x >= b {
        return 1.0;
    }
    let t = (x - a) / (b - a);
    (t * t * (3.0 - 2.0 * t)).clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
