//! Value Noise — a smooth 2D scalar field in `[0, 1)`.
//!
//! Lattice corners are hashed to pseudo-random values and blended with a
//! smoothstep-weighted bilinear interpolation, giving a seamless field that is
//! a pure function of `(x, y)`. The layout samples it to vary how tightly
//! markers pack in different regions of the canvas.

const U32_RANGE: f64 = 4_294_967_296.0;

/// Stateless 2D value-noise sampler.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueNoiseField;

impl ValueNoiseField {
    /// Samples the field at a continuous coordinate.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let fx = x.floor();
        let fy = y.floor();
        let ix = fx as i32;
        let iy = fy as i32;

        let tx = smoothstep(x - fx);
        let ty = smoothstep(y - fy);

        let v00 = lattice_value(ix, iy);
        let v10 = lattice_value(ix.wrapping_add(1), iy);
        let v01 = lattice_value(ix, iy.wrapping_add(1));
        let v11 = lattice_value(ix.wrapping_add(1), iy.wrapping_add(1));

        let top = lerp(v00, v10, tx);
        let bottom = lerp(v01, v11, tx);
        lerp(top, bottom, ty)
    }

    /// Maps the field at `(x * noise_scale, y * noise_scale)` into
    /// `[min_multiplier, max_multiplier]`.
    pub fn density_at(
        &self,
        x: f64,
        y: f64,
        noise_scale: f64,
        min_multiplier: f64,
        max_multiplier: f64,
    ) -> f64 {
        let n = self.sample(x * noise_scale, y * noise_scale);
        min_multiplier + (max_multiplier - min_multiplier) * n
    }
}

/// Hashes a lattice corner to a value in `[0, 1)`.
fn lattice_value(x: i32, y: i32) -> f64 {
    f64::from(hash_xy(x, y)) / U32_RANGE
}

fn hash_xy(x: i32, y: i32) -> u32 {
    let mut v = (x as u32).wrapping_mul(0x27D4_EB2D) ^ (y as u32).wrapping_mul(0x1656_67B1);
    v ^= v >> 15;
    v = v.wrapping_mul(0x85EB_CA6B);
    v ^= v >> 13;
    v = v.wrapping_mul(0xC2B2_AE35);
    v ^= v >> 16;
    v
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
