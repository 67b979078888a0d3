//! Morton (Z-order) codes for spatially coherent sorting.
//!
//! Three coordinates are bit-interleaved into one 64-bit key so that sorting
//! by key keeps nearby points close together in the sorted order.

use crate::{Aabb, DVec3};

/// Spread the top 21 bits of `a` so that each lands on every third bit.
#[inline]
fn split_by_3(a: u32) -> u64 {
    let mut val = (a >> 11) as u64;

    val = (val | val << 32) & 0x001f_0000_0000_ffff;
    val = (val | val << 16) & 0x001f_0000_ff00_00ff;
    val = (val | val << 8) & 0x100f_00f0_0f00_f00f;
    val = (val | val << 4) & 0x10c3_0c30_c30c_30c3;
    val = (val | val << 2) & 0x1249_2492_4924_9249;

    val
}

/// Interleave three integers into a 63-bit key: x occupies bit 0, y bit 1,
/// z bit 2, then x bit 3 and so on.
///
/// Only the top 21 bits of each input survive.
#[inline]
pub fn morton(x: u32, y: u32, z: u32) -> u64 {
    split_by_3(x) | (split_by_3(y) << 1) | (split_by_3(z) << 2)
}

/// Morton code of a point in the unit cube.
///
/// Components are scaled to the full `u32` range; values outside `[0, 1]`
/// saturate and NaN maps to 0.
#[inline]
pub fn morton_point(p: DVec3) -> u64 {
    let scale = u32::MAX as f64;
    morton(
        (p.x * scale) as u32,
        (p.y * scale) as u32,
        (p.z * scale) as u32,
    )
}

/// Morton code of `b`'s center, normalized into `total`'s frame.
///
/// Axes along which `total` has no extent contribute 0.
pub fn morton_box(b: &Aabb, total: &Aabb) -> u64 {
    let extent = total.size();
    let mut v = (b.center() - total.min) / extent;

    for axis in 0..3 {
        if extent[axis] == 0.0 {
            v[axis] = 0.0;
        }
    }

    morton_point(v)
}
