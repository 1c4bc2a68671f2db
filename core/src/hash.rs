//! Stateless hash mixing used wherever the run needs a random choice.
//!
//! Nothing here keeps a cursor: the same inputs always produce the same word,
//! so re-running a room after a rewind regenerates identical rolls without
//! serializing any generator state.

const OFFSET_BASIS: u32 = 0x811c_9dc5;
const PRIME: u32 = 0x0100_0193;
const RANGE_TWEAK: u32 = 0x9e37_79b9;

/// Combines four words into a single order-sensitive 32-bit hash.
///
/// Each input is XORed into the running value which is then multiplied by the
/// FNV prime, starting from the FNV offset basis.
#[must_use]
pub const fn mix(a: u32, b: u32, c: u32, d: u32) -> u32 {
    let mut hash = OFFSET_BASIS;
    hash = (hash ^ a).wrapping_mul(PRIME);
    hash = (hash ^ b).wrapping_mul(PRIME);
    hash = (hash ^ c).wrapping_mul(PRIME);
    hash = (hash ^ d).wrapping_mul(PRIME);
    hash
}

/// Folds three additional words into an existing rolling digest.
#[must_use]
pub const fn fold(digest: u32, a: u32, b: u32, c: u32) -> u32 {
    mix(digest, a, b, c)
}

/// Derives an integer in `[min, max_exclusive)` from the run seed, room and salt.
///
/// A degenerate span (`max_exclusive <= min`) yields `min`.
#[must_use]
pub fn deterministic_range(
    seed: u32,
    room_index: i32,
    salt: u32,
    min: i32,
    max_exclusive: i32,
) -> i32 {
    if max_exclusive <= min {
        return min;
    }

    let span = max_exclusive.abs_diff(min);
    let hash = mix(
        seed,
        room_index.wrapping_add(1) as u32,
        salt,
        seed ^ salt ^ RANGE_TWEAK,
    );
    let offset = i64::from(hash % span);
    i32::try_from(i64::from(min) + offset).unwrap_or(min)
}

/// Maps a hash word onto the unit interval `[0, 1)`.
#[must_use]
pub fn unit_interval(hash: u32) -> f32 {
    // 24 bits fit the f32 mantissa exactly, so the top value stays below 1.
    const SCALE: f32 = 1.0 / 16_777_216.0;
    (hash >> 8) as f32 * SCALE
}
