use rand::Rng;

/// Stars are kept inside this band of the viewport, in percent.
pub const MIN_PERCENT: u8 = 10;
pub const MAX_PERCENT: u8 = 89;

/// Pick a random spot for a new star.
pub fn place<R: Rng + ?Sized>(rng: &mut R) -> (u8, u8) {
    (
        rng.random_range(MIN_PERCENT..=MAX_PERCENT),
        rng.random_range(MIN_PERCENT..=MAX_PERCENT),
    )
}
