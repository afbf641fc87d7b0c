//! Numeric conversion helpers centralizing safe numeric casts and ratio rounding.

use num_traits::cast::cast;

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(f64::MAX)
}

/// Exact ratio `numerator / denominator` as an f64, or `None` for an empty denominator.
#[must_use]
pub fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    (denominator != 0).then(|| u64_to_f64(numerator) / u64_to_f64(denominator))
}

/// Round `numerator / denominator` to hundredths, ties rounding up.
#[must_use]
pub fn hundredths_half_up(numerator: u64, denominator: u64) -> Option<u32> {
    if denominator == 0 {
        return None;
    }
    let den = u128::from(denominator);
    let scaled = 200 * u128::from(numerator) + den;
    Some(clamp_u128_to_u32(scaled / (2 * den)))
}

/// Round `numerator / denominator` to hundredths, ties rounding to the even hundredth.
#[must_use]
pub fn hundredths_half_even(numerator: u64, denominator: u64) -> Option<u32> {
    if denominator == 0 {
        return None;
    }
    let den = u128::from(denominator);
    let scaled = 100 * u128::from(numerator);
    let quotient = scaled / den;
    let twice_remainder = 2 * (scaled % den);
    let rounded = match twice_remainder.cmp(&den) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + (quotient % 2),
    };
    Some(clamp_u128_to_u32(rounded))
}

fn clamp_u128_to_u32(value: u128) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
