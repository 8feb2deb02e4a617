//! Fixed-point math for rates and the scaling factor

pub mod common;
pub mod factor;

pub use common::{
    mul_div_floor, rebase_rate, TryAdd, TrySub, MULTIPLIER_DENOMINATOR,
    RATE_MULTIPLIER, RATE_SCALE, WAD,
};
pub use factor::ScalingFactor;
