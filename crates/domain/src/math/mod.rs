/// Constant product swap math.
pub mod constant_product;
/// Proportional liquidity math.
pub mod liquidity;
/// Raw/decimal conversions.
pub mod scaling;
