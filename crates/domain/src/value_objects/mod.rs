pub mod amount;
pub mod fee_rate;
pub mod price;
pub mod quote;

pub use amount::Amount;
pub use fee_rate::FeeRate;
pub use price::Price;
pub use quote::{LiquidityCheck, LiquidityQuote, SwapQuote};
