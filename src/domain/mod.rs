//! Fundamental domain value types.
//!
//! Identifiers (assets, collections, pools), amounts, fee rates, ticks and
//! prices. All types are newtypes with validated constructors so that a
//! value which exists is a value which is valid.

mod amount;
mod asset_id;
mod balance_delta;
mod basis_points;
mod fee_tier;
mod liquidity;
mod pool_key;
mod price;
mod rounding;
mod sqrt_price;
mod tick;

pub use amount::Amount;
pub use asset_id::{Account, AssetId, CollectionId};
pub use balance_delta::BalanceDelta;
pub(crate) use basis_points::MAX_BPS;
pub use basis_points::BasisPoints;
pub use fee_tier::FeeTier;
pub use liquidity::Liquidity;
pub use pool_key::{PoolId, PoolKey, TokenSide};
pub use price::Price;
pub use rounding::Rounding;
pub(crate) use sqrt_price::Q96;
pub use sqrt_price::SqrtPriceX96;
pub use tick::{Tick, TickSpacing};
