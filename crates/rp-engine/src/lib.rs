//! # rp-engine — Slot outcome engine with a shared prize pool
//!
//! Draws a 5×3 grid from wager-weighted symbol tables, evaluates the middle
//! payline, classifies the result into a prize tier and pays it out of a
//! protected pool.
//!
//! ## Architecture
//!
//! ```text
//! SlotMachine
//!     │
//!     ├── DrawTable (premium weights × wager multiplier, common split)
//!     ├── SpinSchedule (staggered reel stops on a logical clock)
//!     ├── ObserverList (start → reel stops → end)
//!     └── Arc<PrizePool> (shared, settled under a lock)
//!           │
//!           v
//!     Grid → WinLine → PrizeTier → PoolPayout → SpinResult
//! ```

pub mod config;
pub mod draw;
pub mod error;
pub mod grid;
pub mod machine;
pub mod observer;
pub mod payline;
pub mod pool;
pub mod prize;
pub mod random;
pub mod simulation;
pub mod spin;
pub mod symbols;
pub mod timing;

pub use config::*;
pub use draw::*;
pub use error::*;
pub use grid::*;
pub use machine::*;
pub use observer::*;
pub use payline::*;
pub use pool::*;
pub use prize::*;
pub use random::*;
pub use simulation::*;
pub use spin::*;
pub use symbols::*;
pub use timing::*;
