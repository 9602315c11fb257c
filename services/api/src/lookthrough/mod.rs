//! Look-through decomposition of basket positions into underlying securities.

pub mod engine;

pub use engine::{
    decompose, BasketPosition, Decomposition, Exposure, HoldingsSource, LookThrough,
    LookThroughError,
};
