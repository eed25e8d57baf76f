//! Core types: coordinates, sides, pieces and game outcomes

pub use tapchess_base::types::*;
