//! Validity-bitmap machinery separating recorded values from the `MISSING`
//! sentinel, and reconstructing the original interleaving on decode.

pub mod bitmap;
