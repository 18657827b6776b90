//! blc-opt - Loop-aware constant propagation and folding.
//!
//! Runs a fixed number of fixed-point passes over the flat IR produced by
//! `blc-ir`. There is no SSA form here: correctness comes from a side
//! table of "locals a loop writes" computed once up front, consulted on
//! every pass to decide whether a local's constant value may be trusted.

mod fold;
mod loops;
mod optimize;

pub use optimize::optimize;
