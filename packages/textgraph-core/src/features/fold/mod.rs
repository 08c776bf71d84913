//! Generic folds over a [`Dag`](crate::features::dag::Dag)
//!
//! - `cata`: collapse bottom-up into one value per root
//! - `ana`: grow a DAG top-down from a seed

mod anamorphism;
mod catamorphism;

pub use anamorphism::{ana, ana_with_cancel, UNFOLD_OPERATION};
pub use catamorphism::{cata, cata_from, try_cata};
