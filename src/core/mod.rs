//! This module contains the core datatypes of the library.

mod historian;

pub mod lineage;
#[macro_use]
pub mod population;
pub mod wildtype;

pub use historian::Historian;
pub use lineage::Lineage;
pub use population::Population;
pub use wildtype::Wildtype;
