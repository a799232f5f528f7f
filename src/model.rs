pub use self::{stats::*, totals::*};

mod stats;
mod totals;
