//! The aggregation engine and the services wrapped around it.

pub mod aggregate;
pub mod clock;
pub mod errors;
pub mod services;
pub mod session;
pub mod utils;
pub mod window;

pub use aggregate::{
    aggregate, GroupBy, GroupKey, GroupValues, RunningTotal, SummaryRow, SummaryTable,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::SummaryError;
pub use session::{AuthError, AuthSession};
pub use window::{select, Selection, ViewRequest};
