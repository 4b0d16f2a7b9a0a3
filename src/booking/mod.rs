//! Client-side booking workflow: calendar, slot ordering and selection, the
//! cart-staging state machine and the outcomes screens render from it.

pub mod calendar;
pub mod flow;
pub mod outcome;
pub mod slots;

pub use flow::{BookingFlow, BookingTarget, Loadable};
pub use outcome::{CartConflict, ModalOutcome, StageOutcome};
