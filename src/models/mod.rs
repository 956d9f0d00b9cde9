pub mod employee;
pub mod event;
pub mod leave;

pub use employee::{Employee, LeaveCategory};
pub use event::LeaveEvent;
pub use leave::LeaveRequestInput;
