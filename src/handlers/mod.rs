pub mod employees_handler;
pub mod google_handler;
pub mod health;
pub mod leave_handler;

pub use health::health_check;
