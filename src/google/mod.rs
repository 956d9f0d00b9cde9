pub mod calendar;
pub mod oauth;
pub mod pending;

pub use calendar::{CalendarClient, CreatedEvent, EventBody};
pub use oauth::{OAuthClient, TokenSet};
pub use pending::{PendingEvents, TokenGrants};
