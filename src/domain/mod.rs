//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{SendMode, SendRequest};
pub use response::{DestinationResult, SendReport, SendSummary};
pub use validation::ValidationError;
pub use value::{DestinationNumber, Login, MessageText, Originator, Password, UnixTimestamp};
