use crate::domain::validation::ValidationError;
use crate::domain::value::{DestinationNumber, MessageText};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Gateway send mode.
///
/// In test mode the gateway returns a simulated per-destination result set
/// without delivering anything.
pub enum SendMode {
    Test,
    Live,
}

#[derive(Debug, Clone)]
/// One batch send: an ordered list of destinations and a message body.
pub struct SendRequest {
    destinations: Vec<DestinationNumber>,
    message: MessageText,
}

impl SendRequest {
    /// Create a send request.
    ///
    /// Errors when `destinations` is empty; message length is already
    /// enforced by [`MessageText`].
    pub fn new(
        destinations: Vec<DestinationNumber>,
        message: MessageText,
    ) -> Result<Self, ValidationError> {
        if destinations.is_empty() {
            return Err(ValidationError::Empty {
                field: DestinationNumber::FIELD,
            });
        }
        Ok(Self {
            destinations,
            message,
        })
    }

    pub fn destinations(&self) -> &[DestinationNumber] {
        &self.destinations
    }

    pub fn message(&self) -> &MessageText {
        &self.message
    }
}
