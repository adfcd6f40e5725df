//! Transport layer: wire-format details (form encoding and XML decoding).

mod send;

pub use send::{DecodedSendResponse, decode_send_response, encode_send_form};
