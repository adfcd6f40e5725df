//! Typed Rust client for the TextAnywhere bulk SMS HTTP gateway.
//!
//! One gateway transaction per call: form-encode the request, POST it, parse
//! the XML response, and aggregate the per-destination outcome into a
//! [`SendReport`] with a pass/fail summary and an ordered breakdown. The
//! design keeps a domain layer of strong types, a transport layer for
//! wire-format quirks, and a small client layer orchestrating requests.
//!
//! ```rust,no_run
//! use textanywhere::{Credentials, DestinationNumber, MessageText, SendRequest, TextAnywhereClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), textanywhere::TextAnywhereError> {
//!     let client = TextAnywhereClient::new(Credentials::new("login", "password")?)?;
//!     let number = DestinationNumber::new("+44 7700 900123")?;
//!     let message = MessageText::new("hello")?;
//!     let request = SendRequest::new(vec![number], message)?;
//!     let report = client.send_test(request).await?;
//!     println!("pass: {}, fail: {}", report.summary.pass, report.summary.fail);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    Credentials, TextAnywhereClient, TextAnywhereClientBuilder, TextAnywhereError, UnexpectedStatus,
};
pub use domain::{
    DestinationNumber, DestinationResult, Login, MessageText, Originator, Password, SendMode,
    SendReport, SendRequest, SendSummary, UnixTimestamp, ValidationError,
};
