use serde::Deserialize;

use crate::domain::{
    DestinationNumber, DestinationResult, MessageText, Originator, SendMode, SendReport,
    SendRequest, SendSummary, UnixTimestamp,
};

/// Destination status code meaning "accepted" in the gateway response.
const DESTINATION_OK_CODE: i64 = 1;

/// Fixed request parameters the gateway expects on every send.
const REPLY_METHOD_ID: &str = "1";
const RETURN_CSV_STRING: &str = "false";
const VALIDITY: &str = "1";
const CHARACTER_SET_ID: &str = "2";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid XML response: {0}")]
    Xml(#[from] quick_xml::DeError),
}

/// Send response after XML decoding, before the transaction-level check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedSendResponse {
    /// Top-level transaction description, from the lower-cased document.
    pub description: String,
    pub report: SendReport,
}

#[derive(Debug, Clone, Deserialize)]
struct SendXmlResponse {
    transaction: TransactionXml,
    #[serde(default)]
    destinations: DestinationsXml,
}

#[derive(Debug, Clone, Deserialize)]
struct TransactionXml {
    description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DestinationsXml {
    #[serde(default, rename = "destination")]
    entries: Vec<DestinationXml>,
}

#[derive(Debug, Clone, Deserialize)]
struct DestinationXml {
    number: String,
    code: i64,
}

pub fn encode_send_form(
    request: &SendRequest,
    mode: SendMode,
    reference: UnixTimestamp,
    originator: &Originator,
) -> Vec<(String, String)> {
    let destinations = request
        .destinations()
        .iter()
        .map(DestinationNumber::as_str)
        .collect::<Vec<_>>()
        .join(",");

    vec![
        (
            "clientbillingreference".to_owned(),
            reference.value().to_string(),
        ),
        (
            "clientmessagereference".to_owned(),
            reference.value().to_string(),
        ),
        (
            Originator::FIELD.to_owned(),
            originator.as_str().to_owned(),
        ),
        ("replymethodid".to_owned(), REPLY_METHOD_ID.to_owned()),
        ("returncsvstring".to_owned(), RETURN_CSV_STRING.to_owned()),
        (DestinationNumber::FIELD.to_owned(), destinations),
        (
            MessageText::FIELD.to_owned(),
            request.message().as_str().to_owned(),
        ),
        ("validity".to_owned(), VALIDITY.to_owned()),
        ("charactersetid".to_owned(), CHARACTER_SET_ID.to_owned()),
        ("method".to_owned(), method_name(mode).to_owned()),
    ]
}

fn method_name(mode: SendMode) -> &'static str {
    match mode {
        SendMode::Test => "testsendsms",
        SendMode::Live => "sendsms",
    }
}

/// Decode a send response body.
///
/// The whole body is lower-cased before parsing, so element names and the
/// transaction description come out lower-case regardless of how the gateway
/// capitalizes them.
pub fn decode_send_response(body: &str) -> Result<DecodedSendResponse, TransportError> {
    let lowered = body.to_lowercase();
    let parsed: SendXmlResponse = quick_xml::de::from_str(&lowered)?;

    let mut summary = SendSummary::default();
    let mut breakdown = Vec::with_capacity(parsed.destinations.entries.len());
    for entry in parsed.destinations.entries {
        let pass = entry.code == DESTINATION_OK_CODE;
        if pass {
            summary.pass += 1;
        } else {
            summary.fail += 1;
        }
        breakdown.push(DestinationResult {
            number: entry.number,
            pass,
        });
    }

    Ok(DecodedSendResponse {
        description: parsed.transaction.description,
        report: SendReport { summary, breakdown },
    })
}
