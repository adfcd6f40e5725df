#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Pass/fail tally across one batch send.
pub struct SendSummary {
    pub pass: usize,
    pub fail: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome for one destination, as echoed by the gateway.
pub struct DestinationResult {
    /// Number as reported by the gateway.
    pub number: String,
    /// Whether the gateway accepted the message for this destination.
    pub pass: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of one batch send.
///
/// `breakdown` preserves the gateway's reporting order. The counts satisfy
/// `summary.pass + summary.fail == breakdown.len()`; whether that also equals
/// the submitted destination count is up to the gateway.
pub struct SendReport {
    pub summary: SendSummary,
    pub breakdown: Vec<DestinationResult>,
}
