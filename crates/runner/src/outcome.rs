//! Interpretation of debug-session poll responses

use serde_json::Value;

/// `status` value of a finished session
pub const STATUS_COMPLETED: &str = "completed";

/// `status` value of a session cancelled on the collector
pub const STATUS_CANCELLED: &str = "cancelled";

/// Text the collector writes into `output` when it drops a task
pub const CANCEL_MARKER: &str = "was cancelled";

/// Prefix of the output once the script has returned
pub const RETURN_MARKER: &str = "returns ";

const OUTPUT_LABEL: &str = "output:";

/// Return code and console output of a finished script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptResult {
    /// `None` when the script returned `null`
    pub return_code: Option<i64>,
    /// Console output with line breaks translated for display
    pub output: String,
}

/// What one poll response says about the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollClassification {
    Completed(ScriptResult),
    Cancelled(String),
    Pending,
}

impl PollClassification {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PollClassification::Pending)
    }
}

/// Classify a poll response; first matching rule wins
///
/// 1. `status: completed`
/// 2. `status: cancelled`
/// 3. output containing [`CANCEL_MARKER`]
/// 4. output starting with [`RETURN_MARKER`]
/// 5. anything else is still running
pub fn classify(response: &Value) -> PollClassification {
    let status = response["status"].as_str().map(|s| s.trim().to_ascii_lowercase());
    let output = response["output"].as_str().unwrap_or("");

    match status.as_deref() {
        Some(STATUS_COMPLETED) => {
            let result = parse_return(output).unwrap_or_else(|| ScriptResult {
                return_code: None,
                output: to_display(output),
            });
            return PollClassification::Completed(result);
        }
        Some(STATUS_CANCELLED) => {
            return PollClassification::Cancelled(cancel_message(output));
        }
        _ => {}
    }

    if output.contains(CANCEL_MARKER) {
        return PollClassification::Cancelled(cancel_message(output));
    }

    match parse_return(output) {
        Some(result) => PollClassification::Completed(result),
        None => PollClassification::Pending,
    }
}

/// Parse `returns <code>\n[output:\n]<console>`
///
/// The code is an integer or `null`; an unreadable token is reported as `None`.
pub fn parse_return(output: &str) -> Option<ScriptResult> {
    let rest = output.strip_prefix(RETURN_MARKER)?;
    let (first_line, remainder) = rest.split_once('\n').unwrap_or((rest, ""));

    let return_code = match first_line.split_whitespace().next() {
        Some("null") | None => None,
        Some(token) => token.parse::<i64>().ok(),
    };

    let console = match remainder.strip_prefix(OUTPUT_LABEL) {
        Some(after) => after
            .strip_prefix("\r\n")
            .or_else(|| after.strip_prefix('\n'))
            .unwrap_or(after),
        None => remainder,
    };

    Some(ScriptResult {
        return_code,
        output: to_display(console),
    })
}

/// Translate line feeds to carriage-return line breaks for the display sink
pub fn to_display(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\r\n")
}

fn cancel_message(output: &str) -> String {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        "Script execution was cancelled".to_string()
    } else {
        trimmed.to_string()
    }
}
