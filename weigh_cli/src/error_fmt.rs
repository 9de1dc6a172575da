//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use weigh_core::{BuildError, WeighError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See README for a sample."
            ),
        };
    }

    if let Some(we) = err.downcast_ref::<WeighError>() {
        return match we {
            WeighError::Source(msg) => format!(
                "What happened: The advertisement source failed ({msg}).\nLikely causes: Bluetooth adapter unavailable, or the capture file disappeared mid-run.\nHow to fix: Check the adapter / capture path and rerun."
            ),
            WeighError::Timeout => "What happened: No advertisement arrived in time.\nLikely causes: Scale is off, out of range, or not broadcasting.\nHow to fix: Wake the scale by stepping on it and rerun.".to_string(),
            WeighError::State(msg) => format!(
                "What happened: {msg}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("capture csv must have headers") {
        return "Invalid headers in capture CSV. Expected 'offset_ms,local_name,data'.".to_string();
    }

    if lower.contains("hex") {
        return format!(
            "What happened: Could not decode hex bytes.\nLikely causes: Odd-length string or a non-hex character.\nHow to fix: Pass the manufacturer blob as plain hex, e.g. 010b5a000000555257533031. Original: {msg}"
        );
    }

    if lower.contains("failed to open capture") || lower.contains("no such file") {
        return format!(
            "What happened: Capture file could not be read.\nLikely causes: Wrong path or missing permissions.\nHow to fix: Check the path and rerun. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes for typed failures; everything else returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use weigh_core::WeighError;
    if let Some(we) = err.downcast_ref::<WeighError>() {
        return match we {
            WeighError::Source(_) => 3,
            WeighError::Timeout => 4,
            WeighError::State(_) => 5,
        };
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use weigh_core::WeighError;
    use serde_json::json;

    let reason = match err.downcast_ref::<WeighError>() {
        Some(WeighError::Source(_)) => "Source",
        Some(WeighError::Timeout) => "Timeout",
        Some(WeighError::State(_)) => "State",
        None => "Error",
    };
    json!({ "reason": reason, "message": humanize(err) }).to_string()
}
