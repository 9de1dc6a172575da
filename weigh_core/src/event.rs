//! Stabilizer output reported for each fed sample.

/// Outcome of feeding one reading into the stabilizer.
///
/// Exactly four cases, no extensibility intended: consumers are expected to
/// match exhaustively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StabilizerEvent {
    /// Sample was ignored (below the minimum weight); nothing to report.
    None,
    /// Still gathering a stable window; `samples` is the current buffer fill.
    Measuring { current: f64, samples: usize },
    /// Window is stable and being held to confirm; `progress` is in [0, 1].
    Confirming { current: f64, progress: f64 },
    /// Confirmation completed; `weight_lbs` is the final value
    /// (mean of the confirmation buffer, rounded to one decimal).
    Settled { weight_lbs: f64 },
}
