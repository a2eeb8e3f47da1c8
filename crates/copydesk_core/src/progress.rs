use crate::JobStatus;

/// Clamps into [0, 100]; NaN counts as 0.
pub fn clamp_progress(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Placeholder shown when neither the server nor history has a value.
pub fn fallback_progress(status: JobStatus) -> f64 {
    match status {
        JobStatus::Done => 100.0,
        JobStatus::Running => 60.0,
        JobStatus::Pending | JobStatus::Error => 5.0,
    }
}

/// Reported value, else the last known one, else the status heuristic.
pub fn display_progress(status: JobStatus, reported: Option<f64>, last_known: Option<f64>) -> u8 {
    let raw = reported
        .or(last_known)
        .unwrap_or_else(|| fallback_progress(status));
    clamp_progress(raw).round() as u8
}
