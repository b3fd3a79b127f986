//! Quorum threshold computation.

/// Threshold used when no override is configured: 5 for rosters of five or
/// more, otherwise a simple majority.
pub fn default_threshold(roster_size: usize) -> usize {
    if roster_size >= 5 {
        5
    } else {
        (roster_size / 2 + 1).max(1)
    }
}

/// Apply an optional override, clamped to `[1, roster_size]`.
///
/// Out-of-range overrides are clamped rather than rejected.
pub fn resolve_threshold(roster_size: usize, override_value: Option<i64>) -> usize {
    let upper = roster_size.max(1);
    let wanted = match override_value {
        Some(v) if v < 1 => 1,
        Some(v) => usize::try_from(v).unwrap_or(usize::MAX),
        None => default_threshold(roster_size),
    };
    let resolved = wanted.clamp(1, upper);
    if let Some(v) = override_value {
        if usize::try_from(v).ok() != Some(resolved) {
            tracing::warn!(requested = v, applied = resolved, "quorum override clamped to roster size");
        }
    }
    resolved
}

/// Parse a textual override (e.g. from `POA_THRESHOLD`).
///
/// Unparseable values are ignored with a warning, so the default applies.
pub fn parse_threshold_override(raw: &str) -> Option<i64> {
    match raw.trim().parse::<i64>() {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(value = raw, error = %e, "ignoring unparseable quorum override");
            None
        }
    }
}
