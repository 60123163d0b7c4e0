use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let positive = [
        ("scoring.due_soon_window_days", config.due_soon_window_days),
        ("scoring.inactivity_due_soon_days", config.inactivity_due_soon_days),
        ("scoring.inactivity_overdue_days", config.inactivity_overdue_days),
    ];
    for (field, value) in positive {
        if let Some(days) = value {
            if days <= 0 {
                errors.push(format!("{}: must be a positive number of days, got {}", field, days));
            }
        }
    }

    // Checked on the effective windows so a lone override can still conflict with a default
    let windows = config.windows();
    if windows.inactivity_due_soon_days >= windows.inactivity_overdue_days {
        errors.push(format!(
            "scoring.inactivity_due_soon_days ({}) must be less than scoring.inactivity_overdue_days ({})",
            windows.inactivity_due_soon_days, windows.inactivity_overdue_days
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
