use super::types::{OutreachState, OUTREACH_STATE_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Default outreach state file (~/.config/retention-desk/outreach.json)
pub fn get_outreach_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("outreach.json"))
}

/// Load outreach state from a JSON file
///
/// A missing file yields an empty state. An unsupported version is an error.
pub fn load_outreach_state(path: &Path) -> Result<OutreachState> {
    if !path.exists() {
        return Ok(OutreachState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open outreach state file at {}", path.display()))?;

    let state: OutreachState =
        serde_json::from_reader(file).context("Failed to load outreach state")?;

    if state.version != OUTREACH_STATE_VERSION {
        anyhow::bail!("Unsupported outreach state version: {}", state.version);
    }

    Ok(state)
}

/// Save outreach state atomically, dropping expired entries first
pub fn save_outreach_state(path: &Path, state: &OutreachState) -> Result<()> {
    crate::config::ensure_parent_dir(path)?;

    let mut state = state.clone();
    state.clean_expired();

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, &state).context("Failed to serialize outreach state")?;

    file.commit().context("Failed to save outreach state")?;

    tracing::debug!(path = %path.display(), entries = state.snoozed.len(), "saved outreach state");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::env;

    #[test]
    fn test_load_missing_file_returns_empty() {
        let temp_path = env::temp_dir().join("retention_desk_test_outreach_missing.json");
        let _ = std::fs::remove_file(&temp_path);

        let state = load_outreach_state(&temp_path).unwrap();
        assert_eq!(state.version, 1);
        assert!(state.snoozed.is_empty());
    }

    #[test]
    fn test_save_drops_expired_entries() {
        let temp_path = env::temp_dir().join("retention_desk_test_outreach_roundtrip.json");
        let _ = std::fs::remove_file(&temp_path);

        let mut state = OutreachState::new();
        state.snooze("C-ACME".to_string(), None, Some("renewal call booked".to_string()));
        state.snooze("C-BETA".to_string(), Some(Utc::now() + Duration::days(2)), None);
        state.snooze("C-GAMMA".to_string(), Some(Utc::now() - Duration::days(1)), None);

        save_outreach_state(&temp_path, &state).unwrap();
        let loaded = load_outreach_state(&temp_path).unwrap();

        assert_eq!(loaded.snoozed.len(), 2);
        assert!(loaded.is_snoozed("C-ACME"));
        assert!(loaded.is_snoozed("C-BETA"));
        assert!(loaded.entry("C-GAMMA").is_none());

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_unsupported_version() {
        let temp_path = env::temp_dir().join("retention_desk_test_outreach_version.json");
        std::fs::write(&temp_path, r#"{"version":2,"snoozed":{}}"#).unwrap();

        let err = load_outreach_state(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Unsupported"));

        let _ = std::fs::remove_file(&temp_path);
    }
}
