use crate::config::AutosaveConfig;

/// Why a save is due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveReason {
    /// The periodic interval elapsed
    Interval,
    /// The editor has been quiet for the debounce period after a change
    Debounced,
    /// The app is shutting down
    Exit,
}

/// Decides when the session should be written to storage.
///
/// Changes are observed through the dirty generation counter: a new value
/// starts (or restarts) the debounce window.
#[derive(Debug, Clone)]
pub struct Autosave {
    interval: f64,
    debounce: f64,
    last_save: f64,
    seen_generation: u64,
    changed_at: Option<f64>,
}

impl Autosave {
    pub fn new(config: &AutosaveConfig, now: f64) -> Self {
        Self {
            interval: config.interval_secs,
            debounce: config.debounce_secs,
            last_save: now,
            seen_generation: 0,
            changed_at: None,
        }
    }

    /// Look at the current dirty generation and report whether to save now
    pub fn tick(&mut self, generation: u64, now: f64) -> Option<SaveReason> {
        if generation != self.seen_generation {
            self.seen_generation = generation;
            self.changed_at = Some(now);
        }

        if let Some(changed_at) = self.changed_at {
            if now - changed_at >= self.debounce {
                return Some(SaveReason::Debounced);
            }
        }
        if now - self.last_save >= self.interval {
            return Some(SaveReason::Interval);
        }
        None
    }

    /// Record a completed (or attempted) save
    pub fn mark_saved(&mut self, now: f64) {
        self.last_save = now;
        self.changed_at = None;
    }

    pub fn has_pending_change(&self) -> bool {
        self.changed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn autosave() -> Autosave {
        Autosave::new(&AutosaveConfig::default(), 0.0)
    }

    #[test]
    fn change_is_saved_after_quiet_period() {
        let mut autosave = autosave();
        assert_eq!(autosave.tick(1, 5.0), None);
        assert_eq!(autosave.tick(1, 5.5), None);
        assert_eq!(autosave.tick(1, 6.0), Some(SaveReason::Debounced));
        autosave.mark_saved(6.0);
        assert_eq!(autosave.tick(1, 7.5), None);
    }

    #[test]
    fn new_change_restarts_debounce() {
        let mut autosave = autosave();
        autosave.tick(1, 1.0);
        autosave.tick(2, 1.8);
        assert_eq!(autosave.tick(2, 2.5), None);
        assert_eq!(autosave.tick(2, 3.0), Some(SaveReason::Debounced));
    }

    #[test]
    fn interval_saves_without_changes() {
        let mut autosave = autosave();
        assert_eq!(autosave.tick(0, 29.0), None);
        assert_eq!(autosave.tick(0, 30.0), Some(SaveReason::Interval));
        autosave.mark_saved(30.0);
        assert!(!autosave.has_pending_change());
        assert_eq!(autosave.tick(0, 45.0), None);
    }
}
