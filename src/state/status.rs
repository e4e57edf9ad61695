use egui::Color32;

/// Transient message shown in the corner of the editor
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    shown_at: f64,
    lifetime: f64,
}

impl StatusMessage {
    pub const SAVED: &'static str = "Design saved";
    pub const SAVE_FAILED: &'static str = "Error saving design";
    pub const RESTORED: &'static str = "Design restored";
    pub const RESTORE_FAILED: &'static str = "Error restoring design";

    pub fn info(text: impl Into<String>, now: f64, lifetime: f64) -> Self {
        Self {
            text: text.into(),
            is_error: false,
            shown_at: now,
            lifetime,
        }
    }

    pub fn error(text: impl Into<String>, now: f64, lifetime: f64) -> Self {
        Self {
            is_error: true,
            ..Self::info(text, now, lifetime)
        }
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now - self.shown_at >= self.lifetime
    }

    pub fn background(&self) -> Color32 {
        if self.is_error {
            Color32::from_rgb(0xf4, 0x43, 0x36)
        } else {
            Color32::from_rgb(0x4c, 0xaf, 0x50)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expires_after_lifetime() {
        let msg = StatusMessage::error(StatusMessage::SAVE_FAILED, 10.0, 3.0);
        assert!(!msg.is_expired(12.9));
        assert!(msg.is_expired(13.0));
        assert_eq!(msg.background(), Color32::from_rgb(244, 67, 54));
    }
}
