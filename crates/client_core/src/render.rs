//! Render state for the two board surfaces. Each component owns exactly one
//! surface and rewrites it in full, so the slot texts and the active
//! indicator always come from the same poll result.

use shared::domain::StatusSnapshot;

pub const PENDING_TEXT: &str = "⏳ Wysyłanie pliku...";
pub const SUCCESS_TEXT: &str = "✅ Plik został nadpisany pomyślnie";
pub const GENERIC_UPLOAD_ERROR: &str = "Błąd wysyłania pliku";
pub const NO_ACTIVE_ENTRY: &str = "Brak aktywnego przekierowania";
pub const NO_UPCOMING_ENTRY: &str = "Brak kolejnych wpisów";
pub const READ_ERROR: &str = "Błąd odczytu";

const ERROR_PREFIX: &str = "❌ ";
const EMPTY_SLOT: &str = "—";

/// Upload lifecycle: idle → pending → {success, error}. Pending is never
/// skipped and is always finalized by exactly one terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    Idle,
    Pending,
    Success,
    Error,
}

/// The status-message surface owned by the upload side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBanner {
    pub text: String,
    pub phase: UploadPhase,
    pub visible: bool,
}

impl Default for UploadBanner {
    fn default() -> Self {
        Self {
            text: String::new(),
            phase: UploadPhase::Idle,
            visible: false,
        }
    }
}

impl UploadBanner {
    pub(crate) fn set_pending(&mut self) {
        self.text = PENDING_TEXT.to_string();
        self.phase = UploadPhase::Pending;
        self.visible = true;
    }

    pub(crate) fn set_success(&mut self) {
        self.text = SUCCESS_TEXT.to_string();
        self.phase = UploadPhase::Success;
        self.visible = true;
    }

    pub(crate) fn set_error(&mut self, message: &str) {
        self.text = format!("{ERROR_PREFIX}{message}");
        self.phase = UploadPhase::Error;
        self.visible = true;
    }
}

/// The two display slots plus the active indicator, owned by the poller.
/// Invariant: `active_indicator` is true iff the last rendered snapshot had a
/// current entry; it is never written independently of `current_slot`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBoard {
    pub current_slot: String,
    pub next_slot: String,
    pub active_indicator: bool,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self {
            current_slot: EMPTY_SLOT.to_string(),
            next_slot: EMPTY_SLOT.to_string(),
            active_indicator: false,
        }
    }
}

impl StatusBoard {
    pub(crate) fn render_snapshot(&mut self, snapshot: &StatusSnapshot) {
        match &snapshot.current {
            Some(entry) => {
                self.current_slot = format!("{} • do {}", entry.person, entry.end);
                self.active_indicator = true;
            }
            None => {
                self.current_slot = NO_ACTIVE_ENTRY.to_string();
                self.active_indicator = false;
            }
        }
        self.next_slot = match &snapshot.next {
            Some(entry) => format!("{} • od {}", entry.person, entry.start),
            None => NO_UPCOMING_ENTRY.to_string(),
        };
    }

    /// Full-surface fallback: both slots get the error placeholder and the
    /// indicator is forced hidden, never a partial update.
    pub(crate) fn render_failure(&mut self) {
        self.current_slot = READ_ERROR.to_string();
        self.next_slot = READ_ERROR.to_string();
        self.active_indicator = false;
    }
}
