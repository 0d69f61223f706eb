use crate::services::command::{AttackMode, CrackConfiguration, ValidationError, DEFAULT_HASHCAT_EXE};
use camino::Utf8PathBuf;

/// Single source of truth for all application state.
///
/// Holds the form configuration, the running-session flags, and the user
/// settings. Widget state is a projection of this struct, never the other
/// way around: launch requests read an explicit [`CrackConfiguration`]
/// snapshot via [`crack_configuration()`](Self::crack_configuration).
///
/// # Thread Safety
///
/// `AppState` is wrapped in `Arc<RwLock<AppState>>` by
/// [`crate::state::StateManager`]. Never access it directly - go through
/// [`read()`](crate::state::StateManager::read) and
/// [`update()`](crate::state::StateManager::update), which emit
/// [`StateChange`](crate::state::StateChange) events for the GUI.
#[derive(Clone, Debug)]
pub struct AppState {
    // Form configuration
    pub hash_file_path: Option<Utf8PathBuf>,
    pub hash_type: u32,
    pub attack_mode_code: u32,
    pub wordlist: String,
    pub mask: String,

    // Runtime session state
    pub is_running: bool,
    pub lines_received: usize,
    pub last_exit_code: Option<i32>,

    // Status strip (lifted from hashcat status report lines)
    pub status_phase: String,
    pub recovered: String,

    // Settings
    pub hashcat_exe: String,
    pub debug_mode: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            // Form configuration
            hash_file_path: None,
            hash_type: 0,
            attack_mode_code: 0,
            wordlist: String::new(),
            mask: String::new(),

            // Runtime session state
            is_running: false,
            lines_received: 0,
            last_exit_code: None,

            // Status strip
            status_phase: String::new(),
            recovered: String::new(),

            // Settings
            hashcat_exe: DEFAULT_HASHCAT_EXE.to_string(),
            debug_mode: false,
        }
    }
}

impl AppState {
    /// Whether the one required form field is filled in.
    pub fn is_hash_file_selected(&self) -> bool {
        self.hash_file_path
            .as_ref()
            .is_some_and(|p| !p.as_str().is_empty())
    }

    /// Build the immutable launch snapshot from the current form fields.
    ///
    /// # Errors
    ///
    /// `UnknownAttackMode` if the configured attack mode code is not one of
    /// the modes hashpilot models (0, 3, 6). Hash-file validation happens
    /// later, in [`CrackConfiguration::build_command`].
    pub fn crack_configuration(&self) -> Result<CrackConfiguration, ValidationError> {
        Ok(CrackConfiguration {
            hash_file: self.hash_file_path.clone(),
            hash_type: self.hash_type,
            attack_mode: AttackMode::from_code(self.attack_mode_code)?,
            wordlist: self.wordlist.clone(),
            mask: self.mask.clone(),
        })
    }

    /// Mark a session as started and clear per-session fields.
    pub fn begin_session(&mut self) {
        self.is_running = true;
        self.lines_received = 0;
        self.last_exit_code = None;
        self.status_phase.clear();
        self.recovered.clear();
    }

    /// Mark the running session as finished.
    pub fn end_session(&mut self, exit_code: Option<i32>) {
        self.is_running = false;
        self.last_exit_code = exit_code;
    }

    /// Reset everything session-related to initial values.
    pub fn reset_session_state(&mut self) {
        self.is_running = false;
        self.lines_received = 0;
        self.last_exit_code = None;
        self.status_phase.clear();
        self.recovered.clear();
    }
}
