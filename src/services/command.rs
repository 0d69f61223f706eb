use camino::Utf8PathBuf;
use thiserror::Error;

/// Default name of the hashcat executable when the user has not pointed
/// HashPilot at a specific binary.
pub const DEFAULT_HASHCAT_EXE: &str = "hashcat";

/// Interval in seconds passed to `--status-timer`. Fixed: the trailing
/// flag group is part of the command contract with hashcat.
pub const STATUS_TIMER_SECS: u32 = 2;

/// Errors produced while turning a configuration snapshot into a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no hash file selected")]
    MissingHashFile,

    #[error("unknown attack mode code: {0}")]
    UnknownAttackMode(u32),
}

/// Hashcat attack mode.
///
/// Only the three modes the form exposes are modeled; their codes are part
/// of hashcat's CLI contract. The mode decides which optional inputs are
/// meaningful: a wordlist feeds dictionary and hybrid attacks, a mask feeds
/// brute-force and hybrid attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackMode {
    /// `-a 0` - straight dictionary attack
    Straight,
    /// `-a 3` - mask brute force
    BruteForce,
    /// `-a 6` - hybrid dictionary + mask
    Hybrid,
}

impl AttackMode {
    /// Numeric code passed to hashcat's `-a` flag.
    pub fn code(self) -> u32 {
        match self {
            AttackMode::Straight => 0,
            AttackMode::BruteForce => 3,
            AttackMode::Hybrid => 6,
        }
    }

    /// Parse a numeric attack mode code.
    pub fn from_code(code: u32) -> Result<Self, ValidationError> {
        match code {
            0 => Ok(AttackMode::Straight),
            3 => Ok(AttackMode::BruteForce),
            6 => Ok(AttackMode::Hybrid),
            other => Err(ValidationError::UnknownAttackMode(other)),
        }
    }

    /// Whether a wordlist token belongs in the command for this mode.
    pub fn uses_wordlist(self) -> bool {
        matches!(self, AttackMode::Straight | AttackMode::Hybrid)
    }

    /// Whether a mask token belongs in the command for this mode.
    pub fn uses_mask(self) -> bool {
        matches!(self, AttackMode::BruteForce | AttackMode::Hybrid)
    }
}

/// Immutable snapshot of the user's crack configuration.
///
/// Built fresh from [`AppState`](crate::models::AppState) on every launch
/// request; the command builder never reads widget state directly. The hash
/// type code is passed through to hashcat opaquely - HashPilot attaches no
/// meaning to it beyond display labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrackConfiguration {
    pub hash_file: Option<Utf8PathBuf>,
    pub hash_type: u32,
    pub attack_mode: AttackMode,
    pub wordlist: String,
    pub mask: String,
}

impl CrackConfiguration {
    /// Build the hashcat launch command from this snapshot.
    ///
    /// Pure function of the snapshot: no side effects, and identical
    /// snapshots yield token-identical commands. Token order is a wire
    /// contract with hashcat:
    ///
    /// ```text
    /// <exe> -m <hash_type> -a <attack_mode> <hash_file>
    ///       [wordlist] [mask] --force --status --status-timer 2
    /// ```
    ///
    /// The wordlist appears only for dictionary/hybrid modes, the mask only
    /// for brute-force/hybrid modes, and both only when non-empty.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingHashFile`] when no hash file is set or the
    /// path is empty.
    pub fn build_command(&self, hashcat_exe: &str) -> Result<LaunchCommand, ValidationError> {
        let hash_file = self
            .hash_file
            .as_ref()
            .filter(|p| !p.as_str().is_empty())
            .ok_or(ValidationError::MissingHashFile)?;

        let mut args = vec![
            "-m".to_string(),
            self.hash_type.to_string(),
            "-a".to_string(),
            self.attack_mode.code().to_string(),
            hash_file.to_string(),
        ];

        let wordlist = self.wordlist.trim();
        if self.attack_mode.uses_wordlist() && !wordlist.is_empty() {
            args.push(wordlist.to_string());
        }

        let mask = self.mask.trim();
        if self.attack_mode.uses_mask() && !mask.is_empty() {
            args.push(mask.to_string());
        }

        args.push("--force".to_string());
        args.push("--status".to_string());
        args.push("--status-timer".to_string());
        args.push(STATUS_TIMER_SECS.to_string());

        Ok(LaunchCommand {
            program: hashcat_exe.to_string(),
            args,
        })
    }
}

/// An ordered, immutable command token sequence ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    program: String,
    args: Vec<String>,
}

impl LaunchCommand {
    /// Assemble a command directly from tokens. Normal code goes through
    /// [`CrackConfiguration::build_command`]; this exists for the monitor
    /// layer and its tests, which launch arbitrary scripted programs.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Space-joined rendering for display in the output console.
    pub fn display(&self) -> String {
        let mut s = self.program.clone();
        for arg in &self.args {
            s.push(' ');
            s.push_str(arg);
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: AttackMode) -> CrackConfiguration {
        CrackConfiguration {
            hash_file: Some(Utf8PathBuf::from("/tmp/hashes.txt")),
            hash_type: 100,
            attack_mode: mode,
            wordlist: String::new(),
            mask: String::new(),
        }
    }

    #[test]
    fn test_straight_mode_token_order() {
        let mut cfg = config(AttackMode::Straight);
        cfg.wordlist = "/usr/share/wordlists/rockyou.txt".to_string();

        let cmd = cfg.build_command(DEFAULT_HASHCAT_EXE).unwrap();
        assert_eq!(cmd.program(), "hashcat");
        assert_eq!(
            cmd.args(),
            &[
                "-m",
                "100",
                "-a",
                "0",
                "/tmp/hashes.txt",
                "/usr/share/wordlists/rockyou.txt",
                "--force",
                "--status",
                "--status-timer",
                "2",
            ]
        );
    }

    #[test]
    fn test_straight_mode_ignores_mask() {
        let mut cfg = config(AttackMode::Straight);
        cfg.wordlist = "words.txt".to_string();
        cfg.mask = "?l?l?l?l".to_string();

        let cmd = cfg.build_command(DEFAULT_HASHCAT_EXE).unwrap();
        assert!(!cmd.args().iter().any(|a| a == "?l?l?l?l"));
        // Wordlist immediately follows the hash file path
        let file_pos = cmd.args().iter().position(|a| a == "/tmp/hashes.txt").unwrap();
        assert_eq!(cmd.args()[file_pos + 1], "words.txt");
    }

    #[test]
    fn test_brute_force_ignores_wordlist() {
        let mut cfg = config(AttackMode::BruteForce);
        cfg.wordlist = "words.txt".to_string();
        cfg.mask = "?d?d?d?d".to_string();

        let cmd = cfg.build_command(DEFAULT_HASHCAT_EXE).unwrap();
        assert!(cmd.args().iter().any(|a| a == "?d?d?d?d"));
        assert!(!cmd.args().iter().any(|a| a == "words.txt"));
    }

    #[test]
    fn test_hybrid_wordlist_precedes_mask() {
        let mut cfg = config(AttackMode::Hybrid);
        cfg.wordlist = "words.txt".to_string();
        cfg.mask = "?d?d".to_string();

        let cmd = cfg.build_command(DEFAULT_HASHCAT_EXE).unwrap();
        let wl = cmd.args().iter().position(|a| a == "words.txt").unwrap();
        let mask = cmd.args().iter().position(|a| a == "?d?d").unwrap();
        assert!(wl < mask);
    }

    #[test]
    fn test_missing_hash_file_rejected() {
        let mut cfg = config(AttackMode::Straight);
        cfg.hash_file = None;
        assert_eq!(
            cfg.build_command(DEFAULT_HASHCAT_EXE),
            Err(ValidationError::MissingHashFile)
        );

        cfg.hash_file = Some(Utf8PathBuf::from(""));
        assert_eq!(
            cfg.build_command(DEFAULT_HASHCAT_EXE),
            Err(ValidationError::MissingHashFile)
        );
    }

    #[test]
    fn test_empty_optional_fields_omitted() {
        let cmd = config(AttackMode::Hybrid).build_command(DEFAULT_HASHCAT_EXE).unwrap();
        assert_eq!(
            cmd.args(),
            &[
                "-m",
                "100",
                "-a",
                "6",
                "/tmp/hashes.txt",
                "--force",
                "--status",
                "--status-timer",
                "2",
            ]
        );
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut cfg = config(AttackMode::Hybrid);
        cfg.wordlist = "words.txt".to_string();
        cfg.mask = "?a?a".to_string();

        let first = cfg.build_command(DEFAULT_HASHCAT_EXE).unwrap();
        let second = cfg.build_command(DEFAULT_HASHCAT_EXE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_attack_mode_codes() {
        assert_eq!(AttackMode::Straight.code(), 0);
        assert_eq!(AttackMode::BruteForce.code(), 3);
        assert_eq!(AttackMode::Hybrid.code(), 6);

        assert_eq!(AttackMode::from_code(0), Ok(AttackMode::Straight));
        assert_eq!(AttackMode::from_code(3), Ok(AttackMode::BruteForce));
        assert_eq!(AttackMode::from_code(6), Ok(AttackMode::Hybrid));
        assert_eq!(
            AttackMode::from_code(7),
            Err(ValidationError::UnknownAttackMode(7))
        );
    }

    #[test]
    fn test_display_joins_tokens() {
        let cmd = LaunchCommand::new("hashcat", vec!["-m".into(), "0".into()]);
        assert_eq!(cmd.display(), "hashcat -m 0");
    }
}
