use regex::Regex;

/// A field recognized in a hashcat status report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// `Status...........: Running` - the session phase.
    Phase(String),
    /// `Recovered........: 1/1 (100.00%) Digests` - recovery progress.
    Recovered(String),
}

/// Scans console lines for hashcat's periodic status report fields.
///
/// Every line still reaches the console verbatim; the scanner only lifts
/// the `Status` and `Recovered` fields into the status strip. Patterns are
/// compiled once at construction.
pub struct StatusScanner {
    /// Matches "Status...........: <value>" report lines
    status_pattern: Regex,

    /// Matches "Recovered........: <value>" report lines
    recovered_pattern: Regex,
}

impl StatusScanner {
    pub fn new() -> Self {
        Self {
            status_pattern: Regex::new(r"^Status\.+:\s*(.+)$").expect("Invalid status regex"),
            recovered_pattern: Regex::new(r"^Recovered\.+:\s*(.+)$")
                .expect("Invalid recovered regex"),
        }
    }

    /// Check one output line for a status field.
    pub fn scan(&self, line: &str) -> Option<StatusUpdate> {
        if let Some(caps) = self.status_pattern.captures(line) {
            return Some(StatusUpdate::Phase(caps[1].trim().to_string()));
        }
        if let Some(caps) = self.recovered_pattern.captures(line) {
            return Some(StatusUpdate::Recovered(caps[1].trim().to_string()));
        }
        None
    }
}

impl Default for StatusScanner {
    fn default() -> Self {
        Self::new()
    }
}
