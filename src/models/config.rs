use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// User configuration from `HashPilot Settings.yaml`
///
/// Remembers the hashcat executable and the last-used form values between
/// sessions. Every field is defaulted so a missing or partial file still
/// loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(rename = "HashPilot_Settings")]
    pub settings: HashcatSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashcatSettings {
    #[serde(rename = "Hashcat EXE", default = "default_hashcat_exe")]
    pub hashcat_exe: String,

    #[serde(rename = "Hash Type", default)]
    pub hash_type: u32,

    #[serde(rename = "Attack Mode", default)]
    pub attack_mode: u32,

    #[serde(rename = "Wordlist", default)]
    pub wordlist: String,

    #[serde(rename = "Mask", default)]
    pub mask: String,

    #[serde(rename = "Debug Mode", default)]
    pub debug_mode: bool,
}

impl Default for HashcatSettings {
    fn default() -> Self {
        Self {
            hashcat_exe: default_hashcat_exe(),
            hash_type: 0,
            attack_mode: 0,
            wordlist: String::new(),
            mask: String::new(),
            debug_mode: false,
        }
    }
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            settings: HashcatSettings::default(),
        }
    }
}

fn default_hashcat_exe() -> String {
    "hashcat".to_string()
}

/// Combo-box catalogs from `HashPilot Catalog.yaml`
///
/// Insertion order of the maps is the display order of the combo boxes, so
/// they are kept in [`IndexMap`]s. Keys are the numeric codes hashcat's CLI
/// defines; values are display names. Users can extend the hash type list
/// without touching code - the codes are passed through to hashcat opaquely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(rename = "HashPilot_Catalog")]
    pub catalog: Catalog,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "Hash_Types")]
    pub hash_types: IndexMap<u32, String>,

    #[serde(rename = "Attack_Modes")]
    pub attack_modes: IndexMap<u32, String>,
}

impl Catalog {
    /// Combo labels in catalog order, rendered as `<code> - <name>`.
    pub fn hash_type_labels(&self) -> Vec<String> {
        self.hash_types
            .iter()
            .map(|(code, name)| format!("{} - {}", code, name))
            .collect()
    }

    /// Combo labels in catalog order, rendered as `<code> - <name>`.
    pub fn attack_mode_labels(&self) -> Vec<String> {
        self.attack_modes
            .iter()
            .map(|(code, name)| format!("{} - {}", code, name))
            .collect()
    }

    /// Hash type code at the given combo index.
    pub fn hash_type_code_at(&self, index: usize) -> Option<u32> {
        self.hash_types.get_index(index).map(|(code, _)| *code)
    }

    /// Attack mode code at the given combo index.
    pub fn attack_mode_code_at(&self, index: usize) -> Option<u32> {
        self.attack_modes.get_index(index).map(|(code, _)| *code)
    }

    /// Combo index of a hash type code, if the catalog contains it.
    pub fn hash_type_index_of(&self, code: u32) -> Option<usize> {
        self.hash_types.get_index_of(&code)
    }

    /// Combo index of an attack mode code, if the catalog contains it.
    pub fn attack_mode_index_of(&self, code: u32) -> Option<usize> {
        self.attack_modes.get_index_of(&code)
    }
}
