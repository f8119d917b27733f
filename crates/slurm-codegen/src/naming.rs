use std::collections::{BTreeMap, BTreeSet};

use convert_case::{Case, Casing};

pub const ENUM_TYPE_SUFFIX: &str = "Value";
pub const GENERATED_FILE_SUFFIX: &str = ".gen.go";
pub const UNKNOWN_TYPE_NAME: &str = "Unknown";

const DEFAULT_ACRONYMS: &[(&str, &str)] = &[
    ("id", "ID"),
    ("ids", "IDs"),
    ("url", "URL"),
    ("urls", "URLs"),
    ("uri", "URI"),
    ("uris", "URIs"),
    ("ip", "IP"),
    ("ips", "IPs"),
    ("os", "OS"),
    ("cpu", "CPU"),
    ("cpus", "CPUs"),
    ("gpu", "GPU"),
    ("gpus", "GPUs"),
    ("api", "API"),
    ("http", "HTTP"),
    ("https", "HTTPS"),
    ("ssh", "SSH"),
    ("tls", "TLS"),
    ("ssl", "SSL"),
    ("tcp", "TCP"),
    ("udp", "UDP"),
    ("dns", "DNS"),
    ("io", "IO"),
    ("uid", "UID"),
    ("gid", "GID"),
    ("pid", "PID"),
    ("ram", "RAM"),
    ("sql", "SQL"),
    ("json", "JSON"),
    ("xml", "XML"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("uuid", "UUID"),
    ("ascii", "ASCII"),
    ("utf", "UTF"),
    ("qos", "QoS"),
    ("tres", "TRES"),
    ("mcs", "MCS"),
    ("oci", "OCI"),
    ("gres", "GRES"),
];

const DEFAULT_NOISE_TOKENS: &[&str] = &["info"];

/// Casing table and noise-token rule used to turn underscore-delimited
/// schema identifiers into Go identifiers.
#[derive(Clone, Debug, PartialEq)]
pub struct NamingRules {
    pub acronyms: BTreeMap<String, String>,
    pub noise_tokens: BTreeSet<String>,
}

impl Default for NamingRules {
    fn default() -> Self {
        Self {
            acronyms: DEFAULT_ACRONYMS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            noise_tokens: DEFAULT_NOISE_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl NamingRules {
    fn case_token(&self, token: &str) -> String {
        let lower = token.to_lowercase();
        match self.acronyms.get(&lower) {
            Some(acronym) => acronym.clone(),
            None => capitalize(&lower),
        }
    }

    /// `array_job_id` -> `ArrayJobID`.
    pub fn field_name(&self, wire_name: &str) -> String {
        wire_name.split('_').map(|t| self.case_token(t)).collect()
    }

    /// Type name for an already prefix-stripped schema name, dropping noise
    /// tokens: `some_other_info` -> `SomeOther`.
    pub fn type_name(&self, stripped_schema_name: &str) -> String {
        let name = stripped_schema_name
            .split('_')
            .filter(|t| !self.noise_tokens.contains(&t.to_lowercase()))
            .map(|t| self.case_token(t))
            .collect::<String>();

        if name.is_empty() {
            UNKNOWN_TYPE_NAME.to_string()
        } else {
            name
        }
    }

    pub fn enum_type_name(&self, wire_name: &str) -> String {
        format!("{}{}", self.field_name(wire_name), ENUM_TYPE_SUFFIX)
    }

    /// `(JobStateValue, "NODE_FAIL")` -> `JobStateNodeFail`.
    pub fn enum_const_name(&self, enum_name: &str, value: &str) -> String {
        let cleaned = value
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect::<String>();

        let suffix = cleaned
            .split('_')
            .filter(|t| !t.is_empty())
            .map(|t| self.case_token(t))
            .collect::<String>();

        format!("{}{}", enum_hint(enum_name), suffix)
    }
}

/// Enum name without its `Value` suffix.
pub fn enum_hint(enum_name: &str) -> &str {
    enum_name.strip_suffix(ENUM_TYPE_SUFFIX).unwrap_or(enum_name)
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn file_name(type_name: &str) -> String {
    format!("{}{}", type_name.to_case(Case::Flat), GENERATED_FILE_SUFFIX)
}

/// Cuts `description` to `max_length` characters, preferring the last word
/// boundary after `min_cutoff`. An ellipsis marks any truncation.
pub fn truncate_description(description: &str, max_length: usize, min_cutoff: usize) -> String {
    let chars = description.chars().collect::<Vec<_>>();
    if chars.len() <= max_length {
        return description.to_string();
    }

    let head = &chars[..max_length];
    let cut = match head.iter().rposition(|c| *c == ' ') {
        Some(space) if space > min_cutoff => space,
        _ => max_length,
    };

    format!("{}...", chars[..cut].iter().collect::<String>())
}
