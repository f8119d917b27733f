use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use slurm_core::version::{parse_version, strip_version_prefix, version_prefix};

use crate::errors::ConfigError;
use crate::models::TypeExpr;
use crate::naming::NamingRules;

pub const DEFAULT_DESCRIPTION_MAX_LENGTH: usize = 80;
pub const DEFAULT_DESCRIPTION_MIN_CUTOFF: usize = 40;

const TIMESTAMP_FIELDS: &[&str] = &[
    "boot_time",
    "last_busy",
    "eligible_time",
    "end_time",
    "start_time",
    "submit_time",
    "deadline",
    "preempt_time",
    "suspend_time",
    "resume_time",
    "reason_changed_at",
    "slurmd_start_time",
    "tls_cert_last_renewal",
    "accrue_time",
    "resize_time",
    "last_sched_evaluation",
    "created_time",
    "modified_time",
    "creation_time",
    "preemptable_time",
];

const DURATION_FIELDS: &[&str] = &[
    "time",
    "time_limit",
    "time_minimum",
    "grace_time",
    "pre_sus_time",
    "maximum_switch_wait_time",
    "total_time",
    "average_time",
    "gettimeofday_latency",
    "resume_timeout",
    "suspend_timeout",
];

const FRIENDLY_OVERRIDES: &[(&str, &str)] = &[
    ("assoc", "Association"),
    ("cluster_rec", "Cluster"),
    ("job_info", "Job"),
    ("partition_info", "Partition"),
    ("reservation_info", "Reservation"),
    ("acct_gather_energy", "NodeEnergy"),
    ("process_exit_code_verbose", "ExitCode"),
    ("slurm_step_id", "StepID"),
    ("part_prio", "JobPartitionPriority"),
    ("job_res", "JobResources"),
    ("wckey", "WCKey"),
    ("assoc_short", "AssocShort"),
    ("tres", "TRES"),
    ("job_res_node", "JobResNode"),
    ("job_res_socket", "JobResSocket"),
    ("job_res_core", "JobResCore"),
];

const PRIMITIVE_UNWRAP_PATTERNS: &[(&str, &str)] = &[
    ("uint32_no_val", "uint32"),
    ("uint64_no_val", "uint64"),
    ("uint16_no_val", "uint16"),
    ("int32_no_val", "int32"),
    ("float64_no_val", "float64"),
    ("csv_string", "[]string"),
    ("string_array", "[]string"),
    ("string_list", "[]string"),
    ("hostlist_string", "[]string"),
    ("hostlist", "[]string"),
];

const BASE_ENTITIES: &[(&str, &str)] = &[
    ("job_info", "Job"),
    ("node", "Node"),
    ("account", "Account"),
    ("user", "User"),
    ("partition_info", "Partition"),
    ("qos", "QoS"),
    ("reservation_info", "Reservation"),
    ("assoc", "Association"),
    ("cluster_rec", "Cluster"),
];

const AUXILIARY_TYPES: &[(&str, &str)] = &[
    ("accounting", "Accounting"),
    ("assoc_short", "AssocShort"),
    ("coord", "Coord"),
    ("tres", "TRES"),
    ("job_res", "JobResources"),
    ("acct_gather_energy", "NodeEnergy"),
    ("process_exit_code_verbose", "ExitCode"),
    ("slurm_step_id", "StepID"),
    ("reservation_core_spec", "ReservationCoreSpec"),
    ("part_prio", "JobPartitionPriority"),
    ("wckey", "WCKey"),
    ("job_res_node", "JobResNode"),
    ("job_res_socket", "JobResSocket"),
    ("job_res_core", "JobResCore"),
];

const ENUM_TYPE_OVERRIDES: &[(&str, &str, &str)] = &[
    ("node", "state", "NodeState"),
    ("node", "next_state_after_reboot", "NodeState"),
    ("job", "job_state", "JobState"),
    ("partition", "state", "PartitionState"),
];

const WRITE_ENTITIES: &[(&str, &str)] = &[("job_desc_msg", "JobCreate")];

const TYPE_UNWRAP: &[(&str, &str)] = &[
    ("uint32_no_val_struct", "uint32"),
    ("uint64_no_val_struct", "uint64"),
    ("uint16_no_val_struct", "uint16"),
    ("int32_no_val_struct", "int32"),
    ("float64_no_val_struct", "float64"),
    ("csv_string", "[]string"),
    ("string_array", "[]string"),
    ("accounting_list", "[]Accounting"),
    ("assoc_short_list", "[]AssocShort"),
    ("coord_list", "[]Coord"),
    ("qos_string_id_list", "[]string"),
    ("tres_list", "[]TRES"),
    ("job_info_gres_detail", "[]string"),
    ("priority_by_partition", "[]JobPartitionPriority"),
    ("qos_preempt_list", "[]string"),
    ("job_res_nodes", "[]JobResNode"),
    ("reservation_info_core_spec", "[]ReservationCoreSpec"),
    ("wckey_list", "[]WCKey"),
    ("job_res_socket_array", "[]JobResSocket"),
    ("job_res_core_array", "[]JobResCore"),
];

/// Enums that already exist in the read-model output and must not be
/// emitted again when generating write types.
const WRITE_KNOWN_ENUM_TYPES: &[&str] = &[
    "FlagsValue",
    "MailTypeValue",
    "ProfileValue",
    "SharedValue",
    "JobState",
    "NodeState",
    "PartitionState",
];

fn string_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn string_set(entries: &[&str]) -> BTreeSet<String> {
    entries.iter().map(|e| e.to_string()).collect()
}

/// One section of the config document. Every key is optional; whatever is
/// present is layered onto the built-in tables by [`TypeConfig::merge`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    pub timestamp_fields: Option<BTreeSet<String>>,
    pub duration_fields: Option<BTreeSet<String>>,
    pub friendly_overrides: BTreeMap<String, String>,
    pub primitive_unwrap_patterns: Option<BTreeMap<String, String>>,
    pub base_entities: BTreeMap<String, String>,
    pub auxiliary_types: BTreeMap<String, String>,
    pub type_unwrap: BTreeMap<String, String>,
    pub enum_type_overrides: BTreeMap<String, String>,
    pub write_entities: BTreeMap<String, String>,
    pub write_auxiliary_types: BTreeMap<String, String>,
    pub acronyms: BTreeMap<String, String>,
    pub noise_tokens: Option<BTreeSet<String>>,
    pub known_enum_types: Option<BTreeSet<String>>,
    pub description_max_length: Option<usize>,
    pub description_min_cutoff: Option<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigDocument {
    pub defaults: ConfigLayer,
    pub versions: BTreeMap<String, ConfigLayer>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypeConfig {
    pub version: String,
    pub timestamp_fields: BTreeSet<String>,
    pub duration_fields: BTreeSet<String>,
    pub friendly_overrides: BTreeMap<String, String>,
    /// Longest pattern first, so `hostlist_string` is tried before `hostlist`.
    pub primitive_unwrap_patterns: Vec<(String, TypeExpr)>,
    pub base_entities: BTreeMap<String, String>,
    pub auxiliary_types: BTreeMap<String, String>,
    /// Keyed by lower-cased schema name without the version prefix.
    pub type_unwrap: BTreeMap<String, TypeExpr>,
    /// Keyed by (lower-cased owning type name, wire name).
    pub enum_type_overrides: BTreeMap<(String, String), String>,
    pub write_entities: BTreeMap<String, String>,
    pub write_auxiliary_types: BTreeMap<String, String>,
    pub known_enum_types: BTreeSet<String>,
    pub naming: NamingRules,
    pub description_max_length: usize,
    pub description_min_cutoff: usize,
}

impl TypeConfig {
    pub fn defaults(version: &str) -> Self {
        let mut config = Self {
            version: version.to_string(),
            timestamp_fields: string_set(TIMESTAMP_FIELDS),
            duration_fields: string_set(DURATION_FIELDS),
            friendly_overrides: string_map(FRIENDLY_OVERRIDES),
            primitive_unwrap_patterns: Vec::new(),
            base_entities: string_map(BASE_ENTITIES),
            auxiliary_types: string_map(AUXILIARY_TYPES),
            type_unwrap: TYPE_UNWRAP
                .iter()
                .map(|(k, v)| (k.to_string(), TypeExpr::parse(v)))
                .collect(),
            enum_type_overrides: ENUM_TYPE_OVERRIDES
                .iter()
                .map(|(owner, field, name)| ((owner.to_string(), field.to_string()), name.to_string()))
                .collect(),
            write_entities: string_map(WRITE_ENTITIES),
            write_auxiliary_types: BTreeMap::new(),
            known_enum_types: string_set(WRITE_KNOWN_ENUM_TYPES),
            naming: NamingRules::default(),
            description_max_length: DEFAULT_DESCRIPTION_MAX_LENGTH,
            description_min_cutoff: DEFAULT_DESCRIPTION_MIN_CUTOFF,
        };
        config.set_primitive_patterns(
            PRIMITIVE_UNWRAP_PATTERNS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        config
    }

    /// Reads the YAML document at `path`. A missing file yields the defaults.
    pub fn load(path: Option<&Path>, version: &str) -> Result<Self, ConfigError> {
        let Some(path) = path.filter(|p| p.exists()) else {
            tracing::debug!(version, "no config document, using built-in tables");
            return Ok(Self::defaults(version));
        };

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_yaml_str(&raw, &path.display().to_string(), version)?;
        tracing::info!(path = %path.display(), version, "loaded config document");

        Ok(config)
    }

    pub fn from_yaml_str(raw: &str, source_name: &str, version: &str) -> Result<Self, ConfigError> {
        let mut config = Self::defaults(version);
        if raw.trim().is_empty() {
            return Ok(config);
        }

        let document: ConfigDocument =
            serde_yaml::from_str(raw).map_err(|source| ConfigError::Malformed {
                source_name: source_name.to_string(),
                source,
            })?;

        config.merge(document.defaults)?;
        if let Some(layer) = document.versions.get(version) {
            config.merge(layer.clone())?;
        }

        Ok(config)
    }

    /// Layers `layer` over the current tables: sets and pattern lists are
    /// replaced when present, maps are shadowed key by key.
    pub fn merge(&mut self, layer: ConfigLayer) -> Result<(), ConfigError> {
        if let Some(fields) = layer.timestamp_fields {
            self.timestamp_fields = fields;
        }
        if let Some(fields) = layer.duration_fields {
            self.duration_fields = fields;
        }
        if let Some(patterns) = layer.primitive_unwrap_patterns {
            self.set_primitive_patterns(patterns);
        }
        if let Some(tokens) = layer.noise_tokens {
            self.naming.noise_tokens = tokens;
        }
        if let Some(known) = layer.known_enum_types {
            self.known_enum_types = known;
        }
        if let Some(max) = layer.description_max_length {
            self.description_max_length = max;
        }
        if let Some(cutoff) = layer.description_min_cutoff {
            self.description_min_cutoff = cutoff;
        }

        self.friendly_overrides.extend(layer.friendly_overrides);
        self.base_entities.extend(layer.base_entities);
        self.auxiliary_types.extend(layer.auxiliary_types);
        self.write_entities.extend(layer.write_entities);
        self.write_auxiliary_types.extend(layer.write_auxiliary_types);
        self.naming.acronyms.extend(
            layer
                .acronyms
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v)),
        );

        for (key, value) in layer.type_unwrap {
            self.type_unwrap
                .insert(normalize_unwrap_key(&key), TypeExpr::parse(&value));
        }

        for (key, name) in layer.enum_type_overrides {
            let Some((owner, field)) = key.split_once('.') else {
                return Err(ConfigError::InvalidEnumOverrideKey(key));
            };
            if owner.is_empty() || field.is_empty() || field.contains('.') {
                return Err(ConfigError::InvalidEnumOverrideKey(key));
            }
            self.enum_type_overrides
                .insert((owner.to_lowercase(), field.to_string()), name);
        }

        Ok(())
    }

    fn set_primitive_patterns<I>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut patterns = patterns
            .into_iter()
            .map(|(pattern, replacement)| (pattern, TypeExpr::parse(&replacement)))
            .collect::<Vec<_>>();
        patterns.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        self.primitive_unwrap_patterns = patterns;
    }

    pub fn version_prefix(&self) -> String {
        version_prefix(&self.version)
    }

    pub fn strip_prefix<'a>(&self, schema_name: &'a str) -> &'a str {
        strip_version_prefix(schema_name, &self.version_prefix())
    }

    pub fn is_timestamp_field(&self, wire_name: &str) -> bool {
        self.timestamp_fields.contains(wire_name) && !self.duration_fields.contains(wire_name)
    }

    /// Explicit unwrap entry for a referenced schema, compared case-insensitively.
    pub fn unwrap_for(&self, schema_name: &str) -> Option<&TypeExpr> {
        self.type_unwrap.get(&normalize_unwrap_key(schema_name))
    }

    pub fn primitive_replacement(&self, schema_name: &str) -> Option<&TypeExpr> {
        let stripped = self.strip_prefix(schema_name);
        self.primitive_unwrap_patterns
            .iter()
            .find(|(pattern, _)| stripped.contains(pattern.as_str()))
            .map(|(_, replacement)| replacement)
    }

    pub fn matches_primitive_pattern(&self, schema_name: &str) -> bool {
        self.primitive_replacement(schema_name).is_some()
    }

    /// Override table first, then the naming rules.
    pub fn friendly_name(&self, schema_name: &str) -> String {
        let stripped = self.strip_prefix(schema_name);
        match self.friendly_overrides.get(stripped) {
            Some(name) => name.clone(),
            None => self.naming.type_name(stripped),
        }
    }

    pub fn enum_override(&self, owner_type: &str, wire_name: &str) -> Option<&str> {
        self.enum_type_overrides
            .get(&(owner_type.to_lowercase(), wire_name.to_string()))
            .map(String::as_str)
    }

    fn prefixed<'a, I>(&self, tables: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = &'a BTreeMap<String, String>>,
    {
        let prefix = self.version_prefix();
        tables
            .into_iter()
            .flatten()
            .map(|(name, type_name)| (format!("{prefix}{name}"), type_name.clone()))
            .collect()
    }

    pub fn base_schemas(&self) -> BTreeMap<String, String> {
        self.prefixed([&self.base_entities])
    }

    pub fn auxiliary_schemas(&self) -> BTreeMap<String, String> {
        self.prefixed([&self.auxiliary_types])
    }

    pub fn write_schemas(&self) -> BTreeMap<String, String> {
        self.prefixed([&self.write_entities, &self.write_auxiliary_types])
    }
}

/// `V0.0.44_CSV_String` -> `csv_string`.
fn normalize_unwrap_key(schema_name: &str) -> String {
    let lower = schema_name.to_lowercase();
    match parse_version(&lower) {
        Some(version) => lower[version.len() + 2..].to_string(),
        None => lower,
    }
}
