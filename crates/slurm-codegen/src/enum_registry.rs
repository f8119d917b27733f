use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::TypeConfig;
use crate::models::EnumType;
use crate::naming::ENUM_TYPE_SUFFIX;

/// Run-scoped store of enum types.
///
/// Entries are only ever added (or, for semantic overrides, replaced) within
/// a run. Fields declaring the same set of members share one entry unless a
/// semantic override names the type explicitly. Call [`EnumRegistry::reset`]
/// before every independent generation run.
#[derive(Debug, Default)]
pub struct EnumRegistry {
    entries: Vec<EnumType>,
    by_name: HashMap<String, usize>,
    by_values: BTreeMap<BTreeSet<String>, usize>,
    known: BTreeSet<String>,
    pending: BTreeSet<String>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that treats `known` as already defined by an earlier run.
    pub fn with_known(known: BTreeSet<String>) -> Self {
        Self {
            known,
            ..Self::default()
        }
    }

    pub fn reset(&mut self, known: BTreeSet<String>) {
        *self = Self::with_known(known);
    }

    pub fn resolve(
        &mut self,
        config: &TypeConfig,
        owner_type: &str,
        wire_name: &str,
        values: &[String],
    ) -> String {
        let value_set = values.iter().cloned().collect::<BTreeSet<_>>();

        if let Some(name) = config.enum_override(owner_type, wire_name) {
            return self.resolve_semantic(name, values, value_set);
        }

        let default_name = config.naming.enum_type_name(wire_name);
        if self.known.contains(&default_name) {
            return default_name;
        }

        if let Some(&idx) = self.by_values.get(&value_set) {
            let existing = &self.entries[idx].name;
            tracing::debug!(
                owner = owner_type,
                field = wire_name,
                enum_name = %existing,
                "reusing enum with identical members"
            );
            return existing.clone();
        }

        let name = self.unique_name(default_name, owner_type, wire_name, config);
        self.insert(name.clone(), values, value_set);
        name
    }

    fn resolve_semantic(&mut self, name: &str, values: &[String], value_set: BTreeSet<String>) -> String {
        if self.known.contains(name) {
            return name.to_string();
        }

        if let Some(&idx) = self.by_name.get(name) {
            let existing = self.entries[idx].values.iter().cloned().collect::<BTreeSet<_>>();
            if existing == value_set {
                return name.to_string();
            }

            tracing::debug!(enum_name = name, "semantic enum redefined with new members");
            self.by_values.retain(|_, i| *i != idx);
            self.entries[idx].values = values.to_vec();
            self.by_values.entry(value_set).or_insert(idx);
            self.pending.insert(name.to_string());
            return name.to_string();
        }

        self.insert(name.to_string(), values, value_set);
        name.to_string()
    }

    fn unique_name(&self, default_name: String, owner_type: &str, wire_name: &str, config: &TypeConfig) -> String {
        if !self.by_name.contains_key(&default_name) {
            return default_name;
        }

        let prefixed = format!(
            "{owner_type}{}{ENUM_TYPE_SUFFIX}",
            config.naming.field_name(wire_name)
        );
        if !self.by_name.contains_key(&prefixed) {
            return prefixed;
        }

        (2..)
            .map(|n| format!("{prefixed}{n}"))
            .find(|candidate| !self.by_name.contains_key(candidate))
            .unwrap_or(prefixed)
    }

    fn insert(&mut self, name: String, values: &[String], value_set: BTreeSet<String>) {
        tracing::debug!(enum_name = %name, members = values.len(), "registered enum");

        let idx = self.entries.len();
        self.entries.push(EnumType {
            name: name.clone(),
            values: values.to_vec(),
        });
        self.by_name.insert(name.clone(), idx);
        self.by_values.entry(value_set).or_insert(idx);
        self.pending.insert(name);
    }

    /// Enums registered since the last call, sorted by name.
    pub fn take_pending(&mut self) -> Vec<EnumType> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .filter_map(|name| self.get(&name).cloned())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&EnumType> {
        self.by_name.get(name).map(|&idx| &self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn values(members: &[&str]) -> Vec<String> {
        members.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn identical_member_sets_share_one_enum() {
        let config = TypeConfig::defaults("0.0.44");
        let mut registry = EnumRegistry::new();

        let first = registry.resolve(&config, "Widget", "status", &values(&["PENDING", "RUNNING", "DONE"]));
        let second = registry.resolve(&config, "Gadget", "phase", &values(&["DONE", "PENDING", "RUNNING"]));

        assert_eq!(first, "StatusValue");
        assert_eq!(second, "StatusValue");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn name_collision_is_prefixed_with_owner() {
        let config = TypeConfig::defaults("0.0.44");
        let mut registry = EnumRegistry::new();

        registry.resolve(&config, "Job", "flags", &values(&["A", "B"]));
        let second = registry.resolve(&config, "Reservation", "flags", &values(&["C"]));
        let third = registry.resolve(&config, "Reservation", "flags", &values(&["D"]));

        assert_eq!(second, "ReservationFlagsValue");
        assert_eq!(third, "ReservationFlagsValue2");
    }

    #[test]
    fn known_default_names_are_not_registered() {
        let config = TypeConfig::defaults("0.0.44");
        let mut registry = EnumRegistry::with_known(["FlagsValue".to_string()].into());

        let name = registry.resolve(&config, "JobCreate", "flags", &values(&["A"]));

        assert_eq!(name, "FlagsValue");
        assert!(registry.is_empty());
        assert!(registry.take_pending().is_empty());
    }

    #[test]
    fn semantic_override_wins_by_name() {
        let config = TypeConfig::defaults("0.0.44");
        let mut registry = EnumRegistry::new();

        let state = registry.resolve(&config, "Node", "state", &values(&["IDLE", "DOWN"]));
        let next = registry.resolve(&config, "Node", "next_state_after_reboot", &values(&["IDLE", "DOWN", "MIXED"]));

        assert_eq!(state, "NodeState");
        assert_eq!(next, "NodeState");
        assert_eq!(registry.get("NodeState").unwrap().values, values(&["IDLE", "DOWN", "MIXED"]));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn known_semantic_override_is_returned_unregistered() {
        let config = TypeConfig::defaults("0.0.44");
        let mut registry = EnumRegistry::with_known(["JobState".to_string()].into());

        let name = registry.resolve(&config, "Job", "job_state", &values(&["PENDING"]));

        assert_eq!(name, "JobState");
        assert!(registry.is_empty());
    }

    #[test]
    fn pending_is_drained_per_call_but_registry_persists() {
        let config = TypeConfig::defaults("0.0.44");
        let mut registry = EnumRegistry::new();

        registry.resolve(&config, "Job", "shared", &values(&["none", "oversubscribe"]));
        registry.resolve(&config, "Job", "mail_type", &values(&["BEGIN", "END"]));

        let pending = registry.take_pending();
        assert_eq!(
            pending.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            vec!["MailTypeValue", "SharedValue"]
        );
        assert!(registry.take_pending().is_empty());

        let again = registry.resolve(&config, "Partition", "shared", &values(&["none", "oversubscribe"]));
        assert_eq!(again, "SharedValue");
        assert!(registry.take_pending().is_empty());
    }

    #[test]
    fn reset_clears_run_state() {
        let config = TypeConfig::defaults("0.0.44");
        let mut registry = EnumRegistry::new();
        registry.resolve(&config, "Job", "shared", &values(&["none"]));

        registry.reset(BTreeSet::new());

        assert!(registry.is_empty());
        assert!(registry.get("SharedValue").is_none());
    }
}
