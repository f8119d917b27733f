pub const DEFAULT_VERSION: &str = "0.0.44";

pub fn version_prefix(version: &str) -> String {
    format!("v{version}_")
}

/// Extracts `0.0.44` from a schema name such as `v0.0.44_job_info`. Any
/// dot-separated run of numbers is accepted, so `v1_widget` yields `1`.
pub fn parse_version(schema_name: &str) -> Option<&str> {
    let rest = schema_name.strip_prefix('v')?;
    let (version, _) = rest.split_once('_')?;

    let numeric = version
        .split('.')
        .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));

    numeric.then_some(version)
}

pub fn is_versioned_schema_name(schema_name: &str) -> bool {
    parse_version(schema_name).is_some()
}

pub fn detect_version<'a, I>(schema_names: I) -> Option<String>
where
    I: IntoIterator<Item = &'a String>,
{
    schema_names
        .into_iter()
        .find_map(|name| parse_version(name))
        .map(str::to_string)
}

pub fn strip_version_prefix<'a>(schema_name: &'a str, prefix: &str) -> &'a str {
    schema_name.strip_prefix(prefix).unwrap_or(schema_name)
}
