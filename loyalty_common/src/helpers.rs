use std::{env, str::FromStr};

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Reads `name` from the environment and parses it. Missing or unparseable values yield `Err` with a human-readable
/// reason so that the caller can log it and fall back to a default.
pub fn parse_env_var<T>(name: &str) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(name).map_err(|e| format!("{name}: {e}"))?;
    raw.trim().parse::<T>().map_err(|e| format!("{name} has an invalid value ({raw}). {e}"))
}
