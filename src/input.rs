use std::env;

use log::debug;

use crate::error::ActionError;

/// Environment variable carrying the action input of the given name:
/// `INPUT_` plus the uppercased name, spaces replaced with underscores.
fn env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Read one action input from the environment. Empty values count as unset.
pub fn get_input(name: &str) -> Option<String> {
    let value = env::var(env_name(name)).ok()?;
    let value = value.trim().to_string();
    if value.is_empty() {
        None
    } else {
        debug!("input: {name}={value}");
        Some(value)
    }
}

/// Read a required input; absence is a configuration error.
pub fn get_required_input(name: &str) -> Result<String, ActionError> {
    get_input(name)
        .ok_or_else(|| ActionError::Config(format!("Input required and not supplied: {name}")))
}

/// Split a multiline input into trimmed, non-empty entries.
pub fn get_multiline_input(name: &str) -> Vec<String> {
    split_lines(&env::var(env_name(name)).unwrap_or_default())
}

pub fn split_lines(value: &str) -> Vec<String> {
    value
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Boolean inputs follow the YAML 1.2 core-schema subset the CI host uses:
/// `true`/`True`/`TRUE` and `false`/`False`/`FALSE`.
pub fn get_boolean_input(name: &str) -> Result<Option<bool>, ActionError> {
    match get_input(name) {
        None => Ok(None),
        Some(value) => parse_boolean(&value)
            .map(Some)
            .ok_or_else(|| {
                ActionError::Config(format!(
                    "Input does not meet YAML 1.2 Core Schema specification: {name}"
                ))
            }),
    }
}

pub fn parse_boolean(value: &str) -> Option<bool> {
    match value {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}
