///! Command handlers, one module per management area

pub mod agent;
pub mod capability;
pub mod cert;
pub mod gateway;
pub mod role;
pub mod role_binding;
pub mod token;

use anyhow::Result;

/// Ask for confirmation before a destructive operation. `--yes` skips the
/// prompt.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(confirmed)
}

/// Parse a `key=value` label argument.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("env=prod").unwrap(),
            ("env".to_string(), "prod".to_string())
        );
        assert_eq!(
            parse_key_val("env=").unwrap(),
            ("env".to_string(), String::new())
        );
        assert!(parse_key_val("justakey").is_err());
        assert!(parse_key_val("=value").is_err());
    }
}
