use anyhow::Result;
use std::fs;
use std::path::Path;

/// Parse environment variables from a .env file in the current working directory, if present.
/// Returns a map of key/value pairs. Does not modify the process environment.
pub fn parse_env_file() -> Result<std::collections::HashMap<String, String>> {
    let path = Path::new(".env");
    let mut map = std::collections::HashMap::new();
    if !path.exists() {
        return Ok(map);
    }
    let content = fs::read_to_string(path)?;
    for (idx, line) in content.lines().enumerate() {
        let s = line.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        if let Some(eq) = s.find('=') {
            let key = s[..eq].trim();
            let mut val = s[eq + 1..].to_string();
            // Remove surrounding quotes if present
            if (val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\''))
            {
                val = val[1..val.len() - 1].to_string();
            }
            map.insert(key.to_string(), val);
        } else {
            eprintln!(
                "Warning: ignoring .env line {} without '=': {}",
                idx + 1,
                line
            );
        }
    }
    Ok(map)
}

/// Load `.env` from current working directory into process environment (non-destructive: does not override existing vars).
pub fn load_dotenv_if_present() -> Result<()> {
    if let Ok(map) = parse_env_file() {
        for (k, v) in map {
            if std::env::var_os(&k).is_none() {
                unsafe {
                    std::env::set_var(&k, &v);
                }
            }
        }
    }
    Ok(())
}
