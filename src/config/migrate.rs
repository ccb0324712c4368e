use crate::ui::messages::success;
use rusqlite::{Connection, Error, OptionalExtension};
use serde_yaml::Value;
use std::fs;

/// Keys every up-to-date config file must carry.
const EXPECTED_KEYS: [&str; 8] = [
    "database",
    "time_zone",
    "reset_time",
    "reminder_time",
    "reminder_days",
    "allowed_email_domain",
    "otp_ttl_minutes",
    "push_chunk_size",
];

/// Report config keys missing from the YAML file on disk.
/// Returns an empty list when the file does not exist (defaults apply).
pub fn missing_fields() -> Vec<String> {
    let conf_file = super::Config::config_file();

    if !conf_file.exists() {
        return Vec::new();
    }

    let content = match fs::read_to_string(&conf_file) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let yaml: Value = match serde_yaml::from_str(&content) {
        Ok(y) => y,
        Err(_) => return EXPECTED_KEYS.iter().map(|k| k.to_string()).collect(),
    };

    let map = match yaml.as_mapping() {
        Some(m) => m,
        None => return EXPECTED_KEYS.iter().map(|k| k.to_string()).collect(),
    };

    EXPECTED_KEYS
        .iter()
        .filter(|k| !map.contains_key(&Value::String(k.to_string())))
        .map(|k| k.to_string())
        .collect()
}

/// Migration that adds the signup-policy parameters to the YAML config,
/// if missing, and marks the migration as applied in the `log` table.
pub fn migrate_add_signup_policy(conn: &Connection) -> Result<(), Error> {
    let version = "20250521_0007_add_signup_policy";

    // Check if already applied
    let mut chk = conn.prepare(
        "SELECT 1 FROM log WHERE operation = 'migration_applied' AND target = ?1 LIMIT 1",
    )?;
    if chk.query_row([version], |_| Ok(())).optional()?.is_some() {
        return Ok(()); // already applied
    }

    let conf_file = super::Config::config_file();

    if conf_file.exists() {
        let content = fs::read_to_string(&conf_file).map_err(|e| {
            Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(format!("Failed to read config {:?}: {}", conf_file, e)),
            )
        })?;

        if let Ok(mut yaml) = serde_yaml::from_str::<Value>(&content)
            && let Some(map) = yaml.as_mapping_mut()
        {
            let additions = [
                ("allowed_email_domain", Value::String("villanova.edu".into())),
                ("otp_ttl_minutes", Value::Number(5.into())),
                ("push_chunk_size", Value::Number(100.into())),
            ];

            let mut changed = false;
            for (key, default) in additions {
                let key = Value::String(key.to_string());
                if !map.contains_key(&key) {
                    map.insert(key, default);
                    changed = true;
                }
            }

            if changed {
                let serialized = serde_yaml::to_string(&yaml).map_err(|e| {
                    Error::SqliteFailure(
                        rusqlite::ffi::Error::new(1),
                        Some(format!(
                            "Failed to serialize updated config {:?}: {}",
                            conf_file, e
                        )),
                    )
                })?;

                // Inject documentation comment right after the domain line
                let mut new_content = String::new();

                for line in serialized.lines() {
                    new_content.push_str(line);
                    new_content.push('\n');

                    if line.starts_with("allowed_email_domain:") {
                        new_content.push_str(
                            "  # Only addresses under this domain may sign up.\n",
                        );
                    }
                }

                fs::write(&conf_file, new_content).map_err(|e| {
                    Error::SqliteFailure(
                        rusqlite::ffi::Error::new(1),
                        Some(format!(
                            "Failed to write updated config {:?}: {}",
                            conf_file, e
                        )),
                    )
                })?;
            }
        }
    }

    // Mark as applied
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, 'Added signup policy parameters to config')",
        [version],
    )?;

    success(format!(
        "Migration applied: {} — added signup policy parameters to config.",
        version
    ));

    Ok(())
}
