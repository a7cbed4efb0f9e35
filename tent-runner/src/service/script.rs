//! Script runner
//!
//! Runs script builds through the configured shell and captures what they
//! print.

use tokio::process::Command;
use tracing::debug;

use crate::error::BuildError;

/// Runs `script` with `shell` and returns its combined output
///
/// Stdout comes first, followed by stderr. Spawn failures and non-zero exits
/// are both reported as `BuildError::ScriptExecution`.
pub async fn run_script(shell: &str, script: &str) -> Result<String, BuildError> {
    debug!("Running script: {} {}", shell, script);

    let output = Command::new(shell)
        .arg(script)
        .output()
        .await
        .map_err(|e| BuildError::ScriptExecution {
            script: script.to_string(),
            reason: e.to_string(),
        })?;

    if !output.status.success() {
        let reason = match output.status.code() {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };

        debug!(
            "Script {} failed: {} stderr='{}'",
            script,
            reason,
            String::from_utf8_lossy(&output.stderr).trim()
        );

        return Err(BuildError::ScriptExecution {
            script: script.to_string(),
            reason,
        });
    }

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(combined)
}
