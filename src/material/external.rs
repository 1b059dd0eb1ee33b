//! External tools: matugen and post-publish reload hooks

use std::path::Path;
use std::process::Output;

use area_color::Variant;
use tokio::process::Command;
use tracing::{debug, warn};

use super::error::{MaterialError, Result};

/// Run `cmd` through `sh -c`, returning its stdout
pub async fn run_shell(cmd: &str) -> Result<String> {
    let tool = cmd.split_whitespace().next().unwrap_or("sh").to_string();
    let output = Command::new("sh")
        .arg("-c")
        .arg(cmd)
        .output()
        .await
        .map_err(|e| MaterialError::ExternalTool {
            tool: tool.clone(),
            status: None,
            stderr: e.to_string(),
        })?;
    check_output(tool, output)
}

/// Regenerate matugen's outputs for `wallpaper` with the matching scheme type
pub async fn run_matugen(binary: &Path, variant: Variant, wallpaper: &Path) -> Result<()> {
    let tool = binary.display().to_string();
    debug!("Running {} image -t {} {:?}", tool, variant.matugen_type(), wallpaper);
    let output = Command::new(binary)
        .arg("image")
        .arg("-t")
        .arg(variant.matugen_type())
        .arg(wallpaper)
        .output()
        .await
        .map_err(|e| MaterialError::ExternalTool {
            tool: tool.clone(),
            status: None,
            stderr: e.to_string(),
        })?;
    check_output(tool, output).map(|_| ())
}

/// Run each reload hook in order. Failures are logged and do not stop the
/// remaining hooks.
pub async fn run_hooks(hooks: &[String]) -> usize {
    let mut failed = 0;
    for hook in hooks {
        match run_shell(hook).await {
            Ok(_) => debug!("Reload hook succeeded: {}", hook),
            Err(e) => {
                warn!("Reload hook failed: {}", e);
                failed += 1;
            }
        }
    }
    failed
}

fn check_output(tool: String, output: Output) -> Result<String> {
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }
    Err(MaterialError::ExternalTool {
        tool,
        status: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
