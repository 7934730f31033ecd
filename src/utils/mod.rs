use anyhow::Result;
use std::path::Path;

/// Sanitize a title or user-supplied name for filesystem usage.
///
/// Keeps alphanumeric characters, spaces, dots, hyphens, underscores, and
/// parentheses/brackets; everything else is dropped. Leading and trailing
/// whitespace is trimmed.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| {
            c.is_alphanumeric()
                || matches!(c, ' ' | '.' | '-' | '_' | '(' | ')' | '[' | ']')
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Format duration in human-readable format
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Open a file with the platform's default application
pub async fn open_file(path: &Path) -> Result<()> {
    use tokio::process::Command;

    let mut command = if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(path);
        c
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]).arg(path);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(path);
        c
    };

    let status = command.status().await?;
    if !status.success() {
        anyhow::bail!("Opener exited with status {} for {}", status, path.display());
    }

    Ok(())
}
