//! Desktop notifications for expired timers.
//! macOS goes through osascript, Linux through notify-send; elsewhere this is a no-op.
#[cfg(any(target_os = "macos", target_os = "linux"))]
use std::process::Command;

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Announce that a countdown reached zero
pub fn notify_timer_expired(label: &str) {
    let body = format!("⏰ {} is done", label);

    #[cfg(target_os = "macos")]
    let result = {
        let script = format!(
            r#"display notification "{}" with title "Frogday - Time's up""#,
            escape(&body)
        );
        Command::new("osascript").arg("-e").arg(&script).output()
    };

    #[cfg(target_os = "linux")]
    let result = Command::new("notify-send").arg("Frogday - Time's up").arg(&body).output();

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    let result: std::io::Result<()> = {
        let _ = body;
        Ok(())
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "desktop notification unavailable");
    }
}
