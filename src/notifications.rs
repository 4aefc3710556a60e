//! Phase-change cues: a terminal bell everywhere, plus a desktop
//! notification on macOS

use crate::engine::PhaseEvent;
use std::io::Write;

#[cfg(target_os = "macos")]
use std::process::Command;

/// Title and body shown for a phase transition
pub fn phase_message(event: &PhaseEvent) -> (&'static str, String) {
    match event {
        PhaseEvent::WorkComplete { sessions, streak } => (
            "Focus complete",
            format!(
                "Session {} done (streak {:.1}). Time for a break.",
                sessions, streak
            ),
        ),
        PhaseEvent::BreakComplete { cycles } => (
            "Break over",
            format!("Cycle {} done. Back to focus.", cycles),
        ),
    }
}

/// Number of bell rings: one for the end of focus, two for the end of a break
fn bell_count(event: &PhaseEvent) -> usize {
    match event {
        PhaseEvent::WorkComplete { .. } => 1,
        PhaseEvent::BreakComplete { .. } => 2,
    }
}

/// Fire-and-forget cue for a phase transition. Failures are logged and ignored.
pub fn notify_phase(event: &PhaseEvent) {
    let (title, body) = phase_message(event);
    tracing::info!(title, body = %body, "phase transition");

    let bells = "\x07".repeat(bell_count(event));
    let mut stdout = std::io::stdout();
    if let Err(e) = stdout
        .write_all(bells.as_bytes())
        .and_then(|_| stdout.flush())
    {
        tracing::debug!(error = %e, "could not ring terminal bell");
    }

    #[cfg(target_os = "macos")]
    {
        let script = format!(
            r#"display notification "{}" with title "focustrack - {}""#,
            body.replace('"', "\\\""),
            title
        );

        if let Err(e) = Command::new("osascript").arg("-e").arg(&script).output() {
            tracing::debug!(error = %e, "osascript notification failed");
        }
    }
}
