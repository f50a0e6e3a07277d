use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::directory::render_directory;
use crate::ui::messages::{info, status};
use crate::utils::colors::{GREY, RESET};
use chrono::Utc;
use std::thread;
use std::time::{Duration, Instant};

use super::with_session;

const POLL: Duration = Duration::from_millis(500);

/// Event loop of a signed-in session: heartbeats when due and, for
/// administrators, live presence updates.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Watch { duration } = cmd {
        let limit = duration.map(Duration::from_secs);

        with_session(cfg, |ctrl| {
            let started = Instant::now();
            let interval = ctrl
                .heartbeat()
                .map(|h| h.interval())
                .unwrap_or(ctrl.settings().heartbeat_interval);
            info(format!(
                "Watching, heartbeat every {}s. Press Ctrl+C to stop.",
                interval.as_secs()
            ));

            loop {
                let now = Instant::now();
                let report = ctrl.tick(now)?;

                if report.heartbeat_sent {
                    let beats = ctrl.heartbeat().map(|h| h.beats()).unwrap_or(0);
                    println!("{}💓 heartbeat #{}{}", GREY, beats, RESET);
                }
                if ctrl.status().is_failure() {
                    status(ctrl.status());
                }

                if report.presence_updates > 0
                    && let Ok(dir) = ctrl.admin()
                {
                    print!(
                        "{}",
                        render_directory(
                            dir.entries(),
                            dir.counts(),
                            Utc::now(),
                            ctrl.settings().presence_stale
                        )
                    );
                }

                if limit.is_some_and(|l| now.duration_since(started) >= l) {
                    break;
                }
                // wake up early when the next beat is due sooner
                let pause = ctrl
                    .heartbeat()
                    .and_then(|h| h.until_next(Instant::now()))
                    .map_or(POLL, |d| d.min(POLL));
                thread::sleep(pause);
            }

            info("Stopped watching. You stay signed in until `rhours logout`.");
            Ok(())
        })?;
    }

    Ok(())
}
