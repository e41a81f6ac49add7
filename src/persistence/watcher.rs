use super::files::DATA_FILE;
use super::store::StoreEvent;
use chrono::{DateTime, Utc};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Watches the data directory and reports changes to data.json.
///
/// Our own saves show up here too; the shell filters them out by comparing
/// the reloaded document with the one in memory.
pub struct StoreWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<StoreEvent>,
}

impl StoreWatcher {
    pub fn start(data_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::warn!(error = %e, "dropped watcher event");
                        return;
                    }
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                let touches_data = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().and_then(|n| n.to_str()) == Some(DATA_FILE));
                if touches_data {
                    let _ = tx.send(StoreEvent::ExternalChange);
                }
            },
            Config::default(),
        )?;

        watcher.watch(data_dir, RecursiveMode::NonRecursive)?;
        Ok(StoreWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking; bursts of writes collapse into a single event
    pub fn poll(&self) -> Option<StoreEvent> {
        let mut changed = None;
        while let Ok(event) = self.rx.try_recv() {
            changed = Some(event);
        }
        changed
    }
}

/// Notices suspend/resume by comparing wall-clock progress with the
/// monotonic clock, which does not advance while the machine sleeps.
#[derive(Debug, Clone)]
pub struct WakeDetector {
    threshold: Duration,
    last_wall: DateTime<Utc>,
    last_mono: Instant,
}

impl WakeDetector {
    pub fn new(threshold: Duration, wall: DateTime<Utc>, mono: Instant) -> Self {
        Self {
            threshold,
            last_wall: wall,
            last_mono: mono,
        }
    }

    /// Record a tick. Returns `SystemWake` when the wall clock ran ahead of
    /// the monotonic clock by more than the threshold.
    pub fn check(&mut self, wall: DateTime<Utc>, mono: Instant) -> Option<StoreEvent> {
        let wall_elapsed = wall
            .signed_duration_since(self.last_wall)
            .to_std()
            .unwrap_or(Duration::ZERO);
        let mono_elapsed = mono.saturating_duration_since(self.last_mono);

        self.last_wall = wall;
        self.last_mono = mono;

        if wall_elapsed.saturating_sub(mono_elapsed) > self.threshold {
            tracing::info!(gap_secs = wall_elapsed.as_secs(), "wall clock jumped, treating as wake");
            Some(StoreEvent::SystemWake)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_normal_ticks_are_not_wakes() {
        let mono = Instant::now();
        let mut detector = WakeDetector::new(Duration::from_secs(30), at("2024-03-01T10:00:00Z"), mono);

        let result = detector.check(at("2024-03-01T10:00:01Z"), mono + Duration::from_secs(1));
        assert_eq!(result, None);
    }

    #[test]
    fn test_wall_clock_jump_is_a_wake() {
        let mono = Instant::now();
        let mut detector = WakeDetector::new(Duration::from_secs(30), at("2024-03-01T10:00:00Z"), mono);

        let result = detector.check(at("2024-03-01T11:00:00Z"), mono + Duration::from_secs(1));
        assert_eq!(result, Some(StoreEvent::SystemWake));

        // Baseline moves forward after a wake
        let result = detector.check(at("2024-03-01T11:00:01Z"), mono + Duration::from_secs(2));
        assert_eq!(result, None);
    }

    #[test]
    fn test_clock_set_backwards_is_ignored() {
        let mono = Instant::now();
        let mut detector = WakeDetector::new(Duration::from_secs(30), at("2024-03-01T10:00:00Z"), mono);

        let result = detector.check(at("2024-03-01T09:00:00Z"), mono + Duration::from_secs(1));
        assert_eq!(result, None);
    }
}
