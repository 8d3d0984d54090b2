use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::schedule::PURSUER_TICK_MS;

pub const DEFAULT_RENDER_FPS: u64 = 60;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub tick_ms: u64,
    pub render_fps: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_ms: PURSUER_TICK_MS,
            render_fps: DEFAULT_RENDER_FPS,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Bad or zero numbers fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let positive = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };
        Self {
            tick_ms: positive("MAZE_CHASE_TICK_MS", PURSUER_TICK_MS),
            render_fps: positive("MAZE_CHASE_FPS", DEFAULT_RENDER_FPS),
            log_file: lookup("MAZE_CHASE_LOG")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.render_fps.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(settings(&[]), Settings::default());
        assert_eq!(Settings::default().tick_interval(), Duration::from_millis(500));
    }

    #[rstest]
    #[case("250", 250)]
    #[case(" 80 ", 80)]
    #[case("0", PURSUER_TICK_MS)]
    #[case("fast", PURSUER_TICK_MS)]
    #[case("-5", PURSUER_TICK_MS)]
    fn tick_override(#[case] raw: &str, #[case] expected: u64) {
        assert_eq!(settings(&[("MAZE_CHASE_TICK_MS", raw)]).tick_ms, expected);
    }

    #[test]
    fn log_file_and_fps() {
        let s = settings(&[("MAZE_CHASE_LOG", "/tmp/chase.log"), ("MAZE_CHASE_FPS", "30")]);
        assert_eq!(s.log_file, Some(PathBuf::from("/tmp/chase.log")));
        assert_eq!(s.render_fps, 30);
        assert_eq!(settings(&[("MAZE_CHASE_LOG", "  ")]).log_file, None);
    }
}
