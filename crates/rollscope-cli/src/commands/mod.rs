pub mod eval;
pub mod list;

use std::time::Duration;

use serde::Serialize;

/// Map `--timeout-sec` onto a watchdog deadline. Zero disables the watchdog.
pub fn parse_timeout(secs: f64) -> Result<Option<Duration>, String> {
    if secs == 0.0 {
        return Ok(None);
    }
    Duration::try_from_secs_f64(secs)
        .map(Some)
        .map_err(|_| format!("Invalid --timeout-sec value: {secs}"))
}

/// Write `value` to `path` as pretty-printed JSON.
pub fn write_json<T: Serialize>(path: &str, value: &T) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}
