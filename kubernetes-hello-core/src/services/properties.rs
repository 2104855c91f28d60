//! Identity of the serving process

use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::types::Properties;

const PROC_STATUS: &str = "/proc/self/status";
const PROC_HOSTNAME: &str = "/proc/sys/kernel/hostname";

/// Collects the process properties; `uptime` is the time since `started`,
/// `pod_containers` the already rendered container list.
pub fn collect_properties(uptime: Duration, pod_containers: String) -> CoreResult<Properties> {
    let ids = std::fs::read_to_string(PROC_STATUS)
        .map(|status| (status_id(&status, "Uid:"), status_id(&status, "Gid:")))
        .unwrap_or_else(|e| {
            log::debug!("Cannot read {PROC_STATUS}: {e}");
            (None, None)
        });

    Ok(Properties {
        pid: std::process::id(),
        uid: ids.0,
        gid: ids.1,
        hostname: hostname()?,
        pod_containers,
        os: std::env::consts::OS,
        architecture: std::env::consts::ARCH,
        uptime: format_uptime(uptime),
    })
}

/// Real id from a `Uid:`/`Gid:` line of `/proc/<pid>/status`.
fn status_id(status: &str, key: &str) -> Option<u32> {
    status
        .lines()
        .find_map(|line| line.strip_prefix(key))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|id| id.parse().ok())
}

fn hostname() -> CoreResult<String> {
    if let Ok(name) = std::fs::read_to_string(PROC_HOSTNAME) {
        let name = name.trim();
        if !name.is_empty() {
            return Ok(name.to_string());
        }
    }
    std::env::var("HOSTNAME")
        .ok()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| CoreError::Io("unable to determine hostname".to_string()))
}

/// Formats like Go's `time.Duration`: `0s`, `1.5ms`, `2m3.25s`, `1h0m0s`.
pub fn format_uptime(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        return format!("{}µs", fraction(nanos, 1_000));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", fraction(nanos, 1_000_000));
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let second_nanos =
        u128::from(total_secs % 60) * 1_000_000_000 + u128::from(duration.subsec_nanos());
    let seconds = fraction(second_nanos, 1_000_000_000);

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// `value / unit` with the remainder as a trimmed decimal fraction.
fn fraction(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let rest = value % unit;
    if rest == 0 {
        return whole.to_string();
    }
    let digits = unit.ilog10() as usize;
    let decimals = format!("{rest:0digits$}");
    format!("{whole}.{}", decimals.trim_end_matches('0'))
}
