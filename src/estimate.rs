use std::fmt::{Display, Formatter, Result as fmtResult};
use std::io::Read;
use std::time::{Duration, Instant};

use log::debug;

use crate::constants::{SPEED_PROBE_MAX_BYTES, SPEED_PROBE_TIMEOUT_SECS, SPEED_PROBE_URLS};
use crate::utils::{format_eta, human_size};

/// Expected size and transfer time of a download
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Bytes
    pub size: Option<u64>,
    /// Bytes per second
    pub bandwidth: Option<f64>,
    pub eta: Option<Duration>,
}

impl Estimate {
    pub fn new(size: Option<u64>, bandwidth: Option<f64>) -> Self {
        let eta = match (size, bandwidth) {
            (Some(size), Some(bandwidth)) if size > 0 && bandwidth > 0.0 => {
                Some(Duration::from_secs_f64(size as f64 / bandwidth))
            }
            _ => None,
        };

        Self {
            size,
            bandwidth,
            eta,
        }
    }
}

impl Display for Estimate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmtResult {
        let eta = self
            .eta
            .map(format_eta)
            .unwrap_or_else(|| "Unknown".to_string());

        write!(f, "Size: {}   ETA: {eta}", human_size(self.size))
    }
}

/// Read up to `limit` bytes (in 8 KiB steps, so possibly a little more) and return the count
pub fn drain(mut reader: impl Read, limit: u64) -> std::io::Result<u64> {
    let mut buf = [0_u8; 8192];
    let mut total = 0_u64;

    while total <= limit {
        let read = reader.read(&mut buf)?;
        if read == 0 {
            break;
        }
        total += read as u64;
    }

    Ok(total)
}

/// Measure bandwidth in bytes per second against one small resource
pub fn probe_url(client: &reqwest::blocking::Client, url: &str) -> Result<f64, reqwest::Error> {
    let started = Instant::now();

    let response = client.get(url).send()?.error_for_status()?;
    let total = drain(response, SPEED_PROBE_MAX_BYTES).unwrap_or(0);

    let elapsed = started.elapsed().as_secs_f64();

    Ok(if elapsed > 0.0 { total as f64 / elapsed } else { 0.0 })
}

/// Bandwidth in bytes per second from the first probe URL that answers, `None` if all fail
pub fn probe_bandwidth() -> Option<f64> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(SPEED_PROBE_TIMEOUT_SECS))
        .build()
        .ok()?;

    SPEED_PROBE_URLS.iter().find_map(|url| match probe_url(&client, url) {
        Ok(speed) if speed > 0.0 => {
            debug!("{url}: {speed:.0} B/s");
            Some(speed)
        }
        Ok(_) => None,
        Err(err) => {
            debug!("Speed probe {url} failed: {err}");
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eta_needs_size_and_bandwidth() {
        let estimate = Estimate::new(Some(10 * 1024 * 1024), Some(1024.0 * 1024.0));
        assert_eq!(estimate.eta, Some(Duration::from_secs(10)));
        assert_eq!(estimate.to_string(), "Size: 10.00 MB   ETA: 0m10s");

        let unknown = Estimate::new(None, Some(1024.0));
        assert_eq!(unknown.eta, None);
        assert_eq!(unknown.to_string(), "Size: Unknown   ETA: Unknown");

        assert_eq!(Estimate::new(Some(5), None).eta, None);
        assert_eq!(Estimate::new(Some(5), Some(0.0)).eta, None);
    }

    #[test]
    fn drain_stops_after_limit() {
        let data = vec![0_u8; 100_000];

        assert_eq!(drain(&data[..], 10).unwrap(), 8192);
        assert_eq!(drain(&data[..], 1_000_000).unwrap(), 100_000);
        assert_eq!(drain(std::io::empty(), 10).unwrap(), 0);
    }
}
