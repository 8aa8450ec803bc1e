//! Date formatting and input debouncing helpers

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

const NOT_AVAILABLE: &str = "N/A";

/// Parse the timestamp shapes the backend emits
fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `2024-01-05T09:30:00` -> `Jan 5, 2024`
pub fn format_date(input: &str) -> String {
    parse_timestamp(input)
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// `2024-01-05T09:30:00` -> `Jan 5, 2024, 09:30 AM`
pub fn format_datetime(input: &str) -> String {
    parse_timestamp(input)
        .map(|dt| dt.format("%b %-d, %Y, %I:%M %p").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Delivers only the last value passed to [`Debouncer::call`] once `wait`
/// has elapsed without another call
pub struct Debouncer<T> {
    wait: Duration,
    tx: UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(wait: Duration, tx: UnboundedSender<T>) -> Self {
        Self {
            wait,
            tx,
            pending: None,
        }
    }

    /// Schedule `value`, cancelling any value still waiting
    pub fn call(&mut self, value: T) {
        self.cancel();
        let tx = self.tx.clone();
        let wait = self.wait;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            let _ = tx.send(value);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-05T09:30:00"), "Jan 5, 2024");
        assert_eq!(format_date("2024-01-05T09:30:00.123456"), "Jan 5, 2024");
        assert_eq!(format_date("2024-12-25"), "Dec 25, 2024");
        assert_eq!(format_date("2024-03-10T08:00:00Z"), "Mar 10, 2024");
    }

    #[test]
    fn test_format_datetime() {
        assert_eq!(format_datetime("2024-01-05T09:30:00"), "Jan 5, 2024, 09:30 AM");
        assert_eq!(format_datetime("2024-01-05 21:05:00"), "Jan 5, 2024, 09:05 PM");
    }

    #[test]
    fn test_empty_or_invalid_is_not_available() {
        assert_eq!(format_date(""), "N/A");
        assert_eq!(format_date("yesterday"), "N/A");
        assert_eq!(format_datetime("  "), "N/A");
    }

    #[tokio::test]
    async fn test_debouncer_delivers_last_value_only() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(30), tx);
        debouncer.call("a");
        debouncer.call("ab");
        debouncer.call("abc");

        let value = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap();
        assert_eq!(value, Some("abc"));

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_debouncer_cancel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(20), tx);
        debouncer.call(1);
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(rx.try_recv().is_err());
    }
}
