//! Status document types.
//!
//! These mirror the JSON produced by a PHP-FPM style status page when queried
//! with `?json`. Keys are space-separated lowercase phrases ("accepted conn",
//! "request duration"). Unknown keys are ignored and missing keys fall back to
//! zero or empty values; a key with the wrong type fails the whole decode.

use std::fmt;

use serde::Deserialize;

/// One decoded poll result for a pool.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub pool: String,
    #[serde(rename = "process manager")]
    pub process_manager: String,
    /// Unix timestamp at which the pool master started.
    #[serde(rename = "start time")]
    pub start_time: i64,
    /// Seconds since the pool master started.
    #[serde(rename = "start since")]
    pub start_since: u64,
    #[serde(rename = "accepted conn")]
    pub accepted_conn: u64,
    /// Requests currently waiting in the listen backlog.
    #[serde(rename = "listen queue")]
    pub listen_queue: u64,
    #[serde(rename = "max listen queue")]
    pub max_listen_queue: u64,
    /// Size of the socket's listen backlog.
    #[serde(rename = "listen queue len")]
    pub listen_queue_len: u64,
    #[serde(rename = "idle processes")]
    pub idle_processes: u64,
    #[serde(rename = "active processes")]
    pub active_processes: u64,
    #[serde(rename = "total processes")]
    pub total_processes: u64,
    #[serde(rename = "max active processes")]
    pub max_active_processes: u64,
    /// Times the process manager hit its child limit.
    #[serde(rename = "max children reached")]
    pub max_children_reached: u64,
    #[serde(rename = "slow requests")]
    pub slow_requests: u64,
    pub processes: Vec<ProcessEntry>,
}

impl Snapshot {
    /// Decode a snapshot from a status page body.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}

/// Point-in-time status of one worker process.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProcessEntry {
    pub pid: u32,
    pub state: ProcessState,
    #[serde(rename = "start time")]
    pub start_time: i64,
    #[serde(rename = "start since")]
    pub start_since: u64,
    pub requests: u64,
    /// Duration of the in-flight (or last) request in microseconds.
    #[serde(rename = "request duration")]
    pub request_duration: u64,
    #[serde(rename = "request method")]
    pub request_method: String,
    #[serde(rename = "request uri")]
    pub request_uri: String,
    #[serde(rename = "content length")]
    pub content_length: u64,
    pub user: String,
    pub script: String,
    /// CPU usage of the last request, in percent.
    #[serde(rename = "last request cpu")]
    pub last_request_cpu: f64,
    /// Peak memory of the last request, in bytes.
    #[serde(rename = "last request memory")]
    pub last_request_memory: u64,
}

/// Worker state as reported by the pool manager.
///
/// Only `Idle` and `Running` matter for metrics; every other state string
/// ("Reading headers", "Finishing", ...) is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ProcessState {
    Idle,
    Running,
    Other(String),
}

impl Default for ProcessState {
    fn default() -> Self {
        ProcessState::Other(String::new())
    }
}

impl From<String> for ProcessState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Idle" => ProcessState::Idle,
            "Running" => ProcessState::Running,
            _ => ProcessState::Other(s),
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessState::Idle => f.write_str("Idle"),
            ProcessState::Running => f.write_str("Running"),
            ProcessState::Other(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_JSON: &str = r#"{
        "pool": "www",
        "process manager": "dynamic",
        "start time": 1700000000,
        "start since": 3661,
        "accepted conn": 1234,
        "listen queue": 2,
        "max listen queue": 7,
        "listen queue len": 128,
        "idle processes": 3,
        "active processes": 1,
        "total processes": 4,
        "max active processes": 4,
        "max children reached": 1,
        "slow requests": 5,
        "processes": [
            {
                "pid": 101,
                "state": "Running",
                "start time": 1700000010,
                "start since": 3651,
                "requests": 40,
                "request duration": 2500,
                "request method": "GET",
                "request uri": "/index.php",
                "content length": 0,
                "user": "-",
                "script": "/var/www/index.php",
                "last request cpu": 0.0,
                "last request memory": 0
            },
            {
                "pid": 102,
                "state": "Idle",
                "start time": 1700000010,
                "start since": 3651,
                "requests": 38,
                "request duration": 812,
                "request method": "POST",
                "request uri": "/api/orders",
                "content length": 512,
                "user": "-",
                "script": "/var/www/api.php",
                "last request cpu": 12.5,
                "last request memory": 2097152
            }
        ]
    }"#;

    #[test]
    fn test_deserialize_full_document() {
        let snapshot = Snapshot::from_json(STATUS_JSON.as_bytes()).unwrap();
        assert_eq!(snapshot.pool, "www");
        assert_eq!(snapshot.process_manager, "dynamic");
        assert_eq!(snapshot.start_since, 3661);
        assert_eq!(snapshot.accepted_conn, 1234);
        assert_eq!(snapshot.listen_queue, 2);
        assert_eq!(snapshot.listen_queue_len, 128);
        assert_eq!(snapshot.total_processes, 4);
        assert_eq!(snapshot.slow_requests, 5);
        assert_eq!(snapshot.processes.len(), 2);

        let running = &snapshot.processes[0];
        assert_eq!(running.pid, 101);
        assert_eq!(running.state, ProcessState::Running);
        assert_eq!(running.request_duration, 2500);
        assert_eq!(running.request_uri, "/index.php");

        let idle = &snapshot.processes[1];
        assert_eq!(idle.state, ProcessState::Idle);
        assert_eq!(idle.last_request_cpu, 12.5);
        assert_eq!(idle.last_request_memory, 2_097_152);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let snapshot = Snapshot::from_json(br#"{"pool": "www", "accepted conn": 9}"#).unwrap();
        assert_eq!(snapshot.pool, "www");
        assert_eq!(snapshot.accepted_conn, 9);
        assert_eq!(snapshot.total_processes, 0);
        assert!(snapshot.processes.is_empty());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let snapshot =
            Snapshot::from_json(br#"{"pool": "www", "future field": [1, 2, 3]}"#).unwrap();
        assert_eq!(snapshot.pool, "www");
    }

    #[test]
    fn test_wrong_field_type_fails() {
        assert!(Snapshot::from_json(br#"{"accepted conn": "lots"}"#).is_err());
        assert!(Snapshot::from_json(br#"{"processes": [{"pid": "abc"}]}"#).is_err());
    }

    #[test]
    fn test_truncated_document_fails() {
        let truncated = &STATUS_JSON.as_bytes()[..STATUS_JSON.len() / 2];
        assert!(Snapshot::from_json(truncated).is_err());
    }

    #[test]
    fn test_other_process_state_kept_verbatim() {
        let entry: ProcessEntry =
            serde_json::from_str(r#"{"pid": 7, "state": "Reading headers"}"#).unwrap();
        assert_eq!(entry.state, ProcessState::Other("Reading headers".to_string()));
        assert_eq!(entry.state.to_string(), "Reading headers");
    }
}
