//! Build resources as returned by the Vela API.
//!
//! Every field is optional on the wire; missing values decode to their zero
//! value so the summary can always render something.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Deserializer};

/// One execution of a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Build {
    pub id: i64,
    pub number: i64,
    pub status: String,
    pub started: i64,
    pub finished: i64,
}

/// One unit of work in the build's main sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Step {
    pub id: i64,
    pub build_id: i64,
    pub number: i64,
    pub name: String,
    pub status: String,
    pub started: i64,
    pub finished: i64,
}

/// A sidecar container running alongside the build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Service {
    pub id: i64,
    pub build_id: i64,
    pub number: i64,
    pub name: String,
    pub status: String,
    pub started: i64,
    pub finished: i64,
}

/// Captured output of exactly one step or one service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Log {
    pub id: i64,
    pub build_id: i64,
    pub step_id: Option<i64>,
    pub service_id: Option<i64>,
    #[serde(deserialize_with = "decode_payload")]
    pub data: Vec<u8>,
}

/// The resource a log entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogOwner {
    Step(i64),
    Service(i64),
}

impl Log {
    /// Resolves the owning resource. A step id takes precedence when the
    /// server sets both; a log with neither has no owner.
    pub fn owner(&self) -> Option<LogOwner> {
        match (self.step_id, self.service_id) {
            (Some(id), _) if id != 0 => Some(LogOwner::Step(id)),
            (_, Some(id)) if id != 0 => Some(LogOwner::Service(id)),
            _ => None,
        }
    }
}

/// Anything that has a lifecycle with a status and start/finish timestamps.
pub trait Timed {
    fn status(&self) -> &str;
    fn started(&self) -> i64;
    fn finished(&self) -> i64;
}

/// A step or service rendered as one row of the summary table.
pub trait Resource: Timed {
    /// Value of the TYPE column.
    const KIND: &'static str;

    fn name(&self) -> &str;
    fn number(&self) -> i64;
    fn owner(&self) -> LogOwner;
}

impl Timed for Build {
    fn status(&self) -> &str {
        &self.status
    }

    fn started(&self) -> i64 {
        self.started
    }

    fn finished(&self) -> i64 {
        self.finished
    }
}

impl Timed for Step {
    fn status(&self) -> &str {
        &self.status
    }

    fn started(&self) -> i64 {
        self.started
    }

    fn finished(&self) -> i64 {
        self.finished
    }
}

impl Resource for Step {
    const KIND: &'static str = "step";

    fn name(&self) -> &str {
        &self.name
    }

    fn number(&self) -> i64 {
        self.number
    }

    fn owner(&self) -> LogOwner {
        LogOwner::Step(self.id)
    }
}

impl Timed for Service {
    fn status(&self) -> &str {
        &self.status
    }

    fn started(&self) -> i64 {
        self.started
    }

    fn finished(&self) -> i64 {
        self.finished
    }
}

impl Resource for Service {
    const KIND: &'static str = "service";

    fn name(&self) -> &str {
        &self.name
    }

    fn number(&self) -> i64 {
        self.number
    }

    fn owner(&self) -> LogOwner {
        LogOwner::Service(self.id)
    }
}

/// Log payloads are byte arrays, which the server encodes as base64 strings.
fn decode_payload<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let encoded: Option<String> = Option::deserialize(deserializer)?;
    match encoded {
        Some(text) => BASE64.decode(text.as_bytes()).map_err(serde::de::Error::custom),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_payload_is_decoded_from_base64() {
        let log: Log =
            serde_json::from_str(r#"{"id": 7, "step_id": 1, "data": "YQpiCmMK"}"#).unwrap();
        assert_eq!(log.data, b"a\nb\nc\n");
        assert_eq!(log.owner(), Some(LogOwner::Step(1)));
    }

    #[test]
    fn missing_fields_take_zero_values() {
        let log: Log = serde_json::from_str(r#"{"service_id": 4, "data": null}"#).unwrap();
        assert!(log.data.is_empty());
        assert_eq!(log.owner(), Some(LogOwner::Service(4)));

        let step: Step = serde_json::from_str(r#"{"name": "clone"}"#).unwrap();
        assert_eq!(step.number, 0);
        assert_eq!(step.status, "");
    }

    #[test]
    fn unused_api_fields_are_ignored() {
        let build: Build = serde_json::from_str(
            r#"{"id": 1, "repo_id": 2, "number": 3, "branch": "main", "event": "push", "status": "running", "started": 5}"#,
        )
        .unwrap();
        assert_eq!(build.number, 3);
        assert_eq!(build.status, "running");
        assert_eq!(build.finished, 0);

        let step: Step = serde_json::from_str(r#"{"id": 4, "stage": "test", "number": 2}"#).unwrap();
        assert_eq!((step.id, step.number), (4, 2));
    }

    #[test]
    fn invalid_payload_is_a_json_error() {
        let err = serde_json::from_str::<Log>(r#"{"step_id": 1, "data": "not base64!"}"#).unwrap_err();
        assert!(err.to_string().contains("Invalid"));
        assert!(matches!(crate::AppError::from(err), crate::AppError::Json(_)));
    }

    #[test]
    fn log_without_owner_is_unowned() {
        let log: Log = serde_json::from_str(r#"{"step_id": 0, "data": ""}"#).unwrap();
        assert_eq!(log.owner(), None);
    }

    #[test]
    fn resources_carry_their_kind() {
        assert_eq!(Step::KIND, "step");
        assert_eq!(Service::KIND, "service");
        let service = Service {
            id: 3,
            ..Default::default()
        };
        assert_eq!(Resource::owner(&service), LogOwner::Service(3));
    }
}
