//! Shared types for the gate monitor

use serde::{Deserialize, Serialize};

/// Newtype wrapper for gate hardware addresses to provide type safety
///
/// Addresses are opaque and compared exactly as received; the engine does
/// not assume case-insensitive equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GateId(pub String);

impl std::fmt::Display for GateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GateId {
    fn from(s: &str) -> Self {
        GateId(s.to_string())
    }
}

/// One gate reading from a single polling cycle
///
/// `None` fields mark a record whose wire value did not parse. The
/// observation is still delivered so one bad gate cannot block updates
/// to the rest of the snapshot.
#[derive(Debug, Clone)]
pub struct RawObservation {
    pub id: GateId,
    /// Trigger time in epoch milliseconds
    pub triggered_at_ms: Option<u64>,
    /// Seconds since the previous trigger of this gate
    pub since_last_trigger_secs: Option<f64>,
}

/// Coarse freshness bucket derived from time-since-last-trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityClass {
    Fresh,
    Recent,
    Moderate,
    Stale,
}

impl ActivityClass {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityClass::Fresh => "fresh",
            ActivityClass::Recent => "recent",
            ActivityClass::Moderate => "moderate",
            ActivityClass::Stale => "stale",
        }
    }
}

/// Ordered band boundaries for activity classification
///
/// Each band is inclusive on its lower bound: a gate at exactly
/// `fresh_max_secs` is already `Recent`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ActivityThresholds {
    #[serde(default = "default_fresh_max")]
    pub fresh_max_secs: f64,
    #[serde(default = "default_recent_max")]
    pub recent_max_secs: f64,
    #[serde(default = "default_moderate_max")]
    pub moderate_max_secs: f64,
}

fn default_fresh_max() -> f64 {
    1.0
}

fn default_recent_max() -> f64 {
    10.0
}

fn default_moderate_max() -> f64 {
    60.0
}

impl Default for ActivityThresholds {
    fn default() -> Self {
        Self {
            fresh_max_secs: default_fresh_max(),
            recent_max_secs: default_recent_max(),
            moderate_max_secs: default_moderate_max(),
        }
    }
}

impl ActivityThresholds {
    pub fn classify(&self, since_last_trigger_secs: f64) -> ActivityClass {
        if since_last_trigger_secs < self.fresh_max_secs {
            ActivityClass::Fresh
        } else if since_last_trigger_secs < self.recent_max_secs {
            ActivityClass::Recent
        } else if since_last_trigger_secs < self.moderate_max_secs {
            ActivityClass::Moderate
        } else {
            ActivityClass::Stale
        }
    }
}

/// One row of the ordered, annotated gate view
#[derive(Debug, Clone, PartialEq)]
pub struct GateView {
    pub id: GateId,
    pub triggered_at_ms: u64,
    pub since_last_trigger_secs: f64,
    /// Dense 0-based position in the display order
    pub rank: usize,
    /// Seconds between this gate's trigger and the previous gate's trigger
    /// in display order; absent for rank 0
    pub delta_from_previous_secs: Option<f64>,
    pub activity: ActivityClass,
}

/// Timing difference between two consecutively selected gates
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDelta {
    pub from: GateId,
    pub to: GateId,
    /// Signed; negative when `to` triggered before `from`
    pub delta_secs: f64,
}

/// Aggregate statistics over a selected gate sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequenceStats {
    /// Signed sum of deltas: net elapsed time from the first to the last
    /// selected trigger, not the sum of magnitudes
    pub total_secs: f64,
    pub fastest_abs_secs: f64,
    pub average_abs_secs: f64,
}

/// Wire response from the device's `/gates` endpoint
///
/// The device serializes every field as a JSON string, including the
/// epoch-millisecond timestamp and the float delta.
#[derive(Debug, Deserialize)]
pub struct GatesResponse {
    pub gates: Vec<WireGate>,
}

#[derive(Debug, Deserialize)]
pub struct WireGate {
    pub macaddr: String,
    pub timestamp: String,
    pub time_delta: String,
}

impl WireGate {
    /// Lenient conversion into an engine observation. Unparsable fields
    /// become `None` rather than failing the whole snapshot.
    pub fn into_observation(self) -> RawObservation {
        let triggered_at_ms = self.timestamp.trim().parse::<u64>().ok();
        let since_last_trigger_secs = self
            .time_delta
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0);

        RawObservation { id: GateId(self.macaddr), triggered_at_ms, since_last_trigger_secs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_default_bands() {
        let t = ActivityThresholds::default();
        assert_eq!(t.classify(0.0), ActivityClass::Fresh);
        assert_eq!(t.classify(0.999), ActivityClass::Fresh);
        assert_eq!(t.classify(1.0), ActivityClass::Recent);
        assert_eq!(t.classify(9.99), ActivityClass::Recent);
        assert_eq!(t.classify(10.0), ActivityClass::Moderate);
        assert_eq!(t.classify(60.0), ActivityClass::Stale);
        assert_eq!(t.classify(3600.0), ActivityClass::Stale);
    }

    #[test]
    fn test_wire_gate_parses_string_fields() {
        let wire = WireGate {
            macaddr: "aa:bb:cc:dd:ee:ff".to_string(),
            timestamp: "1500".to_string(),
            time_delta: "0.25".to_string(),
        };
        let obs = wire.into_observation();
        assert_eq!(obs.id, GateId::from("aa:bb:cc:dd:ee:ff"));
        assert_eq!(obs.triggered_at_ms, Some(1500));
        assert_eq!(obs.since_last_trigger_secs, Some(0.25));
    }

    #[test]
    fn test_wire_gate_malformed_fields_become_none() {
        let wire = WireGate {
            macaddr: "aa:bb:cc:dd:ee:ff".to_string(),
            timestamp: "not-a-number".to_string(),
            time_delta: "-3.0".to_string(),
        };
        let obs = wire.into_observation();
        assert_eq!(obs.triggered_at_ms, None);
        // Negative deltas are out of contract and dropped
        assert_eq!(obs.since_last_trigger_secs, None);
    }

    #[test]
    fn test_gates_response_deserializes() {
        let json = r#"{"gates":[{"macaddr":"a1","timestamp":"1000","time_delta":"0.5"}]}"#;
        let resp: GatesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.gates.len(), 1);
        assert_eq!(resp.gates[0].macaddr, "a1");
    }
}
