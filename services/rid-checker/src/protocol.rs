use rid_core::{DenialReason, Verdict};
use rid_geofence::EngineState;
use serde::{Deserialize, Serialize};

/// One line of input: the latest fix and whether the link is ready for ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PositionReport {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub ready: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerdictLine {
    pub allowed: bool,
    pub reason: DenialReason,
    pub code: u8,
    pub detail: String,
    pub state: EngineState,
}

impl VerdictLine {
    pub fn new(verdict: Verdict, state: EngineState) -> Self {
        Self {
            allowed: verdict.allowed,
            reason: verdict.reason,
            code: verdict.reason.code(),
            detail: verdict.detail,
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_defaults_to_false() {
        let report: PositionReport = serde_json::from_str(r#"{"lat":45.0,"lon":7.5}"#).unwrap();
        assert_eq!(
            report,
            PositionReport {
                lat: 45.0,
                lon: 7.5,
                ready: false
            }
        );
    }

    #[test]
    fn verdict_line_carries_code_and_state() {
        let line = VerdictLine::new(
            Verdict::denied(DenialReason::Airport, "near airport"),
            EngineState::Ready,
        );
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["allowed"], false);
        assert_eq!(json["reason"], "airport");
        assert_eq!(json["code"], 1);
        assert_eq!(json["detail"], "near airport");
        assert_eq!(json["state"], "ready");
    }
}
