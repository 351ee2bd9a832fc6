use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Scripted stand-in for an AR session, loaded as a JSON asset. Mirrors
/// the JSON structure exactly.
///
/// Planes become tracked once the session clock passes their detection
/// delay; an optional scripted failure or pause window exercises the
/// lifecycle paths a real tracking stack would produce.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct SessionScenario {
    pub name: String,
    pub planes: Vec<ScenarioPlane>,
    /// Tracking dropout window, seconds on the session clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause_between: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_after_seconds: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<ScenarioFailure>,
}

/// One detectable planar surface. All scenario planes are horizontal
/// (normal +Y); `yaw_degrees` spins the extents rectangle about Y.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioPlane {
    pub center: [f32; 3],
    #[serde(default)]
    pub yaw_degrees: f32,
    pub half_extents: [f32; 2],
    pub detect_after_seconds: f32,
}

/// Unrecoverable session failures a scenario can script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioFailure {
    PermissionDenied,
    ConnectionLost,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_deserializes_from_json() {
        let json = r#"{
            "name": "tabletop",
            "planes": [
                { "center": [0.0, 0.0, 0.0], "half_extents": [1.5, 1.0], "detect_after_seconds": 2.0 },
                { "center": [0.4, 0.74, -0.9], "yaw_degrees": 25.0, "half_extents": [0.6, 0.4], "detect_after_seconds": 3.5 }
            ],
            "pause_between": [6.0, 8.0]
        }"#;

        let scenario: SessionScenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.name, "tabletop");
        assert_eq!(scenario.planes.len(), 2);
        assert_eq!(scenario.planes[0].yaw_degrees, 0.0);
        assert_eq!(scenario.pause_between, Some([6.0, 8.0]));
        assert!(scenario.failure.is_none());
    }

    #[test]
    fn test_scripted_failure_kinds() {
        let json = r#"{
            "name": "denied",
            "planes": [],
            "fail_after_seconds": 0.5,
            "failure": "permission_denied"
        }"#;

        let scenario: SessionScenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.failure, Some(ScenarioFailure::PermissionDenied));
    }
}
