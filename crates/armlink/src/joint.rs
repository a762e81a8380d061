//! Joint identifiers and authoritative state.

use std::fmt;

use serde::Deserialize;

use crate::error::ArmError;

/// One controllable degree of freedom on the arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JointId {
    /// Base rotation.
    Base,
    /// Shoulder pitch.
    Shoulder,
    /// Wrist pitch.
    Wrist,
    /// Gripper open/close.
    Grip,
}

impl JointId {
    /// All joints in display order.
    pub const ALL: [JointId; 4] = [
        JointId::Base,
        JointId::Shoulder,
        JointId::Wrist,
        JointId::Grip,
    ];

    /// Path segment used by the REST service.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            JointId::Base => "base",
            JointId::Shoulder => "shoulder",
            JointId::Wrist => "wrist",
            JointId::Grip => "grip",
        }
    }

    /// Parse a joint name as accepted on the command line.
    pub fn parse(text: &str) -> Result<Self, ArmError> {
        match text.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(JointId::Base),
            "shoulder" => Ok(JointId::Shoulder),
            "wrist" => Ok(JointId::Wrist),
            "grip" => Ok(JointId::Grip),
            _ => Err(ArmError::InvalidConfig(
                format!("unknown joint '{text}'").into(),
            )),
        }
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which bound of a joint an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitKind {
    /// Minimum allowed position.
    Min,
    /// Maximum allowed position.
    Max,
}

impl LimitKind {
    /// JSON field name on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LimitKind::Min => "min",
            LimitKind::Max => "max",
        }
    }

    /// Parse a limit name as accepted on the command line.
    pub fn parse(text: &str) -> Result<Self, ArmError> {
        match text.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(LimitKind::Min),
            "max" => Ok(LimitKind::Max),
            _ => Err(ArmError::InvalidConfig(
                format!("unknown limit '{text}'").into(),
            )),
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authoritative joint state as reported by the service.
///
/// Replaced wholesale on every refresh; never partially merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct JointSnapshot {
    /// Current position.
    pub pos: i32,
    /// Minimum allowed position.
    pub min: i32,
    /// Maximum allowed position.
    pub max: i32,
}

impl JointSnapshot {
    /// The value of the requested bound.
    #[must_use]
    pub fn limit(&self, kind: LimitKind) -> i32 {
        match kind {
            LimitKind::Min => self.min,
            LimitKind::Max => self.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_names_round_trip() {
        for joint in JointId::ALL {
            assert_eq!(JointId::parse(joint.as_str()).unwrap(), joint);
        }
        assert_eq!(JointId::parse(" Grip ").unwrap(), JointId::Grip);
        JointId::parse("elbow").unwrap_err();
    }

    #[test]
    fn limit_names_round_trip() {
        assert_eq!(LimitKind::parse("min").unwrap(), LimitKind::Min);
        assert_eq!(LimitKind::parse("MAX").unwrap(), LimitKind::Max);
        LimitKind::parse("mid").unwrap_err();
    }

    #[test]
    fn snapshot_decodes_wire_fields() {
        let snapshot: JointSnapshot =
            serde_json::from_str(r#"{"pos": 90, "min": 50, "max": 140}"#).unwrap();
        assert_eq!(snapshot.pos, 90);
        assert_eq!(snapshot.limit(LimitKind::Min), 50);
        assert_eq!(snapshot.limit(LimitKind::Max), 140);
    }
}
