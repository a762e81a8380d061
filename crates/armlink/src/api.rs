//! REST service contract and the HTTP implementation.
//!
//! The service exposes one endpoint per joint plus a control-token endpoint:
//!
//! | Operation | Request |
//! |---|---|
//! | Read joint state | `GET {base}/{joint}/info` → `{pos, min, max}` |
//! | Write position | `PUT {base}/{joint}` body `{"pos": n}` |
//! | Write bound | `PUT {base}/{joint}` body `{"min": n}` or `{"max": n}` |
//! | Acquire token | `POST {base}/control` body `{"name": s}`; 4xx body `{"message": holder}` on conflict |
//! | Release token | `DELETE {base}/control` |
//! | Stream URL | `GET {base}/camera/URL` |

use serde_json::json;
use smol_str::SmolStr;

use crate::config::ClientConfig;
use crate::error::ArmError;
use crate::joint::{JointId, JointSnapshot, LimitKind};

/// Placeholder holder name when a conflict body cannot be decoded.
pub const UNKNOWN_HOLDER: &str = "unknown";

/// The arm service as consumed by the client.
///
/// The seam exists so the transport can be faked in tests; production code
/// uses [`HttpArmService`].
pub trait ArmService: Send + Sync {
    /// Read the authoritative `{pos, min, max}` for one joint.
    fn joint_info(&self, joint: JointId) -> Result<JointSnapshot, ArmError>;

    /// Write a joint position. Requires the access token.
    fn set_position(&self, joint: JointId, pos: i32) -> Result<(), ArmError>;

    /// Write one bound of a joint. Requires the access token.
    fn set_limit(&self, joint: JointId, limit: LimitKind, value: i32) -> Result<(), ArmError>;

    /// Acquire the access token as `name`.
    fn acquire_control(&self, name: &str) -> Result<(), ArmError>;

    /// Release the access token.
    fn release_control(&self) -> Result<(), ArmError>;

    /// URL of the live camera stream.
    fn camera_url(&self) -> Result<String, ArmError>;
}

/// `ureq`-backed service client.
pub struct HttpArmService {
    agent: ureq::Agent,
    base_url: SmolStr,
}

impl HttpArmService {
    /// Build a client from the resolved configuration.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.connect_timeout)
            .timeout_read(config.read_timeout)
            .build();
        Self {
            agent,
            base_url: config.base_url.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn put_json(&self, joint: JointId, body: &str) -> Result<ureq::Response, ureq::Error> {
        self.agent
            .put(&self.url(joint.as_str()))
            .set("Content-Type", "application/json")
            .send_string(body)
    }
}

impl ArmService for HttpArmService {
    fn joint_info(&self, joint: JointId) -> Result<JointSnapshot, ArmError> {
        let response = self
            .agent
            .get(&self.url(&format!("{joint}/info")))
            .call()
            .map_err(transport_error)?;
        let text = response
            .into_string()
            .map_err(|err| ArmError::Transport(err.to_string().into()))?;
        serde_json::from_str(&text)
            .map_err(|err| ArmError::InvalidResponse(format!("{joint}/info: {err}").into()))
    }

    fn set_position(&self, joint: JointId, pos: i32) -> Result<(), ArmError> {
        self.put_json(joint, &json!({ "pos": pos }).to_string())
            .map(|_| ())
            .map_err(transport_error)
    }

    fn set_limit(&self, joint: JointId, limit: LimitKind, value: i32) -> Result<(), ArmError> {
        let body = json!({ limit.as_str(): value }).to_string();
        match self.put_json(joint, &body) {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(code, response)) if (400..500).contains(&code) => {
                let text = response.into_string().unwrap_or_default();
                let reason = body_message(&text)
                    .unwrap_or_else(|| SmolStr::new(format!("status {code}")));
                Err(ArmError::LimitRejected(reason))
            }
            Err(err) => Err(transport_error(err)),
        }
    }

    fn acquire_control(&self, name: &str) -> Result<(), ArmError> {
        let body = json!({ "name": name }).to_string();
        let result = self
            .agent
            .post(&self.url("control"))
            .set("Content-Type", "application/json")
            .send_string(&body);
        match result {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(code, response)) if (400..500).contains(&code) => {
                let text = response.into_string().unwrap_or_default();
                Err(ArmError::ControlHeld {
                    holder: conflict_holder(&text),
                })
            }
            Err(err) => Err(transport_error(err)),
        }
    }

    fn release_control(&self) -> Result<(), ArmError> {
        self.agent
            .delete(&self.url("control"))
            .call()
            .map(|_| ())
            .map_err(transport_error)
    }

    fn camera_url(&self) -> Result<String, ArmError> {
        let response = self
            .agent
            .get(&self.url("camera/URL"))
            .call()
            .map_err(transport_error)?;
        let text = response
            .into_string()
            .map_err(|err| ArmError::Transport(err.to_string().into()))?;
        Ok(text.trim().to_owned())
    }
}

fn transport_error(err: ureq::Error) -> ArmError {
    match err {
        ureq::Error::Status(code, _) => ArmError::Transport(format!("status {code}").into()),
        ureq::Error::Transport(transport) => ArmError::Transport(transport.to_string().into()),
    }
}

/// Extract the `message` field from a service error body.
fn body_message(text: &str) -> Option<SmolStr> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    value.get("message")?.as_str().map(SmolStr::new)
}

/// Holder name carried in a conflict body; the service is authoritative on
/// who holds the token.
pub(crate) fn conflict_holder(text: &str) -> SmolStr {
    body_message(text).unwrap_or_else(|| SmolStr::new(UNKNOWN_HOLDER))
}
