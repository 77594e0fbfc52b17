//! Wire protocol for the editor's IPC event socket
//!
//! The editor pushes commands as JSON-encoded messages over TCP on localhost,
//! one message per line. Event and field names on the wire are camelCase
//! because that is the protocol the editor already speaks; renaming them
//! here would break every other client.

use serde::{Deserialize, Serialize};

/// Default port the editor's IPC server listens on
pub const DEFAULT_IPC_PORT: u16 = 4006;

/// Default name the bridge registers under
pub const DEFAULT_CLIENT_NAME: &str = "pybridge-cli";

/// Get the IPC address for a given port (localhost only)
pub fn ipc_address(port: u16) -> String {
    format!("127.0.0.1:{}", port)
}

/// Message pushed from the IPC server to the bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Answer to a `registerAs` request
    Registered {
        accepted: bool,
        reason: Option<String>,
    },

    /// Compute the initial state for a page
    #[serde(rename_all = "camelCase")]
    DoComputeInitialState {
        id: u64,
        route: String,
        page_state: String,
    },

    /// Build the Python dependency environment
    DoPythonBuild { id: u64 },

    /// Keepalive probe; the bridge answers with `pong`
    Ping { timestamp: u64 },

    /// Answer to a bridge-initiated `ping`
    Pong { timestamp: u64 },
}

/// Message sent from the bridge to the IPC server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Register this process as a named client
    RegisterAs { name: String },

    /// Successful completion of a command; `payload` carries the raw
    /// handler output when the command produces one
    Ack { id: u64, payload: Option<Vec<u8>> },

    /// A command failed
    CommandError { id: u64, message: String },

    /// Keepalive probe; the server answers with `pong`
    Ping { timestamp: u64 },

    /// Answer to a server `ping`
    Pong { timestamp: u64 },
}

impl ServerMessage {
    /// Serialize to a single JSON line, trailing newline included
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    /// Parse one JSON line
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }
}

impl ClientMessage {
    /// Serialize to a single JSON line, trailing newline included
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    /// Parse one JSON line
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_uses_the_wire_event_name() {
        let msg = ClientMessage::RegisterAs {
            name: "pybridge-cli".to_string(),
        };
        let json = msg.to_json_line().unwrap();

        assert!(json.contains("\"type\":\"registerAs\""));
        assert!(json.contains("\"name\":\"pybridge-cli\""));
        assert!(json.ends_with('\n'));
    }

    #[test]
    fn test_compute_command_decodes_from_server_json() {
        let line = r#"{"type":"doComputeInitialState","id":7,"route":"/home","pageState":"{\"count\":1}"}"#;
        let msg = ServerMessage::from_json_line(line).unwrap();

        match msg {
            ServerMessage::DoComputeInitialState {
                id,
                route,
                page_state,
            } => {
                assert_eq!(id, 7);
                assert_eq!(route, "/home");
                assert_eq!(page_state, "{\"count\":1}");
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_compute_command_keeps_camel_case_fields() {
        let msg = ServerMessage::DoComputeInitialState {
            id: 1,
            route: "/".to_string(),
            page_state: "{}".to_string(),
        };
        let json = msg.to_json_line().unwrap();

        assert!(json.contains("\"type\":\"doComputeInitialState\""));
        assert!(json.contains("\"pageState\""));
        assert!(!json.contains("page_state"));
    }

    #[test]
    fn test_python_build_roundtrip() {
        let line = r#"{"type":"doPythonBuild","id":3}"#;
        let msg = ServerMessage::from_json_line(line).unwrap();

        match msg {
            ServerMessage::DoPythonBuild { id } => assert_eq!(id, 3),
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_registered_without_reason() {
        let line = r#"{"type":"registered","accepted":true}"#;
        let msg = ServerMessage::from_json_line(line).unwrap();

        match msg {
            ServerMessage::Registered { accepted, reason } => {
                assert!(accepted);
                assert!(reason.is_none());
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_ack_payload_roundtrip() {
        let msg = ClientMessage::Ack {
            id: 9,
            payload: Some(b"{\"x\":1}".to_vec()),
        };
        let line = msg.to_json_line().unwrap();
        let decoded = ClientMessage::from_json_line(&line).unwrap();

        match decoded {
            ClientMessage::Ack { id, payload } => {
                assert_eq!(id, 9);
                assert_eq!(payload.as_deref(), Some(b"{\"x\":1}".as_ref()));
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_command_error_uses_the_wire_event_name() {
        let msg = ClientMessage::CommandError {
            id: 4,
            message: "boom".to_string(),
        };
        let json = msg.to_json_line().unwrap();

        assert!(json.contains("\"type\":\"commandError\""));
    }

    #[test]
    fn test_ipc_address_is_localhost_only() {
        assert_eq!(ipc_address(4006), "127.0.0.1:4006");
    }
}
