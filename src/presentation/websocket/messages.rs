//! WebSocket Frame Types
//!
//! JSON frames exchanged over the bidirectional chat stream.

use serde::{Deserialize, Serialize};

/// Inbound chat frame: one message from the client.
///
/// The first frame of a connection names the session's user and joins the
/// room; a frame whose text is "exit" (case-insensitive) leaves it.
#[derive(Debug, Deserialize)]
pub struct ChatFrame {
    pub username: String,

    #[serde(default)]
    pub text: String,
}

impl ChatFrame {
    /// Whether this frame asks to leave the room.
    pub fn is_exit(&self) -> bool {
        self.text.trim().eq_ignore_ascii_case("exit")
    }
}

/// Outbound error frame, sent before the server closes its side.
#[derive(Debug, Serialize)]
pub struct ErrorFrame {
    pub error: String,
}

impl ErrorFrame {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn exit_is_case_insensitive_and_trimmed() {
        for text in ["exit", "EXIT", "Exit", "  exit  "] {
            let frame = ChatFrame {
                username: "alice".into(),
                text: text.into(),
            };
            assert!(frame.is_exit(), "{text:?} should exit");
        }
        let frame = ChatFrame {
            username: "alice".into(),
            text: "exit now".into(),
        };
        assert!(!frame.is_exit());
    }

    #[test]
    fn text_defaults_to_empty_on_join_frames() {
        let frame: ChatFrame = serde_json::from_str(r#"{"username":"alice"}"#).unwrap();
        assert_eq!(frame.username, "alice");
        assert_eq!(frame.text, "");
    }
}
