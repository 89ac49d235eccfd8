use crate::model::participant::ParticipantId;
use crate::model::room::RoomId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubjectError {
    #[error("empty subject")]
    Empty,
    #[error("unknown domain '{0}'")]
    UnknownDomain(String),
    #[error("unknown message type '{kind}' for domain '{domain}'")]
    UnknownKind { domain: String, kind: String },
    #[error("subject '{0}' has the wrong number of segments")]
    WrongShape(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebrtcKind {
    /// The call offer. The wire keeps the original client's `sdp` spelling.
    Sdp,
    Answer,
    Ice,
    Disconnect,
}

impl WebrtcKind {
    fn as_str(self) -> &'static str {
        match self {
            WebrtcKind::Sdp => "sdp",
            WebrtcKind::Answer => "answer",
            WebrtcKind::Ice => "ice",
            WebrtcKind::Disconnect => "disconnect",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Offer,
    Answer,
    Ice,
    StopStream,
}

impl StreamKind {
    fn as_str(self) -> &'static str {
        match self {
            StreamKind::Offer => "offer",
            StreamKind::Answer => "answer",
            StreamKind::Ice => "ice",
            StreamKind::StopStream => "stop-stream",
        }
    }
}

/// Parsed form of the dotted routing key carried by every frame.
///
/// `chat.<room>`, `webrtc.<type>.<room>` and `stream.<type>.<room>.<participant>`.
/// `stream.stop-stream.<room>` is the one stream subject without a participant
/// segment; it only ever travels client-to-server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    Chat {
        room: RoomId,
    },
    Webrtc {
        kind: WebrtcKind,
        room: RoomId,
    },
    Stream {
        kind: StreamKind,
        room: RoomId,
        participant: Option<ParticipantId>,
    },
}

impl FromStr for Subject {
    type Err = SubjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(SubjectError::Empty);
        }
        let segments: Vec<&str> = s.split('.').collect();

        match segments[0] {
            "chat" => match segments.as_slice() {
                ["chat", room] if !room.is_empty() => Ok(Subject::Chat {
                    room: RoomId::from(*room),
                }),
                _ => Err(SubjectError::WrongShape(s.to_string())),
            },

            "webrtc" => {
                let ["webrtc", kind, room] = segments.as_slice() else {
                    return Err(SubjectError::WrongShape(s.to_string()));
                };
                let kind = match *kind {
                    "sdp" => WebrtcKind::Sdp,
                    "answer" => WebrtcKind::Answer,
                    "ice" => WebrtcKind::Ice,
                    "disconnect" => WebrtcKind::Disconnect,
                    other => {
                        return Err(SubjectError::UnknownKind {
                            domain: "webrtc".to_string(),
                            kind: other.to_string(),
                        });
                    }
                };
                if room.is_empty() {
                    return Err(SubjectError::WrongShape(s.to_string()));
                }
                Ok(Subject::Webrtc {
                    kind,
                    room: RoomId::from(*room),
                })
            }

            "stream" => match segments.as_slice() {
                ["stream", "stop-stream", room] if !room.is_empty() => Ok(Subject::Stream {
                    kind: StreamKind::StopStream,
                    room: RoomId::from(*room),
                    participant: None,
                }),
                ["stream", kind, room, participant]
                    if !room.is_empty() && !participant.is_empty() =>
                {
                    let kind = match *kind {
                        "offer" => StreamKind::Offer,
                        "answer" => StreamKind::Answer,
                        "ice" => StreamKind::Ice,
                        "stop-stream" => StreamKind::StopStream,
                        other => {
                            return Err(SubjectError::UnknownKind {
                                domain: "stream".to_string(),
                                kind: other.to_string(),
                            });
                        }
                    };
                    Ok(Subject::Stream {
                        kind,
                        room: RoomId::from(*room),
                        participant: Some(ParticipantId::from(*participant)),
                    })
                }
                _ => Err(SubjectError::WrongShape(s.to_string())),
            },

            other => Err(SubjectError::UnknownDomain(other.to_string())),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Chat { room } => write!(f, "chat.{room}"),
            Subject::Webrtc { kind, room } => write!(f, "webrtc.{}.{room}", kind.as_str()),
            Subject::Stream {
                kind,
                room,
                participant: Some(participant),
            } => write!(f, "stream.{}.{room}.{participant}", kind.as_str()),
            Subject::Stream {
                kind,
                room,
                participant: None,
            } => write!(f, "stream.{}.{room}", kind.as_str()),
        }
    }
}

impl Subject {
    pub fn room(&self) -> &RoomId {
        match self {
            Subject::Chat { room } => room,
            Subject::Webrtc { room, .. } => room,
            Subject::Stream { room, .. } => room,
        }
    }
}
