use chrono::Local;
use serde::{Deserialize, Serialize};

use super::user::UserPublic;

/// Timestamp carried on every message, formatted the way clients display it.
fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Every event the hub can emit. Once appended to the history log a message
/// is immutable; append order is the only ordering clients are promised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireMessage", try_from = "WireMessage")]
pub enum Message {
    /// One user's chat text, relayed to everyone but the author.
    Chat {
        author: UserPublic,
        username: Option<String>,
        content: String,
        time: String,
    },
    /// Free-form gateway-originated text: help output, errors, moderation
    /// notices.
    Announcement { content: String, time: String },
    Joined {
        user: UserPublic,
        content: String,
        time: String,
    },
    Left {
        user: UserPublic,
        content: String,
        time: String,
    },
    /// Carries the acting admin; the removed user is named in the content.
    ForciblyRemoved {
        actor: UserPublic,
        content: String,
        time: String,
    },
    PermissionDenied {
        user: UserPublic,
        content: String,
        time: String,
    },
}

impl Message {
    pub fn chat(author: UserPublic, username: Option<String>, content: String) -> Self {
        Message::Chat {
            author,
            username,
            content,
            time: timestamp(),
        }
    }

    pub fn announcement(content: impl Into<String>) -> Self {
        Message::Announcement {
            content: content.into(),
            time: timestamp(),
        }
    }

    pub fn joined(user: UserPublic) -> Self {
        let content = format!("User {} ({}) connected.", user.id, user.address);
        Message::Joined {
            user,
            content,
            time: timestamp(),
        }
    }

    pub fn left(user: UserPublic) -> Self {
        let content = format!("User {} ({}) disconnected.", user.id, user.address);
        Message::Left {
            user,
            content,
            time: timestamp(),
        }
    }

    pub fn forcibly_removed(actor: UserPublic, target: &UserPublic) -> Self {
        let content = format!(
            "User {} was disconnected by user {}.",
            target.id, actor.id
        );
        Message::ForciblyRemoved {
            actor,
            content,
            time: timestamp(),
        }
    }

    pub fn permission_denied(user: UserPublic) -> Self {
        let content = format!(
            "User {} is not permitted to perform this action.",
            user.id
        );
        Message::PermissionDenied {
            user,
            content,
            time: timestamp(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Message::Chat { content, .. }
            | Message::Announcement { content, .. }
            | Message::Joined { content, .. }
            | Message::Left { content, .. }
            | Message::ForciblyRemoved { content, .. }
            | Message::PermissionDenied { content, .. } => content,
        }
    }

    /// Serialized frame handed to connection channels during fan-out.
    pub fn to_frame(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Action discriminant for gateway-originated wire messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayAction {
    Custom,
    UserConnect,
    UserDisconnect,
    UserForceDisconnect,
    UserPermissionsError,
}

/// Canonical wire representation. Chat messages go out as `type:"user"`,
/// everything else as `type:"gateway"` discriminated by `action`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WireMessage {
    Gateway {
        action: GatewayAction,
        content: String,
        time: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        user: Option<UserPublic>,
    },
    User {
        username: Option<String>,
        content: String,
        time: String,
        user: UserPublic,
    },
}

impl From<Message> for WireMessage {
    fn from(msg: Message) -> Self {
        match msg {
            Message::Chat {
                author,
                username,
                content,
                time,
            } => WireMessage::User {
                username,
                content,
                time,
                user: author,
            },
            Message::Announcement { content, time } => WireMessage::Gateway {
                action: GatewayAction::Custom,
                content,
                time,
                user: None,
            },
            Message::Joined {
                user,
                content,
                time,
            } => WireMessage::Gateway {
                action: GatewayAction::UserConnect,
                content,
                time,
                user: Some(user),
            },
            Message::Left {
                user,
                content,
                time,
            } => WireMessage::Gateway {
                action: GatewayAction::UserDisconnect,
                content,
                time,
                user: Some(user),
            },
            Message::ForciblyRemoved {
                actor,
                content,
                time,
            } => WireMessage::Gateway {
                action: GatewayAction::UserForceDisconnect,
                content,
                time,
                user: Some(actor),
            },
            Message::PermissionDenied {
                user,
                content,
                time,
            } => WireMessage::Gateway {
                action: GatewayAction::UserPermissionsError,
                content,
                time,
                user: Some(user),
            },
        }
    }
}

impl TryFrom<WireMessage> for Message {
    type Error = String;

    fn try_from(wire: WireMessage) -> Result<Self, Self::Error> {
        match wire {
            WireMessage::User {
                username,
                content,
                time,
                user,
            } => Ok(Message::Chat {
                author: user,
                username,
                content,
                time,
            }),
            WireMessage::Gateway {
                action,
                content,
                time,
                user,
            } => match (action, user) {
                (GatewayAction::Custom, None) => Ok(Message::Announcement { content, time }),
                (GatewayAction::Custom, Some(_)) => {
                    Err("custom gateway message must not carry a user".to_string())
                }
                (GatewayAction::UserConnect, Some(user)) => Ok(Message::Joined {
                    user,
                    content,
                    time,
                }),
                (GatewayAction::UserDisconnect, Some(user)) => Ok(Message::Left {
                    user,
                    content,
                    time,
                }),
                (GatewayAction::UserForceDisconnect, Some(actor)) => {
                    Ok(Message::ForciblyRemoved {
                        actor,
                        content,
                        time,
                    })
                }
                (GatewayAction::UserPermissionsError, Some(user)) => {
                    Ok(Message::PermissionDenied {
                        user,
                        content,
                        time,
                    })
                }
                (action, None) => Err(format!("gateway action {action:?} requires a user")),
            },
        }
    }
}

/// Closed set of frames clients may send, classified by shape at the
/// boundary. Anything matching none of the three is a malformed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// `{admin:true, action:"disconnect", user_id}`
    Admin { user_id: u64 },
    /// `{system:true, content}`
    System { content: String },
    /// `{username?, content}`
    Chat {
        username: Option<String>,
        content: String,
    },
}

#[derive(Debug, Deserialize)]
struct RawInbound {
    admin: Option<bool>,
    system: Option<bool>,
    action: Option<String>,
    user_id: Option<u64>,
    username: Option<String>,
    content: Option<String>,
}

impl Inbound {
    pub fn parse(text: &str) -> Option<Inbound> {
        let raw: RawInbound = serde_json::from_str(text).ok()?;
        if raw.admin == Some(true) {
            if raw.action.as_deref() != Some("disconnect") {
                return None;
            }
            return Some(Inbound::Admin {
                user_id: raw.user_id?,
            });
        }
        if raw.system == Some(true) {
            return Some(Inbound::System {
                content: raw.content?,
            });
        }
        Some(Inbound::Chat {
            username: raw.username,
            content: raw.content?,
        })
    }
}
