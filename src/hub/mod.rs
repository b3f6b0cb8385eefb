pub mod commands;
pub mod history;
pub mod registry;

use tokio::sync::{mpsc, Mutex};

use crate::models::message::{Inbound, Message};
use crate::models::user::{PermissionSet, UserPublic};
use commands::{CommandKind, CommandRegistry, Dispatch};
use history::HistoryLog;
use registry::UserRegistry;

/// The session hub. Sole owner of the user registry, the history log and the
/// command registry; every mutating event runs start-to-finish under one
/// lock acquisition, which is what makes history order equal acceptance
/// order and replay-then-announce atomic. Nothing awaits while holding the
/// lock, so one slow connection can never stall the others.
pub struct Hub {
    inner: Mutex<HubInner>,
}

struct HubInner {
    registry: UserRegistry,
    history: HistoryLog,
    commands: CommandRegistry,
}

impl Hub {
    pub fn new(prefix: char) -> Self {
        Self {
            inner: Mutex::new(HubInner {
                registry: UserRegistry::default(),
                history: HistoryLog::default(),
                commands: CommandRegistry::builtin(prefix),
            }),
        }
    }

    /// Accept an established connection. Registers the user, replays the
    /// full history into its channel in append order, then announces the
    /// join to everyone including the newcomer. All in one serialized step:
    /// no message can land between the replay snapshot and the join notice.
    pub async fn connect(&self, address: String) -> (u64, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().await;
        let id = inner.registry.register(address.clone(), tx);
        inner.replay_to(id);
        let user = UserPublic {
            id,
            address,
            permissions: PermissionSet::default(),
        };
        tracing::trace!(user = id, address = %user.address, "connection registered");
        let joined = Message::joined(user);
        inner.broadcast_all(&joined);
        inner.history.append(joined);
        (id, rx)
    }

    /// One inbound frame from an active connection. Malformed frames are
    /// answered privately and leave no trace in the history.
    pub async fn handle_frame(&self, id: u64, text: &str) {
        let mut inner = self.inner.lock().await;
        let Some(entry) = inner.registry.lookup(id) else {
            return;
        };
        let sender = entry.public();
        tracing::trace!(user = id, frame = text, "inbound frame");
        let Some(inbound) = Inbound::parse(text) else {
            inner.send_to(id, &Message::announcement("Invalid message."));
            return;
        };
        match inbound {
            Inbound::Admin { user_id } => inner.admin_disconnect(sender, user_id),
            Inbound::System { content } => inner.system_send(sender, content),
            Inbound::Chat { username, content } => inner.chat(sender, username, content),
        }
    }

    /// Transport-level close, local or remote. Idempotent: a user already
    /// removed (e.g. forcibly) triggers no second announcement.
    pub async fn disconnect(&self, id: u64) {
        let mut inner = self.inner.lock().await;
        let Some(entry) = inner.registry.deregister(id) else {
            return;
        };
        tracing::trace!(user = id, address = %entry.address, "connection closed");
        let left = Message::left(entry.public());
        inner.broadcast_all(&left);
        inner.history.append(left);
    }

    /// Snapshot of everyone currently connected.
    pub async fn connected_users(&self) -> Vec<UserPublic> {
        self.inner.lock().await.registry.all()
    }

    /// Snapshot of the history log in append order.
    pub async fn history(&self) -> Vec<Message> {
        self.inner.lock().await.history.all().to_vec()
    }
}

impl HubInner {
    fn replay_to(&self, id: u64) {
        if let Some(entry) = self.registry.lookup(id) {
            for message in self.history.all() {
                entry.send(message.to_frame());
            }
        }
    }

    /// Deliver to every connection, including whoever triggered the message.
    /// Fire-and-forget: a dead channel never blocks the rest of the fan-out.
    fn broadcast_all(&self, message: &Message) {
        let frame = message.to_frame();
        for entry in self.registry.iter() {
            entry.send(frame.clone());
        }
    }

    /// Deliver to every connection except `sender`.
    fn broadcast_except(&self, message: &Message, sender: u64) {
        let frame = message.to_frame();
        for entry in self.registry.iter().filter(|e| e.id != sender) {
            entry.send(frame.clone());
        }
    }

    /// Deliver to exactly one connection.
    fn send_to(&self, id: u64, message: &Message) {
        if let Some(entry) = self.registry.lookup(id) {
            entry.send(message.to_frame());
        }
    }

    /// Private denial notice plus a history entry; the action itself is not
    /// performed. Used for channel-level and command-level denials alike.
    fn deny(&mut self, user: UserPublic) {
        let id = user.id;
        let denial = Message::permission_denied(user);
        self.send_to(id, &denial);
        self.history.append(denial);
    }

    fn admin_disconnect(&mut self, actor: UserPublic, target_id: u64) {
        if !actor.permissions.can_disconnect_users() {
            tracing::info!(user = actor.id, target = target_id, "disconnect denied");
            self.deny(actor);
            return;
        }
        let Some(target) = self.registry.lookup(target_id) else {
            self.send_to(
                actor.id,
                &Message::announcement(format!("User {target_id} not found.")),
            );
            return;
        };
        let target = target.public();
        tracing::info!(user = actor.id, target = target_id, "forced disconnect");
        let removal = Message::forcibly_removed(actor, &target);
        self.broadcast_all(&removal);
        self.history.append(removal);
        // Dropping the entry drops its sender, which shuts the target's
        // connection task down.
        self.registry.deregister(target_id);
    }

    fn system_send(&mut self, actor: UserPublic, content: String) {
        if !actor.permissions.can_send_gateway() {
            tracing::info!(user = actor.id, "gateway send denied");
            self.deny(actor);
            return;
        }
        let message = Message::announcement(content);
        self.broadcast_all(&message);
        self.history.append(message);
    }

    fn chat(&mut self, sender: UserPublic, username: Option<String>, content: String) {
        match self.commands.dispatch(&sender.permissions, &content) {
            Dispatch::NotACommand => {
                let sender_id = sender.id;
                let message = Message::chat(sender, username, content);
                self.broadcast_except(&message, sender_id);
                self.history.append(message);
            }
            Dispatch::Unknown => {
                let prefix = self.commands.prefix();
                self.send_to(
                    sender.id,
                    &Message::announcement(format!(
                        "Unknown command. Use {prefix}help for a list of commands."
                    )),
                );
            }
            Dispatch::Denied => {
                tracing::info!(user = sender.id, "command denied");
                self.deny(sender);
            }
            Dispatch::Run { kind, args } => self.run_command(sender, kind, &args),
        }
    }

    fn run_command(&mut self, sender: UserPublic, kind: CommandKind, args: &[String]) {
        match kind {
            CommandKind::Help => {
                let prefix = self.commands.prefix();
                let mut lines = vec!["Available commands:".to_string()];
                for command in self.commands.commands() {
                    lines.push(format!("{prefix}{}: {}", command.name, command.description));
                }
                self.send_to(sender.id, &Message::announcement(lines.join("\n")));
            }
            CommandKind::GrantAdmin => {
                let prefix = self.commands.prefix();
                let Some(target_id) = args.first().and_then(|a| a.parse::<u64>().ok()) else {
                    self.send_to(
                        sender.id,
                        &Message::announcement(format!("Usage: {prefix}grant-admin <user id>")),
                    );
                    return;
                };
                match self.registry.lookup_mut(target_id) {
                    None => self.send_to(
                        sender.id,
                        &Message::announcement(format!("User {target_id} not found.")),
                    ),
                    Some(entry) => {
                        entry.permissions.grant_all();
                        tracing::info!(user = sender.id, target = target_id, "granted admin");
                        let message = Message::announcement(format!(
                            "User {target_id} was granted administrator permissions."
                        ));
                        self.broadcast_all(&message);
                        self.history.append(message);
                    }
                }
            }
        }
    }
}
