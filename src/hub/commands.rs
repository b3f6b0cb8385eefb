use crate::models::user::PermissionSet;

/// What a recognized command does. The set is closed: handlers are matched
/// by the hub, not looked up dynamically, and nothing registers at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Help,
    GrantAdmin,
}

/// A chat command: `name` is matched case-sensitively after the prefix,
/// `requires` gates execution per user.
#[derive(Debug)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: CommandKind,
    requires: fn(&PermissionSet) -> bool,
}

fn allow_all(_: &PermissionSet) -> bool {
    true
}

impl Command {
    pub fn new(name: &'static str, description: &'static str, kind: CommandKind) -> Self {
        Self {
            name,
            description,
            kind,
            requires: allow_all,
        }
    }

    pub fn requiring(mut self, requires: fn(&PermissionSet) -> bool) -> Self {
        self.requires = requires;
        self
    }

    pub fn allowed_for(&self, perms: &PermissionSet) -> bool {
        (self.requires)(perms)
    }
}

/// Outcome of matching chat content against the command grammar.
#[derive(Debug)]
pub enum Parse<'a> {
    /// No prefix; the content is ordinary chat.
    NotACommand,
    /// Prefixed, but the leading token matches no registered name.
    Unrecognized,
    Hit {
        command: &'a Command,
        args: Vec<String>,
    },
}

/// Outcome of a permission-checked dispatch. `Run` hands the hub a kind to
/// execute inside its serialized step.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    NotACommand,
    Unknown,
    Denied,
    Run {
        kind: CommandKind,
        args: Vec<String>,
    },
}

pub struct CommandRegistry {
    prefix: char,
    commands: Vec<Command>,
}

impl CommandRegistry {
    pub fn new(prefix: char) -> Self {
        Self {
            prefix,
            commands: Vec::new(),
        }
    }

    /// The hub's built-in command set, registered once at construction.
    pub fn builtin(prefix: char) -> Self {
        let mut registry = Self::new(prefix);
        registry.register(Command::new(
            "help",
            "List all available commands.",
            CommandKind::Help,
        ));
        registry.register(Command::new(
            "grant-admin",
            "Grant gateway and moderation permissions to a user by id.",
            CommandKind::GrantAdmin,
        ));
        registry
    }

    /// First registration of a name wins; later duplicates are ignored.
    pub fn register(&mut self, command: Command) {
        if self.commands.iter().any(|c| c.name == command.name) {
            return;
        }
        self.commands.push(command);
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    /// Registration order, which is also display order for help output.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn parse(&self, content: &str) -> Parse<'_> {
        let Some(stripped) = content.strip_prefix(self.prefix) else {
            return Parse::NotACommand;
        };
        let mut tokens = stripped.split_whitespace();
        let Some(name) = tokens.next() else {
            return Parse::Unrecognized;
        };
        match self.commands.iter().find(|c| c.name == name) {
            Some(command) => Parse::Hit {
                command,
                args: tokens.map(str::to_string).collect(),
            },
            None => Parse::Unrecognized,
        }
    }

    pub fn dispatch(&self, perms: &PermissionSet, content: &str) -> Dispatch {
        match self.parse(content) {
            Parse::NotACommand => Dispatch::NotACommand,
            Parse::Unrecognized => Dispatch::Unknown,
            Parse::Hit { command, args } => {
                if command.allowed_for(perms) {
                    Dispatch::Run {
                        kind: command.kind,
                        args,
                    }
                } else {
                    Dispatch::Denied
                }
            }
        }
    }
}
