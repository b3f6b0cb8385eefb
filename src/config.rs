#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub gateway_path: String,
    pub command_prefix: char,
    pub static_path: std::path::PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let command_prefix = std::env::var("CHATHUB_COMMAND_PREFIX")
            .ok()
            .and_then(|v| {
                let mut chars = v.chars();
                match (chars.next(), chars.next()) {
                    // A command prefix is one non-alphanumeric character.
                    (Some(c), None) if !c.is_alphanumeric() => Some(c),
                    _ => None,
                }
            })
            .unwrap_or('/');

        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(2012),
            gateway_path: std::env::var("CHATHUB_GATEWAY_PATH")
                .unwrap_or_else(|_| "/websocket".to_string()),
            command_prefix,
            static_path: std::env::var("CHATHUB_STATIC_PATH")
                .map(std::path::PathBuf::from)
                .unwrap_or_else(|_| std::path::PathBuf::from("./public")),
        }
    }
}
