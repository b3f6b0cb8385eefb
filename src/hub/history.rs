use crate::models::message::Message;

/// Append-only in-memory log of everything the hub has emitted. Replayed in
/// full to each newly joined connection; not persisted across restarts.
#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: Vec<Message>,
}

impl HistoryLog {
    pub fn append(&mut self, message: Message) {
        self.entries.push(message);
    }

    pub fn all(&self) -> &[Message] {
        &self.entries
    }

    pub fn filter(&self, predicate: impl Fn(&Message) -> bool) -> Vec<&Message> {
        self.entries.iter().filter(|m| predicate(m)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
