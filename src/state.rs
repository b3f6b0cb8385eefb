use std::sync::Arc;

use crate::hub::Hub;

/// Shared application state handed to every handler. The hub is the only
/// component holding mutable session data; everything reaches it through
/// this handle.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<Hub>,
}

impl AppState {
    pub fn new(command_prefix: char) -> Self {
        Self {
            hub: Arc::new(Hub::new(command_prefix)),
        }
    }
}
