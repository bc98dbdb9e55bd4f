use serde::{Deserialize, Serialize};

/// Role assigned to every newly registered account.
pub const DEFAULT_ROLE: &str = "USER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: i32,
    name: String,
}

impl Role {
    pub fn new(id: i32, name: String) -> Self {
        Self { id, name }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
