use crate::domain::services::auditor_service::AuditorProvider;

/// Records the same configured actor for every write.
#[derive(Clone, Debug)]
pub struct StaticAuditor {
    name: String,
}

impl StaticAuditor {
    pub fn new(name: String) -> Self {
        Self { name }
    }
}

impl AuditorProvider for StaticAuditor {
    fn current_auditor(&self) -> Option<String> {
        Some(self.name.clone())
    }
}
