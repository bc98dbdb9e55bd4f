/// Resolves the actor recorded in `created_by` / `last_modified_by`.
pub trait AuditorProvider: Send + Sync {
    fn current_auditor(&self) -> Option<String>;
}
