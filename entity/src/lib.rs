pub mod email_outbox;
pub mod roles;
pub mod tokens;
pub mod user_roles;
pub mod users;

pub use email_outbox::Entity as EmailOutbox;
pub use roles::Entity as Role;
pub use tokens::Entity as Token;
pub use user_roles::Entity as UserRole;
pub use users::Entity as User;
