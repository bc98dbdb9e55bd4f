pub mod access_token_service;
pub mod activation_code_service;
pub mod auditor_service;
pub mod notification_service;
pub mod password_service;
