pub mod email_service;
pub mod newsletter_service;
