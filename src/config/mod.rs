mod app_config;
mod ses_config;

pub use app_config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, EmailConfig, ServerConfig,
};
pub use ses_config::*;
