use clap::Parser;
use once_cell::sync::Lazy;

pub const JWT_EXPIRY_SECONDS: i64 = 86400i64;

/// Appended to a student id to form the default password for accounts
/// created without an explicit one.
pub const DEFAULT_STUDENT_PASSWORD_SUFFIX: &str = "@123";

pub static APP_CONFIG: Lazy<Config> = Lazy::new(Config::parse);

#[derive(Debug, Parser, Clone)]
pub struct Config {
    #[clap(long, env, default_value_t = 8080)]
    pub port: u16,

    #[clap(long, env, default_value_t = true)]
    pub swagger_enabled: bool,

    #[clap(long, env, default_value = "info")]
    pub log_level: String,

    #[clap(long, env)]
    pub database_url: String,

    #[clap(long, env)]
    pub jwt_secret: String,

    #[clap(long, env, default_value = "*")]
    pub cors_allowed_origins: String,

    #[clap(long, env, default_value = "local")]
    pub app_env: String,

    #[clap(long, env, default_value = "instructor01")]
    pub bootstrap_instructor_username: String,

    #[clap(long, env, default_value = "instructor@123")]
    pub bootstrap_instructor_password: String,
}
