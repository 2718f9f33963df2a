//! CLI subcommands.

pub mod migrate;
pub mod stores;

use secrecy::SecretString;

/// Environment variable holding the database URL.
pub const DATABASE_URL_VAR: &str = "STOREHUB_DATABASE_URL";

/// Database URL from `STOREHUB_DATABASE_URL`, falling back to `DATABASE_URL`.
pub fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    std::env::var(DATABASE_URL_VAR)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}
