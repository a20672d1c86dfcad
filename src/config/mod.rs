/// Database configuration and connection management
pub mod database;

/// Asset profile and account seeding from config.toml
pub mod profiles;
