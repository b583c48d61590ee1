//! Test fixtures and constants.

/// Token accepted by `Test::with_tokens(&[TOKEN])`.
pub const TOKEN: &str = "test-token-123";

/// Standard secrets used across multiple tests.
pub const STANDARD_SECRETS: &[(&str, &str)] = &[
    ("database-url", "postgres://localhost/mydb"),
    ("api-key", "sk-test-12345"),
    ("jwt-secret", "super-secret-jwt-token"),
    ("redis-url", "redis://localhost:6379"),
];
