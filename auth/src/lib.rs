//! Authentication utilities library
//!
//! Framework-free building blocks for credential and session handling:
//! - Password hashing (Argon2id)
//! - Signed, time-limited bearer tokens (JWT, HS256)
//! - An authorization gate that turns an `Authorization` header into an identity
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## Tokens and the gate
//! ```
//! use std::sync::Arc;
//!
//! use auth::{AuthGate, TokenService};
//! use chrono::Duration;
//!
//! let tokens = Arc::new(TokenService::new(b"secret_key_at_least_32_bytes_long!", Duration::hours(1)));
//! let issued = tokens.issue("alice@example.com").unwrap();
//!
//! let gate = AuthGate::new(tokens);
//! let header = format!("Bearer {}", issued.access_token);
//! let identity = gate.authenticate(Some(&header)).unwrap();
//! assert_eq!(identity.email, "alice@example.com");
//! ```

pub mod gate;
pub mod jwt;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use gate::AuthGate;
pub use gate::AuthenticatedIdentity;
pub use gate::GateError;
pub use jwt::Claims;
pub use jwt::JwtHandler;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::IssuedToken;
pub use token::TokenService;
