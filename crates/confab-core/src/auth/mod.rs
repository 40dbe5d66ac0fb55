//! Account registration, login, and token verification for Confab.
//!
//! `AuthService` coordinates the `UserRepository`, `PasswordHasher`, and
//! `TokenService` ports. The crypto implementations live in confab-infra.

pub mod credentials;
pub mod service;
