//! # WrapJet (User Accounts API)
//!
//! `wrapjet` is a small HTTP API backend for user accounts: signup, signin
//! and signout over a single `PostgreSQL` `users` table, with Argon2 password
//! hashing and a JWT identity cookie.
//!
//! ## Request protection
//!
//! Every request passes through a global protection gate before routing:
//!
//! 1. **Bot detection:** requests without a `User-Agent`, or with one matching
//!    a list of automated-client patterns, are rejected with `403`.
//! 2. **Shield:** requests whose path or query contains suspicious probes
//!    (traversal, dotfiles, injection markers) are rejected with `403`.
//! 3. **Rate limiting:** a sliding-window quota per caller role
//!    (`admin` 20/min, `user` 10/min, `guest` 5/min). Each role class shares
//!    one bucket, so the quota is global per role, not per caller.
//!
//! The caller role comes from a verified identity cookie (or bearer token);
//! anonymous callers are `guest`.
//!
//! ## Error surface
//!
//! Handlers return structured JSON for every failure. Unknown-email and
//! wrong-password signins share one `401` body so the response does not
//! reveal which part of the credentials was wrong.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
