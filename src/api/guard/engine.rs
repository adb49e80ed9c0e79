//! Admission engine: bot detection, shield policy, and per-role rate limits.

use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;

use crate::api::handlers::auth::types::Role;

/// User-Agent substrings that mark a request as an automated client.
const BOT_UA_PATTERNS: &[&str] = &[
    "bot",
    "crawl",
    "spider",
    "scrape",
    "curl",
    "wget",
    "python-requests",
    "httpie",
    "go-http",
];

/// Path/query probes blocked by the shield policy.
const SHIELD_PATTERNS: &[&str] = &[
    "../",
    "%2e%2e",
    "/.env",
    "/.git",
    "etc/passwd",
    "<script",
    "union select",
];

/// Categorical outcome of the admission decision for one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Bot,
    Shield,
    RateLimited,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallerRole {
    Guest,
    User,
    Admin,
}

impl From<Role> for CallerRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Self::User,
            Role::Admin => Self::Admin,
        }
    }
}

impl CallerRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    const fn display(self) -> &'static str {
        match self {
            Self::Guest => "Guest",
            Self::User => "User",
            Self::Admin => "Admin",
        }
    }

    #[must_use]
    pub const fn quota_per_minute(self) -> u32 {
        match self {
            Self::Guest => 5,
            Self::User => 10,
            Self::Admin => 20,
        }
    }

    /// One bucket per role class, so the quota is shared by every caller
    /// with that role.
    #[must_use]
    pub fn bucket_name(self) -> String {
        format!("{}-rate-limit", self.as_str())
    }

    #[must_use]
    pub fn limit_message(self) -> String {
        format!(
            "{} request limit is exceeded ({} per minute). slow down !",
            self.display(),
            self.quota_per_minute()
        )
    }
}

/// Request metadata the engine decides on. Collected once per request.
#[derive(Debug)]
pub struct RequestMeta {
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub method: String,
    pub path: String,
    pub query: Option<String>,
}

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

struct RoleBucket {
    limiter: DirectLimiter,
}

impl RoleBucket {
    fn new(role: CallerRole) -> Self {
        Self {
            limiter: RateLimiter::direct(per_minute(role.quota_per_minute())),
        }
    }
}

fn per_minute(count: u32) -> Quota {
    Quota::per_minute(NonZeroU32::new(count).map_or(NonZeroU32::MIN, |count| count))
}

/// In-process protection engine holding one sliding-window limiter per role.
pub struct ProtectionEngine {
    guest: RoleBucket,
    user: RoleBucket,
    admin: RoleBucket,
}

impl ProtectionEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            guest: RoleBucket::new(CallerRole::Guest),
            user: RoleBucket::new(CallerRole::User),
            admin: RoleBucket::new(CallerRole::Admin),
        }
    }

    /// Evaluate one request. Order matters: bot, then shield, then quota, so
    /// automated clients never consume quota.
    pub fn evaluate(&self, role: CallerRole, meta: &RequestMeta) -> Verdict {
        if is_bot(meta.user_agent.as_deref()) {
            return Verdict::Bot;
        }
        if is_suspicious(&meta.path, meta.query.as_deref()) {
            return Verdict::Shield;
        }
        if self.bucket(role).limiter.check().is_err() {
            return Verdict::RateLimited;
        }
        Verdict::Allowed
    }

    fn bucket(&self, role: CallerRole) -> &RoleBucket {
        match role {
            CallerRole::Guest => &self.guest,
            CallerRole::User => &self.user,
            CallerRole::Admin => &self.admin,
        }
    }
}

impl Default for ProtectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn is_bot(user_agent: Option<&str>) -> bool {
    let Some(user_agent) = user_agent else {
        return true;
    };
    let lowered = user_agent.to_lowercase();
    BOT_UA_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

fn is_suspicious(path: &str, query: Option<&str>) -> bool {
    let mut target = path.to_lowercase();
    if let Some(query) = query {
        target.push('?');
        target.push_str(&query.to_lowercase());
    }
    SHIELD_PATTERNS
        .iter()
        .any(|pattern| target.contains(pattern))
}
