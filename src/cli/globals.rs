use secrecy::SecretString;

#[derive(Clone)]
pub struct GlobalArgs {
    pub token_secret: SecretString,
    pub token_ttl_seconds: i64,
    pub frontend_url: String,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(token_secret: SecretString, token_ttl_seconds: i64, frontend_url: String) -> Self {
        Self {
            token_secret,
            token_ttl_seconds,
            frontend_url,
        }
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("token_secret", &"***")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("frontend_url", &self.frontend_url)
            .finish()
    }
}
