use secrecy::SecretString;

/// Basic-auth credentials for the Prime REST API.
///
/// Sent with every request; Prime keeps no session between calls.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}
