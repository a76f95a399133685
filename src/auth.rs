use secrecy::{ExposeSecret, SecretString};

/// Basic-auth pair attached to write requests.
///
/// The password is held as a [`SecretString`]: it is zeroized on drop and
/// never shows up in `Debug` output or log lines.
#[derive(Debug)]
pub struct Credentials {
    user: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: SecretString) -> Self {
        Self {
            user: user.into(),
            password,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Exposes the password for the `Authorization` header only.
    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }
}
