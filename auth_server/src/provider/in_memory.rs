//! Provider backed by a fixed, configuration-loaded login -> password map.

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::{ExposeSecret as _, SecretString};

pub struct InMemoryProvider {
    users: HashMap<String, Arc<SecretString>>,
}

impl InMemoryProvider {
    #[must_use]
    pub fn new(users: HashMap<String, Arc<SecretString>>) -> Self {
        Self { users }
    }

    /// Unknown login and wrong password are indistinguishable by design.
    #[must_use]
    pub fn check(&self, login: &str, password: &SecretString) -> bool {
        self.users
            .get(login)
            .is_some_and(|expected| expected.expose_secret() == password.expose_secret())
    }
}
