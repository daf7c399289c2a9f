//! Provider that accepts any credential pair. Test and demo setups only;
//! keep it out of production provider lists.

use secrecy::SecretString;

pub struct AlwaysTrueProvider;

impl AlwaysTrueProvider {
    #[must_use]
    pub fn check(&self, _login: &str, _password: &SecretString) -> bool {
        true
    }
}
