const KEYRING_SERVICE: &str = "com.resumematcher.gemini.api_key";
const KEYRING_USERNAME: &str = "default";

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini API key kept in the OS keychain.
pub struct ApiKeyStore;

impl ApiKeyStore {
    pub fn new() -> Self {
        Self
    }

    pub fn load(&self) -> anyhow::Result<Option<String>> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USERNAME)?;
        let value = match entry.get_password() {
            Ok(v) => v,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        if value.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(value))
    }

    pub fn save(&self, api_key: &str) -> anyhow::Result<()> {
        let trimmed = api_key.trim();
        if trimmed.is_empty() {
            return Ok(());
        }

        let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USERNAME)?;
        entry.set_password(trimmed)?;
        Ok(())
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USERNAME)?;
        match entry.delete_credential() {
            Ok(_) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

impl Default for ApiKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variable first, keychain second.
pub fn resolve_api_key(env_value: Option<String>, store: &ApiKeyStore) -> anyhow::Result<Option<String>> {
    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return Ok(Some(value.trim().to_string()));
    }

    store.load()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_value_wins() {
        let store = ApiKeyStore::new();
        let resolved = resolve_api_key(Some("  env-key ".to_string()), &store).unwrap();
        assert_eq!(resolved.as_deref(), Some("env-key"));
    }
}
