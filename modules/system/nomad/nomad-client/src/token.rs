use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::{ExposeSecret, SecretString};

/// Process-wide auth token. Readers take one snapshot per call; writers swap
/// the whole value, so a call never sees a half-written token.
pub(crate) struct TokenCell {
    inner: ArcSwapOption<SecretString>,
}

impl TokenCell {
    pub(crate) fn new(initial: Option<SecretString>) -> Self {
        let cell = Self {
            inner: ArcSwapOption::empty(),
        };
        cell.set(initial);
        cell
    }

    pub(crate) fn load(&self) -> Option<Arc<SecretString>> {
        self.inner.load_full()
    }

    /// An empty secret clears the token.
    pub(crate) fn set(&self, token: Option<SecretString>) {
        let token = token.filter(|secret| !secret.expose_secret().is_empty());
        self.inner.store(token.map(Arc::new));
    }

    pub(crate) fn is_set(&self) -> bool {
        self.inner.load().is_some()
    }
}

impl std::fmt::Debug for TokenCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.is_set() {
            "authenticated"
        } else {
            "unauthenticated"
        };
        f.debug_tuple("TokenCell").field(&state).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::new(value.to_owned().into_boxed_str())
    }

    #[test]
    fn empty_token_means_unauthenticated() {
        let cell = TokenCell::new(Some(secret("")));
        assert!(cell.load().is_none());
    }

    #[test]
    fn set_replaces_and_clears() {
        let cell = TokenCell::new(None);
        cell.set(Some(secret("first")));
        let snapshot = cell.load().unwrap();

        cell.set(Some(secret("second")));
        assert_eq!(snapshot.expose_secret(), "first");
        assert_eq!(cell.load().unwrap().expose_secret(), "second");

        cell.set(None);
        assert!(!cell.is_set());
    }

    #[test]
    fn debug_hides_secret() {
        let cell = TokenCell::new(Some(secret("s3cr3t")));
        let rendered = format!("{cell:?}");
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("authenticated"));
    }
}
