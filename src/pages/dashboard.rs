//! Dashboard greeting from the cached user profile.

use crate::session::SessionStore;

#[must_use]
pub fn greeting(store: &SessionStore) -> String {
    match store.cached_user().and_then(|user| user.first_name).filter(|name| !name.is_empty()) {
        Some(name) => format!("Добрый день, {name}!"),
        None => "Добрый день!".to_owned(),
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
