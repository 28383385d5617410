use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub passphrase: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            passphrase: "1234".to_string(),
        }
    }
}

/// Per-session access gate. Plain equality check, no lockout.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    access: bool,
}

impl Session {
    pub fn start() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            access: false,
        }
    }

    pub fn has_access(&self) -> bool {
        self.access
    }

    pub fn authenticate(
        &mut self,
        username: &str,
        passphrase: &str,
        expected: &Credentials,
    ) -> bool {
        if username == expected.username && passphrase == expected.passphrase {
            self.access = true;
            info!("Session {} authenticated as {username}", self.id);
        } else {
            warn!("Session {}: invalid key for user '{username}'", self.id);
        }
        self.access
    }

    pub fn logout(&mut self) {
        self.access = false;
        info!("Session {} logged out", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_no_access() {
        assert!(!Session::start().has_access());
    }

    #[test]
    fn exact_credentials_grant_access() {
        let mut session = Session::start();
        assert!(session.authenticate("admin", "1234", &Credentials::default()));
        assert!(session.has_access());
    }

    #[test]
    fn near_misses_are_rejected() {
        let creds = Credentials::default();
        let mut session = Session::start();
        assert!(!session.authenticate("Admin", "1234", &creds));
        assert!(!session.authenticate("admin", "1234 ", &creds));
        assert!(!session.authenticate("", "", &creds));
        assert!(!session.has_access());
    }

    #[test]
    fn failed_attempt_after_login_keeps_access() {
        let creds = Credentials::default();
        let mut session = Session::start();
        session.authenticate("admin", "1234", &creds);
        assert!(session.authenticate("admin", "nope", &creds));
    }

    #[test]
    fn logout_resets_access() {
        let mut session = Session::start();
        session.authenticate("admin", "1234", &Credentials::default());
        session.logout();
        assert!(!session.has_access());
    }
}
