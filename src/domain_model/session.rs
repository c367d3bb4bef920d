use std::fmt;

/// The two credentials minted per login. Each kind doubles as the cookie
/// name and as the Session Store key prefix.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "admin_access",
            TokenKind::Refresh => "admin_refresh",
        }
    }

    pub fn cookie_name(&self) -> &'static str {
        self.as_str()
    }

    pub fn session_key(&self, token: &str) -> SessionKey {
        SessionKey(format!("{}:{}", self.as_str(), token))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `"<kind>:<token>"`, the key of a Session Record.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
