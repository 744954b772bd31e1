use regex::Regex;
use serde::Serialize;

/// sshd "Failed password" line, with or without the "invalid user" marker.
/// The username is non-greedy so it stops at the first " from ". Octets are
/// ASCII digits only.
const FAILED_PASSWORD_PATTERN: &str =
    r"Failed password for (?:invalid user )?(.+?) from ([0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3})";

/// A single rejected SSH authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureRecord {
    pub username: String,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct LineMatcher {
    pattern: Regex,
}

impl LineMatcher {
    pub fn new() -> Self {
        // The pattern is a compile-time constant, so a failure here is a programming error.
        let pattern = Regex::new(FAILED_PASSWORD_PATTERN).expect("failed password pattern is valid");
        Self { pattern }
    }

    /// Extracts the username and source address from the first failed-password
    /// event on `line`. Addresses are matched syntactically only.
    pub fn match_line(&self, line: &str) -> Option<FailureRecord> {
        let captures = self.pattern.captures(line)?;
        let username = captures.get(1)?.as_str();
        let address = captures.get(2)?.as_str();

        Some(FailureRecord {
            username: username.to_string(),
            address: address.to_string(),
        })
    }
}

impl Default for LineMatcher {
    fn default() -> Self {
        Self::new()
    }
}
