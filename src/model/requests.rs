//! Request bodies for the auth endpoints.

use serde::Serialize;
use std::fmt;

/// `POST /auth/login` body. The login endpoint expects PascalCase keys.
#[derive(Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Surrounding whitespace is trimmed from both values.
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            password: password.trim().to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// `POST /auth/register` body.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub display_name: String,
    pub password: String,
}

impl Registration {
    pub fn new(username: &str, display_name: &str, password: &str) -> Self {
        Self {
            username: username.trim().to_string(),
            display_name: display_name.trim().to_string(),
            password: password.trim().to_string(),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("display_name", &self.display_name)
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_and_register_use_their_own_key_casing() {
        let login = serde_json::to_value(Credentials::new(" ada ", "Secret1!")).unwrap();
        assert_eq!(login, json!({"Username": "ada", "Password": "Secret1!"}));

        let register = serde_json::to_value(Registration::new("ada", "Ada L.", "Secret1!")).unwrap();
        assert_eq!(
            register,
            json!({"username": "ada", "displayName": "Ada L.", "password": "Secret1!"})
        );
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("ada", "Secret1!"));
        assert!(!rendered.contains("Secret1!"));
    }
}
