use serde::{Deserialize, Serialize};

/// User record stored in redb, keyed by username
/// Uses Unix timestamp for compact storage with bincode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    /// Argon2id PHC string, never the plaintext
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(rename = "winStreak")]
    pub win_streak: i64,
    pub exp: i64,
    #[serde(rename = "completedLevels")]
    pub completed_levels: i64,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

impl UserRecord {
    /// Fresh record with all progression counters at zero
    pub fn new(id: String, username: String, password_hash: String, created_at: i64) -> Self {
        Self {
            id,
            username,
            password_hash,
            win_streak: 0,
            exp: 0,
            completed_levels: 0,
            created_at,
        }
    }
}

/// Credentials body shared by register and login
#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    /// Both fields are required and the username is compared trimmed
    pub fn validate(self) -> Result<Self, String> {
        let username = self.username.trim().to_string();
        if username.is_empty() {
            return Err("Username is required".to_string());
        }
        if self.password.is_empty() {
            return Err("Password is required".to_string());
        }
        Ok(Self {
            username,
            password: self.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_counters_start_at_zero() {
        let record = UserRecord::new(
            "id".to_string(),
            "alice".to_string(),
            "$argon2id$...".to_string(),
            1733788800,
        );

        assert_eq!(record.win_streak, 0);
        assert_eq!(record.exp, 0);
        assert_eq!(record.completed_levels, 0);
    }

    #[test]
    fn test_user_record_serialization() {
        let record = UserRecord::new(
            "id".to_string(),
            "alice".to_string(),
            "hash".to_string(),
            1733788800,
        );

        // Verify bincode serialization works
        let bytes = bincode::serialize(&record).unwrap();
        let deserialized: UserRecord = bincode::deserialize(&bytes).unwrap();

        assert_eq!(record.username, deserialized.username);
        assert_eq!(record.created_at, deserialized.created_at);
    }

    #[test]
    fn test_credentials_validation() {
        let ok = Credentials {
            username: "  bob ".to_string(),
            password: "pw".to_string(),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.username, "bob");

        assert!(Credentials {
            username: "   ".to_string(),
            password: "pw".to_string(),
        }
        .validate()
        .is_err());

        assert!(Credentials {
            username: "bob".to_string(),
            password: String::new(),
        }
        .validate()
        .is_err());
    }
}
