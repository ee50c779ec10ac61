use serde::{Deserialize, Serialize};

/// Account role, closed set. Checked by exhaustive matching everywhere,
/// never by string comparison. Wire values keep the original "user"/"admin"
/// spelling for client compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    Customer,
    #[serde(rename = "admin")]
    Admin,
}

/// User record stored in redb
/// Uses Unix timestamp for compact storage with bincode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    /// Lowercased at registration; the unique key in the email index
    pub email: String,
    /// `salt$digest` as produced by `security::hash_password`
    pub password_hash: String,
    pub role: Role,
    /// When the user was created (Unix timestamp)
    pub created_at: i64,
}

/// User model for API responses (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn from_record(id: u64, record: &UserRecord) -> Self {
        Self {
            id,
            name: record.name.clone(),
            email: record.email.clone(),
            role: record.role,
        }
    }
}

/// Cheap shape check for registration emails: one `@`, a non-empty local
/// part, and a dotted domain. Deliverability is not our problem.
pub fn is_well_formed_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || email.contains(char::is_whitespace) {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_emails_accepted() {
        assert!(is_well_formed_email("alice@example.com"));
        assert!(is_well_formed_email("a.b+c@sub.example.co"));
    }

    #[test]
    fn test_malformed_emails_rejected() {
        assert!(!is_well_formed_email(""));
        assert!(!is_well_formed_email("alice"));
        assert!(!is_well_formed_email("@example.com"));
        assert!(!is_well_formed_email("alice@"));
        assert!(!is_well_formed_email("alice@example"));
        assert!(!is_well_formed_email("alice@.com"));
        assert!(!is_well_formed_email("alice@example."));
        assert!(!is_well_formed_email("al ice@example.com"));
    }

    #[test]
    fn test_role_wire_values() {
        assert_eq!(serde_json::to_string(&Role::Customer).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");

        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::Customer);
    }

    #[test]
    fn test_user_record_serialization() {
        let record = UserRecord {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "salt$digest".to_string(),
            role: Role::Customer,
            created_at: 1733788800,
        };

        // Verify bincode serialization works
        let bytes = bincode::serialize(&record).unwrap();
        let deserialized: UserRecord = bincode::deserialize(&bytes).unwrap();

        assert_eq!(record.email, deserialized.email);
        assert_eq!(record.role, deserialized.role);
        assert_eq!(record.created_at, deserialized.created_at);
    }
}
