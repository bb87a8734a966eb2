use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A registered nurse account.
///
/// `staff_number` is the badge or registration number the nurse signs up
/// with; `id` is the internal identifier carried in session tokens.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Nurse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub staff_number: String,
    #[ts(skip)]
    pub password_hash: String,
    pub created_at: jiff::Timestamp,
}

impl Nurse {
    /// First word of the full name, or the whole name when it has no spaces.
    pub fn first_name(&self) -> &str {
        self.full_name
            .split_whitespace()
            .next()
            .unwrap_or(self.full_name.as_str())
    }
}

/// Emails are unique regardless of case or surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nurse(full_name: &str) -> Nurse {
        Nurse {
            id: Uuid::new_v4(),
            full_name: full_name.to_string(),
            email: "a@b.org".to_string(),
            staff_number: "RN-1".to_string(),
            password_hash: String::new(),
            created_at: jiff::Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn first_name_takes_leading_word() {
        assert_eq!(nurse("Ada  Lovelace").first_name(), "Ada");
        assert_eq!(nurse("Florence").first_name(), "Florence");
        assert_eq!(nurse("").first_name(), "");
    }

    #[test]
    fn normalize_email_folds_case_and_trims() {
        assert_eq!(normalize_email("  Ada@Ward7.ORG "), "ada@ward7.org");
    }
}
