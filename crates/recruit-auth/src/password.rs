//! Local password strength rules applied before registration
//!
//! The backend validates passwords too; checking locally avoids a round trip
//! for the common mistakes and lets the caller list what is missing.

/// Characters that satisfy the "special character" rule.
const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

pub struct PasswordRule {
    pub label: &'static str,
    check: fn(&str) -> bool,
}

impl PasswordRule {
    pub fn is_met(&self, password: &str) -> bool {
        (self.check)(password)
    }
}

pub const RULES: &[PasswordRule] = &[
    PasswordRule {
        label: "at least 8 characters",
        check: |p| p.chars().count() >= 8,
    },
    PasswordRule {
        label: "at least one lowercase letter",
        check: |p| p.chars().any(|c| c.is_ascii_lowercase()),
    },
    PasswordRule {
        label: "at least one uppercase letter",
        check: |p| p.chars().any(|c| c.is_ascii_uppercase()),
    },
    PasswordRule {
        label: "at least one digit",
        check: |p| p.chars().any(|c| c.is_ascii_digit()),
    },
    PasswordRule {
        label: "at least one special character",
        check: |p| p.chars().any(|c| SPECIAL_CHARS.contains(c)),
    },
];

/// Labels of the rules `password` does not satisfy, in rule order.
pub fn unmet_rules(password: &str) -> Vec<&'static str> {
    RULES
        .iter()
        .filter(|rule| !rule.is_met(password))
        .map(|rule| rule.label)
        .collect()
}

pub fn is_strong(password: &str) -> bool {
    RULES.iter().all(|rule| rule.is_met(password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_meets_every_rule() {
        assert!(is_strong("Recruit3r!"));
        assert!(unmet_rules("Recruit3r!").is_empty());
    }

    #[test]
    fn lists_each_missing_rule() {
        assert_eq!(
            unmet_rules("abc"),
            vec![
                "at least 8 characters",
                "at least one uppercase letter",
                "at least one digit",
                "at least one special character",
            ]
        );
    }

    #[test]
    fn backslash_and_quote_count_as_special() {
        assert!(is_strong("Passw0rd\\"));
        assert!(is_strong("Passw0rd\""));
    }

    #[test]
    fn unicode_letters_do_not_satisfy_ascii_rules() {
        assert!(!is_strong("ÉÉÉÉÉÉ1!"));
    }
}
