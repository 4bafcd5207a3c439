//! Password policy applied before a signup request is sent

/// Minimum password length in characters
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum password length in characters
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// One line of the password checklist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordRequirement {
    /// What the rule asks for
    pub label: String,
    /// Whether the candidate satisfies it
    pub met: bool,
}

/// Evaluate every rule against a candidate password
#[must_use]
pub fn password_requirements(password: &str) -> Vec<PasswordRequirement> {
    let len = password.chars().count();
    let rule = |label: String, met: bool| PasswordRequirement { label, met };

    vec![
        rule(
            format!("At least {} characters", PASSWORD_MIN_LENGTH),
            len >= PASSWORD_MIN_LENGTH,
        ),
        rule("One lowercase letter".to_string(), has_lowercase(password)),
        rule("One uppercase letter".to_string(), has_uppercase(password)),
        rule("One number".to_string(), has_digit(password)),
        rule(
            "One special character (!@#$%^&* etc.)".to_string(),
            has_special(password),
        ),
        rule(
            format!("At most {} characters", PASSWORD_MAX_LENGTH),
            len <= PASSWORD_MAX_LENGTH,
        ),
    ]
}

/// First rule the password breaks, or `None` if it is acceptable
#[must_use]
pub fn validate_password(password: &str) -> Option<String> {
    if password.trim().is_empty() {
        return Some("Password is required".to_string());
    }

    let len = password.chars().count();
    if len < PASSWORD_MIN_LENGTH {
        return Some(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LENGTH
        ));
    }
    if len > PASSWORD_MAX_LENGTH {
        return Some(format!(
            "Password must be at most {} characters",
            PASSWORD_MAX_LENGTH
        ));
    }
    if !has_lowercase(password) {
        return Some("Password must contain at least one lowercase letter".to_string());
    }
    if !has_uppercase(password) {
        return Some("Password must contain at least one uppercase letter".to_string());
    }
    if !has_digit(password) {
        return Some("Password must contain at least one number".to_string());
    }
    if !has_special(password) {
        return Some("Password must contain at least one special character".to_string());
    }
    None
}

fn has_lowercase(p: &str) -> bool {
    p.chars().any(|c| c.is_ascii_lowercase())
}

fn has_uppercase(p: &str) -> bool {
    p.chars().any(|c| c.is_ascii_uppercase())
}

fn has_digit(p: &str) -> bool {
    p.chars().any(|c| c.is_ascii_digit())
}

// Anything outside [A-Za-z0-9] counts, including spaces and non-Latin letters
fn has_special(p: &str) -> bool {
    p.chars().any(|c| !c.is_ascii_alphanumeric())
}
