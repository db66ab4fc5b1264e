use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9\s\-()]{7,15}$").expect("phone pattern compiles")
});

/// Contact details collected before the player may spin.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerInfo {
    /// Empty when the player skipped it.
    pub email: String,
    pub phone: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerField {
    Email,
    Phone,
}

/// Trims and checks the form fields, reporting every invalid one.
pub fn validate(email: &str, phone: &str) -> Result<PlayerInfo, Vec<PlayerField>> {
    let email = email.trim();
    let phone = phone.trim();

    let mut invalid = Vec::new();
    if !email.is_empty() && !EMAIL_PATTERN.is_match(email) {
        invalid.push(PlayerField::Email);
    }
    if !PHONE_PATTERN.is_match(phone) {
        invalid.push(PlayerField::Phone);
    }
    if !invalid.is_empty() {
        return Err(invalid);
    }
    Ok(PlayerInfo {
        email: email.to_string(),
        phone: phone.to_string(),
    })
}
