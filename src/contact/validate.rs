//! Field validator for sanitized contact forms.
//!
//! All checks run; failures accumulate in submission order
//! (name, email, phone) so the caller can report every problem at once.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::model::ContactForm;

/// ASCII whitespace as accepted in names and ignored in phone numbers.
/// Includes vertical tab, unlike `char::is_ascii_whitespace`.
const WHITESPACE_CLASS: &str = r" \t\n\x0B\x0C\r";

/// ASCII letters and whitespace only.
static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^[A-Za-z{WHITESPACE_CLASS}]+$")).unwrap());

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("[{WHITESPACE_CLASS}]")).unwrap());

/// `local@domain.tld`: dot-separated atoms, then at least two DNS labels.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .unwrap()
});

/// Indian mobile number: ten digits starting with 6-9.
static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").unwrap());

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;

/// A validated form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
}

/// Why a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    Required,
    InvalidFormat,
}

/// A single failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationError {
    pub field: Field,
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    fn new(field: Field, kind: ValidationErrorKind) -> Self {
        Self { field, kind }
    }

    /// Human-readable message shown to the visitor.
    pub fn message(&self) -> &'static str {
        use ValidationErrorKind::*;
        match (self.field, self.kind) {
            (Field::Name, Required) => "Name is required",
            (Field::Name, InvalidFormat) => "Please enter a valid name (letters and spaces only)",
            (Field::Email, Required) => "Email is required",
            (Field::Email, InvalidFormat) => "Please enter a valid email address",
            (Field::Phone, _) => "Please enter a valid 10-digit phone number",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Ordered list of failed checks. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages in check order.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message().to_string()).collect()
    }
}

/// Run every check against a sanitized form.
pub fn validate_form(form: &ContactForm) -> ValidationResult {
    let mut errors = Vec::new();

    if form.name.is_empty() {
        errors.push(ValidationError::new(Field::Name, ValidationErrorKind::Required));
    } else if !is_valid_name(&form.name) {
        errors.push(ValidationError::new(Field::Name, ValidationErrorKind::InvalidFormat));
    }

    if form.email.is_empty() {
        errors.push(ValidationError::new(Field::Email, ValidationErrorKind::Required));
    } else if !is_valid_email(&form.email) {
        errors.push(ValidationError::new(Field::Email, ValidationErrorKind::InvalidFormat));
    }

    if !is_valid_phone(&form.phone) {
        errors.push(ValidationError::new(Field::Phone, ValidationErrorKind::InvalidFormat));
    }

    ValidationResult { errors }
}

/// At least two characters, ASCII letters and whitespace only.
pub fn is_valid_name(name: &str) -> bool {
    name.len() >= 2 && NAME.is_match(name)
}

/// Syntactic check only; no DNS lookup.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN {
        return false;
    }
    match email.split_once('@') {
        Some((local, _)) if local.len() <= MAX_LOCAL_PART_LEN => EMAIL.is_match(email),
        _ => false,
    }
}

/// Optional field: empty is valid. Whitespace is ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    if phone.is_empty() {
        return true;
    }
    PHONE.is_match(&WHITESPACE.replace_all(phone, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, phone: &str) -> ContactForm {
        ContactForm {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            ..Default::default()
        }
    }

    // ── Name ────────────────────────────────────────────────────────

    #[test]
    fn name_accepts_letters_and_spaces() {
        for name in ["Jo", "Jane Doe", "Mary Ann Smith", "ab"] {
            assert!(is_valid_name(name), "{name}");
        }
    }

    #[test]
    fn name_rejects_digits_symbols_and_short_input() {
        for name in ["J", "R2D2", "Jane-Doe", "O&#039;Brien", "Jane.", "Zoë"] {
            assert!(!is_valid_name(name), "{name}");
        }
    }

    // ── Email ───────────────────────────────────────────────────────

    #[test]
    fn email_accepts_well_formed_addresses() {
        for email in [
            "jane@example.com",
            "jane.doe+tag@mail.example.co.in",
            "a_b-c@sub-domain.example.org",
        ] {
            assert!(is_valid_email(email), "{email}");
        }
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        for email in [
            "bad",
            "jane@",
            "@example.com",
            "jane@example",
            "jane@@example.com",
            "jane doe@example.com",
            ".jane@example.com",
            "jane..doe@example.com",
            "jane@-example.com",
            "jane@example..com",
        ] {
            assert!(!is_valid_email(email), "{email}");
        }
    }

    #[test]
    fn email_rejects_overlong_local_part() {
        let email = format!("{}@example.com", "a".repeat(65));
        assert!(!is_valid_email(&email));
    }

    // ── Phone ───────────────────────────────────────────────────────

    #[test]
    fn phone_empty_is_valid() {
        assert!(is_valid_phone(""));
    }

    #[test]
    fn phone_accepts_indian_mobile_numbers() {
        for phone in ["9812345678", "6000000000", "98123 45678", " 7 8 1 2 3 4 5 6 7 8"] {
            assert!(is_valid_phone(phone), "{phone}");
        }
    }

    #[test]
    fn phone_ignores_the_same_whitespace_names_allow() {
        for phone in ["98123\x0B45678", "98123\x0C45678", "98123\t45678\r\n"] {
            assert!(is_valid_phone(phone), "{phone:?}");
        }
        assert!(is_valid_name("Jane\x0BDoe"));
    }

    #[test]
    fn phone_rejects_wrong_shape() {
        for phone in ["123", "5812345678", "98123456789", "981234567", "98123-45678", "+919812345678"] {
            assert!(!is_valid_phone(phone), "{phone}");
        }
    }

    // ── Aggregation ─────────────────────────────────────────────────

    #[test]
    fn valid_form_has_no_errors() {
        let result = validate_form(&form("Jane Doe", "jane@example.com", "9812345678"));
        assert!(result.is_valid());
        assert!(result.messages().is_empty());
    }

    #[test]
    fn empty_form_reports_required_fields() {
        let result = validate_form(&form("", "", ""));
        assert_eq!(result.messages(), vec!["Name is required", "Email is required"]);
        assert_eq!(result.errors[0].kind, ValidationErrorKind::Required);
    }

    #[test]
    fn every_failure_is_reported_in_order() {
        let result = validate_form(&form("J", "bad", "123"));
        assert_eq!(
            result.errors,
            vec![
                ValidationError::new(Field::Name, ValidationErrorKind::InvalidFormat),
                ValidationError::new(Field::Email, ValidationErrorKind::InvalidFormat),
                ValidationError::new(Field::Phone, ValidationErrorKind::InvalidFormat),
            ]
        );
        assert_eq!(
            result.messages().join(", "),
            "Please enter a valid name (letters and spaces only), \
             Please enter a valid email address, \
             Please enter a valid 10-digit phone number"
        );
    }

    #[test]
    fn display_matches_message() {
        let err = ValidationError::new(Field::Email, ValidationErrorKind::Required);
        assert_eq!(err.to_string(), "Email is required");
    }
}
