use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

pub static EMAIL_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex should compile")
});

/// Collects form errors. Only the first error recorded for a field is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validator {
    pub field_errors: HashMap<String, String>,
    pub non_field_errors: Vec<String>,
}

impl Validator {
    pub fn valid(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    pub fn check_field(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_field_error(key, message);
        }
    }

    pub fn check_non_field(&mut self, ok: bool, message: &str) {
        if !ok {
            self.add_non_field_error(message);
        }
    }

    pub fn add_field_error(&mut self, key: &str, message: &str) {
        self.field_errors
            .entry(key.to_owned())
            .or_insert_with(|| message.to_owned());
    }

    pub fn add_non_field_error(&mut self, message: &str) {
        self.non_field_errors.push(message.to_owned());
    }

    pub fn field_error(&self, key: &str) -> Option<&str> {
        self.field_errors.get(key).map(String::as_str)
    }
}

pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Counts characters, not bytes.
pub fn max_chars(value: &str, n: usize) -> bool {
    value.chars().count() <= n
}

pub fn min_chars(value: &str, n: usize) -> bool {
    value.chars().count() >= n
}

pub fn permitted<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}

pub fn matches(value: &str, rx: &Regex) -> bool {
    rx.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_blank_rejects_whitespace() {
        assert!(not_blank("abcde"));
        assert!(!not_blank(""));
        assert!(!not_blank("  \t\n"));
    }

    #[test]
    fn char_bounds_are_inclusive() {
        assert!(max_chars("abcde", 10));
        assert!(max_chars("abcde", 5));
        assert!(!max_chars("abcde", 3));

        assert!(min_chars("abcde", 3));
        assert!(min_chars("abcde", 5));
        assert!(!min_chars("abcde", 10));
    }

    #[test]
    fn char_bounds_count_unicode_scalars() {
        assert!(max_chars("žluťoučký", 9));
        assert!(!min_chars("日本語", 4));
    }

    #[test]
    fn permitted_values() {
        assert!(permitted(&2, &[2, 4, 6, 8]));
        assert!(!permitted(&2, &[4, 6, 8]));
        for days in [0, 2, 10, 30, 364, -1] {
            assert!(!permitted(&days, &[1, 7, 365]), "{days} should be rejected");
        }
    }

    #[test]
    fn accepts_valid_emails() {
        for email in [
            "abc@gmail.com",
            "123@gmail.com",
            "123abc@gmail.com",
            "ab12cd@yahoo.com",
            "ab12.cd@yahoo.com",
        ] {
            assert!(matches(email, &EMAIL_RX), "{email} should match");
        }
    }

    #[test]
    fn rejects_invalid_emails() {
        for email in [
            "abcgmail.com",
            "abc.gmail.com",
            "abc@gmail..com",
            "abc.com",
            "123@gmail,com",
            "123,abc@gmail.com",
            "ab12,cd@yahoo.com",
            "@yahoo.com",
            "bob@example.",
        ] {
            assert!(!matches(email, &EMAIL_RX), "{email} should not match");
        }
    }

    #[test]
    fn check_field_keeps_first_error() {
        let mut v = Validator::default();
        v.check_field(true, "title", "never recorded");
        v.check_field(false, "content", "first");
        v.check_field(false, "content", "second");

        assert_eq!(v.field_error("title"), None);
        assert_eq!(v.field_error("content"), Some("first"));
        assert!(!v.valid());
    }

    #[test]
    fn check_non_field() {
        let mut v = Validator::default();
        v.check_non_field(true, "errorMessage1");
        v.check_non_field(false, "errorMessage2");

        assert_eq!(v.non_field_errors, vec!["errorMessage2".to_owned()]);
        assert!(!v.valid());
    }

    #[test]
    fn empty_validator_is_valid() {
        assert!(Validator::default().valid());
    }
}
