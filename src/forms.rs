use serde::Deserialize;

use crate::validation::{self, Validator, EMAIL_RX};

pub const PERMITTED_EXPIRATION_DAYS: [i32; 3] = [1, 7, 365];
pub const MAX_TITLE_CHARS: usize = 100;
pub const MIN_PASSWORD_CHARS: usize = 8;
/// Width of the `users.name` and `users.email` columns.
pub const MAX_USER_FIELD_CHARS: usize = 255;

const BLANK: &str = "This field cannot be blank";
const TOO_LONG_FOR_USER_FIELD: &str = "This field cannot be more than 255 characters long";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SnippetCreateForm {
    pub title: String,
    pub content: String,
    pub expires: i32,
    #[serde(skip)]
    pub validator: Validator,
}

impl SnippetCreateForm {
    /// The blank form shown on first visit.
    pub fn new() -> Self {
        Self {
            expires: 365,
            ..Default::default()
        }
    }

    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(validation::not_blank(&self.title), "title", BLANK);
        v.check_field(
            validation::max_chars(&self.title, MAX_TITLE_CHARS),
            "title",
            "This field cannot be more than 100 characters long",
        );
        v.check_field(validation::not_blank(&self.content), "content", BLANK);
        v.check_field(
            validation::permitted(&self.expires, &PERMITTED_EXPIRATION_DAYS),
            "expires",
            "This field must equal 1, 7 or 365",
        );
        v.valid()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserSignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub validator: Validator,
}

impl UserSignupForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(validation::not_blank(&self.name), "name", BLANK);
        v.check_field(
            validation::max_chars(&self.name, MAX_USER_FIELD_CHARS),
            "name",
            TOO_LONG_FOR_USER_FIELD,
        );
        v.check_field(validation::not_blank(&self.email), "email", BLANK);
        v.check_field(
            validation::max_chars(&self.email, MAX_USER_FIELD_CHARS),
            "email",
            TOO_LONG_FOR_USER_FIELD,
        );
        v.check_field(
            validation::matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(validation::not_blank(&self.password), "password", BLANK);
        v.check_field(
            validation::min_chars(&self.password, MIN_PASSWORD_CHARS),
            "password",
            "This field must be at least 8 characters long",
        );
        v.valid()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserLoginForm {
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub validator: Validator,
}

impl UserLoginForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(validation::not_blank(&self.email), "email", BLANK);
        v.check_field(
            validation::matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(validation::not_blank(&self.password), "password", BLANK);
        v.valid()
    }
}
