//! Form definitions and their validation rules.
//!
//! Every form implements [`Validate`], turning raw submitted fields into a
//! typed value or a list of errors to show next to the inputs. Checks that need
//! the database (credentials, username uniqueness) happen in the handlers,
//! which append to the same [`FormErrors`].

use serde::Deserialize;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";
pub const INACTIVE_ACCOUNT: &str = "This account is inactive.";
pub const DUPLICATE_USERNAME: &str = "A user with that username already exists.";
pub const PASSWORD_MISMATCH: &str = "The two password fields didn’t match.";
pub const INVALID_USERNAME: &str =
    "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.";
pub const INVALID_EMAIL: &str = "Enter a valid email address.";

const USERNAME_MAX_LENGTH: usize = 150;
const NAME_MAX_LENGTH: usize = 150;
const PASSWORD_MIN_LENGTH: usize = 8;
/// Shorter usernames would match inside almost any password.
const SIMILARITY_MIN_USERNAME_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// `None` for errors that concern the form as a whole
    pub field: Option<&'static str>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: Some(field),
            message: message.into(),
        });
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.0.push(FieldError {
            field: None,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |e| e.field == Some(field))
            .map(|e| e.message.as_str())
    }

    pub fn non_field(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|e| e.field.is_none())
            .map(|e| e.message.as_str())
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

pub trait Validate {
    type Output;

    fn validate(&self) -> Result<Self::Output, FormErrors>;
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Validate for LoginForm {
    type Output = Credentials;

    fn validate(&self) -> Result<Credentials, FormErrors> {
        let mut errors = FormErrors::default();
        if self.username.trim().is_empty() {
            errors.add("username", REQUIRED);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        errors.into_result(|| Credentials {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RegistrationForm {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
}

impl Validate for RegistrationForm {
    type Output = NewAccount;

    fn validate(&self) -> Result<NewAccount, FormErrors> {
        let mut errors = FormErrors::default();
        let username = self.username.trim();
        check_username(username, &mut errors);

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        }
        if !self.password1.is_empty() && !self.password2.is_empty() {
            if self.password1 != self.password2 {
                errors.add("password2", PASSWORD_MISMATCH);
            } else {
                check_password_strength(&self.password2, username, &mut errors);
            }
        }

        errors.into_result(|| NewAccount {
            username: username.to_string(),
            password: self.password1.clone(),
        })
    }
}

/// Edits the public details of an account.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ProfileEditForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Widget {
    pub field: &'static str,
    pub input_type: &'static str,
    pub placeholder: &'static str,
}

impl ProfileEditForm {
    pub const WIDGETS: [Widget; 4] = [
        Widget {
            field: "username",
            input_type: "text",
            placeholder: "Username",
        },
        Widget {
            field: "email",
            input_type: "email",
            placeholder: "Email",
        },
        Widget {
            field: "first_name",
            input_type: "text",
            placeholder: "First Name",
        },
        Widget {
            field: "last_name",
            input_type: "text",
            placeholder: "Last Name",
        },
    ];

    pub fn from_user(user: &entities::user::Model) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }

    pub fn value(&self, field: &str) -> &str {
        match field {
            "username" => &self.username,
            "email" => &self.email,
            "first_name" => &self.first_name,
            "last_name" => &self.last_name,
            _ => "",
        }
    }
}

impl Validate for ProfileEditForm {
    type Output = ProfileUpdate;

    fn validate(&self) -> Result<ProfileUpdate, FormErrors> {
        let mut errors = FormErrors::default();
        let username = self.username.trim();
        check_username(username, &mut errors);

        let email = self.email.trim();
        if !email.is_empty() && !looks_like_email(email) {
            errors.add("email", INVALID_EMAIL);
        }
        for (field, value) in [("first_name", &self.first_name), ("last_name", &self.last_name)] {
            let length = value.trim().chars().count();
            if length > NAME_MAX_LENGTH {
                errors.add(field, too_long(NAME_MAX_LENGTH, length));
            }
        }

        errors.into_result(|| ProfileUpdate {
            username: username.to_string(),
            email: email.to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        })
    }
}

fn too_long(max: usize, actual: usize) -> String {
    format!("Ensure this value has at most {max} characters (it has {actual}).")
}

fn check_username(username: &str, errors: &mut FormErrors) {
    if username.is_empty() {
        errors.add("username", REQUIRED);
        return;
    }
    let length = username.chars().count();
    if length > USERNAME_MAX_LENGTH {
        errors.add("username", too_long(USERNAME_MAX_LENGTH, length));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        errors.add("username", INVALID_USERNAME);
    }
}

fn check_password_strength(password: &str, username: &str, errors: &mut FormErrors) {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.add(
            "password2",
            format!(
                "This password is too short. It must contain at least {PASSWORD_MIN_LENGTH} characters."
            ),
        );
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        errors.add("password2", "This password is entirely numeric.");
    }
    if username.chars().count() >= SIMILARITY_MIN_USERNAME_LENGTH
        && password.to_lowercase().contains(&username.to_lowercase())
    {
        errors.add("password2", "The password is too similar to the username.");
    }
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split('.')
            .filter(|label| !label.is_empty())
            .count()
            >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(username: &str, password1: &str, password2: &str) -> RegistrationForm {
        RegistrationForm {
            username: username.to_string(),
            password1: password1.to_string(),
            password2: password2.to_string(),
        }
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = LoginForm::default().validate().unwrap_err();
        assert_eq!(errors.for_field("username").collect::<Vec<_>>(), vec![REQUIRED]);
        assert_eq!(errors.for_field("password").collect::<Vec<_>>(), vec![REQUIRED]);
        assert_eq!(errors.non_field().count(), 0);
    }

    #[test]
    fn login_trims_username_only() {
        let form = LoginForm {
            username: "  alice ".to_string(),
            password: " secret ".to_string(),
            next: None,
        };
        let credentials = form.validate().unwrap();
        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.password, " secret ");
    }

    #[test]
    fn valid_registration() {
        let account = registration("new.user+1", "tr0ub4dor&3", "tr0ub4dor&3")
            .validate()
            .unwrap();
        assert_eq!(account.username, "new.user+1");
        assert_eq!(account.password, "tr0ub4dor&3");
    }

    #[test]
    fn registration_password_mismatch() {
        let errors = registration("alice", "longpassword1", "longpassword2")
            .validate()
            .unwrap_err();
        assert_eq!(
            errors.for_field("password2").collect::<Vec<_>>(),
            vec![PASSWORD_MISMATCH]
        );
    }

    #[test]
    fn registration_rejects_weak_passwords() {
        let errors = registration("alice", "1234567", "1234567").validate().unwrap_err();
        let messages: Vec<_> = errors.for_field("password2").collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("This password is too short"));
        assert_eq!(messages[1], "This password is entirely numeric.");

        let errors = registration("alice", "alice-rocks", "alice-rocks")
            .validate()
            .unwrap_err();
        assert_eq!(
            errors.for_field("password2").collect::<Vec<_>>(),
            vec!["The password is too similar to the username."]
        );
    }

    #[test]
    fn short_usernames_skip_the_similarity_check() {
        assert!(registration("a", "melodic-pulse-42", "melodic-pulse-42")
            .validate()
            .is_ok());
        assert!(registration("ed", "melodic-pulse-ed", "melodic-pulse-ed")
            .validate()
            .is_ok());
    }

    #[test]
    fn registration_rejects_bad_usernames() {
        let errors = registration("bad name!", "a-good-pass", "a-good-pass")
            .validate()
            .unwrap_err();
        assert_eq!(
            errors.for_field("username").collect::<Vec<_>>(),
            vec![INVALID_USERNAME]
        );

        let long = "a".repeat(151);
        let errors = registration(&long, "a-good-pass", "a-good-pass")
            .validate()
            .unwrap_err();
        assert_eq!(
            errors.for_field("username").collect::<Vec<_>>(),
            vec!["Ensure this value has at most 150 characters (it has 151)."]
        );
    }

    #[test]
    fn registration_requires_every_field() {
        let errors = RegistrationForm::default().validate().unwrap_err();
        assert_eq!(errors.for_field("username").count(), 1);
        assert_eq!(errors.for_field("password1").count(), 1);
        assert_eq!(errors.for_field("password2").count(), 1);
    }

    #[test]
    fn profile_email_is_optional_but_checked() {
        let mut form = ProfileEditForm {
            username: "alice".to_string(),
            email: String::new(),
            first_name: " Alice ".to_string(),
            last_name: "Liddell".to_string(),
        };
        let update = form.validate().unwrap();
        assert_eq!(update.email, "");
        assert_eq!(update.first_name, "Alice");

        form.email = "alice@example.com".to_string();
        assert_eq!(form.validate().unwrap().email, "alice@example.com");

        for bad in ["alice", "alice@", "@example.com", "alice@example", "a b@example.com"] {
            form.email = bad.to_string();
            let errors = form.validate().unwrap_err();
            assert_eq!(
                errors.for_field("email").collect::<Vec<_>>(),
                vec![INVALID_EMAIL],
                "{bad}"
            );
        }
    }

    #[test]
    fn profile_widgets_carry_placeholders() {
        let placeholders: Vec<_> = ProfileEditForm::WIDGETS
            .iter()
            .map(|w| w.placeholder)
            .collect();
        assert_eq!(placeholders, vec!["Username", "Email", "First Name", "Last Name"]);
        assert_eq!(ProfileEditForm::WIDGETS[1].input_type, "email");
    }

    #[test]
    fn non_field_errors_are_separate() {
        let mut errors = FormErrors::default();
        errors.add_non_field(INVALID_LOGIN);
        errors.add("username", REQUIRED);
        assert_eq!(errors.non_field().collect::<Vec<_>>(), vec![INVALID_LOGIN]);
        assert_eq!(errors.for_field("username").count(), 1);
    }
}
