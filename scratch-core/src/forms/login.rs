use super::{FieldCheck, FieldRule, FieldValue, Form};
use crate::types::LoginRequest;

const EMAIL: &[FieldRule] = &[
    FieldRule::Required("Invalid email address"),
    FieldRule::Email("Invalid email address"),
];
const PASSWORD: &[FieldRule] = &[FieldRule::MinLength(
    6,
    "Password must be at least 6 characters",
)];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl Form for LoginForm {
    type Payload = LoginRequest;

    fn fields(&self) -> Vec<FieldCheck<'_>> {
        vec![
            FieldCheck {
                name: "email",
                value: FieldValue::Text(&self.email),
                rules: EMAIL,
            },
            FieldCheck {
                name: "password",
                value: FieldValue::Text(&self.password),
                rules: PASSWORD,
            },
        ]
    }

    fn payload(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::FormState;

    #[test]
    fn test_login_rules() {
        let mut state = FormState::new(LoginForm::default());
        assert_eq!(state.errors().for_field("email"), Some("Invalid email address"));
        assert_eq!(
            state.errors().for_field("password"),
            Some("Password must be at least 6 characters")
        );

        state.update(|f| {
            f.email = "admin@example.com".to_string();
            f.password = "secret".to_string();
        });
        assert!(state.can_submit());
        assert_eq!(state.submit().unwrap().email, "admin@example.com");
    }
}
