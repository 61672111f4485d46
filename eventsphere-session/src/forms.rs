use std::collections::BTreeMap;

/// Minimum accepted password length for new accounts.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Per-field validation messages. Collected in one pass so a form can show
/// every problem at once; an empty set means the form may be submitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

fn require(errors: &mut ValidationErrors, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

fn require_email(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "Email is required");
    } else if !value.contains('@') {
        errors.add(field, "Enter a valid email address");
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        require_email(&mut errors, "email", &self.email);
        require(&mut errors, "password", &self.password, "Password is required");
        errors
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub city: String,
    pub agree_terms: bool,
}

impl SignupForm {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        require(
            &mut errors,
            "first_name",
            &self.first_name,
            "First name is required",
        );
        require(
            &mut errors,
            "last_name",
            &self.last_name,
            "Last name is required",
        );
        require_email(&mut errors, "email", &self.email);
        require(
            &mut errors,
            "phone",
            &self.phone,
            "Phone number is required",
        );
        if self.password.is_empty() {
            errors.add("password", "Password is required");
        } else if self.password.len() < MIN_PASSWORD_LEN {
            errors.add("password", "Password must be at least 6 characters");
        }
        if self.password != self.confirm_password {
            errors.add("confirm_password", "Passwords do not match");
        }
        if !self.agree_terms {
            errors.add("agree_terms", "You must agree to the terms");
        }
        errors
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        require(&mut errors, "name", &self.name, "Name is required");
        require_email(&mut errors, "email", &self.email);
        require(&mut errors, "subject", &self.subject, "Subject is required");
        require(&mut errors, "message", &self.message, "Message is required");
        errors
    }
}
