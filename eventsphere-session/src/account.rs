use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use eventsphere_core::{Result, UserProfile};

use crate::forms::{LoginForm, SignupForm, ValidationErrors};
use crate::store::{keys, KvStore};

/// Display name used by the simulated sign-in; there is no account backend.
const DEMO_USER_NAME: &str = "John Doe";

/// What came back from a signup attempt.
#[derive(Debug)]
pub enum SignupOutcome {
    Registered(UserProfile),
    Rejected(ValidationErrors),
}

/// The signed-in user, persisted under the `user` key.
///
/// Sign-in and sign-up are simulations: a fixed delay stands in for a backend
/// round trip and the result always succeeds once the form passes validation.
pub struct Account {
    store: Arc<dyn KvStore>,
    login_delay: Duration,
    signup_delay: Duration,
}

impl Account {
    pub fn new(store: Arc<dyn KvStore>, login_delay: Duration, signup_delay: Duration) -> Self {
        Self {
            store,
            login_delay,
            signup_delay,
        }
    }

    pub fn current(&self) -> Result<Option<UserProfile>> {
        match self.store.get(keys::USER)? {
            None => Ok(None),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(profile) => Ok(Some(profile)),
                Err(err) => {
                    warn!(%err, "corrupt stored user profile, treating as signed out");
                    Ok(None)
                }
            },
        }
    }

    pub fn is_logged_in(&self) -> Result<bool> {
        Ok(self
            .current()?
            .map(|profile| profile.logged_in)
            .unwrap_or(false))
    }

    pub async fn login(&self, form: &LoginForm) -> Result<UserProfile> {
        sleep(self.login_delay).await;
        let profile = UserProfile {
            name: DEMO_USER_NAME.to_string(),
            email: form.email.clone(),
            phone: None,
            city: None,
            logged_in: true,
        };
        self.save(&profile)?;
        info!(email = %profile.email, "signed in");
        Ok(profile)
    }

    pub async fn signup(&self, form: &SignupForm) -> Result<SignupOutcome> {
        let errors = form.validate();
        if !errors.is_empty() {
            return Ok(SignupOutcome::Rejected(errors));
        }
        sleep(self.signup_delay).await;
        let profile = UserProfile {
            name: format!("{} {}", form.first_name.trim(), form.last_name.trim()),
            email: form.email.clone(),
            phone: Some(form.phone.clone()),
            city: (!form.city.trim().is_empty()).then(|| form.city.clone()),
            logged_in: true,
        };
        self.save(&profile)?;
        info!(email = %profile.email, "account created");
        Ok(SignupOutcome::Registered(profile))
    }

    pub fn logout(&self) -> Result<()> {
        self.store.remove(keys::USER)?;
        info!("signed out");
        Ok(())
    }

    fn save(&self, profile: &UserProfile) -> Result<()> {
        self.store
            .set(keys::USER, &serde_json::to_string(profile)?)
    }
}
