//! Prefilling the form with a random demo identity.
//!
//! This is a convenience only: a failure to reach the demo API is logged and otherwise
//! ignored, it never prevents the form from being filled in and submitted.

use std::time::Duration;

use rand::seq::SliceRandom as _;
use rand::Rng;
use serde::Deserialize;

use crate::error::ContextError;
use crate::record::{Field, RawSubmission};

/// The public demo API listing sample users.
pub const DEFAULT_SAMPLE_IDENTITY_URL: &str = "https://dummyjson.com/users";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Response of the demo users endpoint, only the fields we need.
#[derive(Debug, Deserialize)]
pub struct SampleUsersResponse {
    #[serde(default)]
    pub users: Vec<SampleUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A name and an email address to prefill the form with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleIdentity {
    pub name: String,
    pub email: String,
}

impl SampleIdentity {
    /// Fills the name and email of the submission with this identity, leaving the values the
    /// user already entered untouched.
    pub fn prefill(self, submission: &mut RawSubmission) {
        submission.fill_if_missing(Field::Name, self.name);
        submission.fill_if_missing(Field::Email, self.email);
    }
}

/// Picks one of the listed users at random, `None` when the list is empty.
pub fn pick_sample_identity<R: Rng + ?Sized>(
    response: &SampleUsersResponse,
    rng: &mut R,
) -> Option<SampleIdentity> {
    response.users.choose(rng).map(|user| SampleIdentity {
        name: format!("{} {}", user.first_name, user.last_name),
        email: user.email.clone(),
    })
}

/// Fetches the sample users and picks one of them, reporting every failure.
pub fn try_fetch_sample_identity(url: &str) -> Result<Option<SampleIdentity>, ContextError> {
    let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
    let response = agent.get(url).call().map_err(|error| {
        ContextError::with_error(format!("Unable to fetch the sample users from {}", url), &error)
    })?;
    let sample_users: SampleUsersResponse = response.into_json().map_err(|error| {
        ContextError::with_error(format!("Unable to parse the sample users from {}", url), &error)
    })?;

    Ok(pick_sample_identity(&sample_users, &mut rand::thread_rng()))
}

/// Fetches a random sample identity. Failures are logged and swallowed.
pub fn fetch_sample_identity(url: &str) -> Option<SampleIdentity> {
    match try_fetch_sample_identity(url) {
        Ok(Some(sample_identity)) => {
            log::info!(
                "Picked the sample user {} ({})",
                sample_identity.name,
                sample_identity.email
            );
            Some(sample_identity)
        }
        Ok(None) => {
            log::warn!("The sample users list from {} is empty", url);
            None
        }
        Err(error) => {
            log::warn!("{}", error);
            None
        }
    }
}
