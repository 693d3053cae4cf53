//! The contact form a single visitor is filling out.
//!
//! Every visitor owns one [`ContactFormController`]. It holds the four
//! controlled fields and the [`SubmissionStatus`] and drives the submit cycle:
//!
//! ```text
//! Idle ──submit──▶ Submitting ──ok──▶ Succeeded ──banner_duration──▶ Idle
//!                       │
//!                       └─────err──▶ Failed ─────banner_duration──▶ Idle
//! ```

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use landing_core_contact_contracts::{
    ContactFormSubmitError, ContactSendMessageError, ContactService,
};
use landing_models::{
    contact::{ContactField, ContactForm, ContactMessage},
    submission::{ContactFormSnapshot, SendFailure, SubmissionStatus},
};
use tokio::{
    sync::watch,
    task::{AbortHandle, JoinError},
};
use tracing::{error, info};

pub const DEFAULT_BANNER_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
pub struct ContactFormConfig {
    /// How long the success or error banner stays visible.
    pub banner_duration: Duration,
}

impl Default for ContactFormConfig {
    fn default() -> Self {
        Self {
            banner_duration: DEFAULT_BANNER_DURATION,
        }
    }
}

#[derive(Debug)]
pub struct ContactFormController<Contact> {
    contact: Contact,
    config: ContactFormConfig,
    state: Arc<watch::Sender<ContactFormSnapshot>>,
    banner_reset: Mutex<Option<AbortHandle>>,
}

impl<Contact> ContactFormController<Contact>
where
    Contact: ContactService,
{
    pub fn new(contact: Contact, config: ContactFormConfig) -> Self {
        let (state, _) = watch::channel(ContactFormSnapshot::default());
        Self {
            contact,
            config,
            state: state.into(),
            banner_reset: Mutex::new(None),
        }
    }

    pub fn snapshot(&self) -> ContactFormSnapshot {
        self.state.borrow().clone()
    }

    pub fn fields(&self) -> ContactForm {
        self.state.borrow().fields.clone()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.state.borrow().status
    }

    /// Receives every change of fields or status.
    pub fn subscribe(&self) -> watch::Receiver<ContactFormSnapshot> {
        self.state.subscribe()
    }

    /// Replaces the value of one field with the latest input.
    pub fn update_field(&self, field: ContactField, value: String) -> ContactFormSnapshot {
        self.state
            .send_modify(|snapshot| snapshot.fields.set(field, value));
        self.snapshot()
    }

    /// Replaces all four fields at once, as sent by a plain html form post.
    pub fn update_fields(&self, fields: ContactForm) -> ContactFormSnapshot {
        self.state.send_modify(|snapshot| snapshot.fields = fields);
        self.snapshot()
    }

    /// Sends the current fields and returns the status the form settled in.
    ///
    /// Nothing is sent while another submission is in flight or if a field is
    /// invalid. Once started, the send runs to completion even if the returned
    /// future is dropped.
    pub async fn submit(self: &Arc<Self>) -> Result<SubmissionStatus, ContactFormSubmitError> {
        let message = self.begin_submit()?;

        let this = Arc::clone(self);
        let settle = tokio::spawn(async move { this.settle(message).await });
        Ok(self.finish_submit(settle.await))
    }

    /// A send that never settled (its task panicked or was cancelled on
    /// shutdown) counts as unavailable, so the form does not stay stuck in
    /// `Submitting`. Panics are propagated afterwards.
    fn finish_submit(&self, settled: Result<SubmissionStatus, JoinError>) -> SubmissionStatus {
        let err = match settled {
            Ok(status) => return status,
            Err(err) => err,
        };

        let status = SubmissionStatus::Failed(SendFailure::Unavailable);
        self.state.send_if_modified(|snapshot| {
            let stuck = snapshot.status.is_submitting();
            if stuck {
                snapshot.status = status;
            }
            stuck
        });
        self.schedule_banner_reset();

        match err.try_into_panic() {
            Ok(payload) => std::panic::resume_unwind(payload),
            Err(err) => {
                error!("Email send did not finish: {err}");
                status
            }
        }
    }

    fn begin_submit(&self) -> Result<ContactMessage, ContactFormSubmitError> {
        let mut outcome = Err(ContactFormSubmitError::AlreadySubmitting);
        self.state.send_if_modified(|snapshot| {
            if snapshot.status.is_submitting() {
                return false;
            }
            match snapshot.fields.validate() {
                Ok(message) => {
                    snapshot.status = SubmissionStatus::Submitting;
                    outcome = Ok(message);
                    true
                }
                Err(err) => {
                    outcome = Err(err.into());
                    false
                }
            }
        });
        let message = outcome?;

        // a banner from the previous submission must not expire during this one
        self.cancel_banner_reset();

        Ok(message)
    }

    async fn settle(&self, message: ContactMessage) -> SubmissionStatus {
        let status = match self.contact.send_message(message).await {
            Ok(()) => {
                info!("contact message sent");
                SubmissionStatus::Succeeded
            }
            Err(err) => {
                error!("Email failed to send: {err}");
                SubmissionStatus::Failed(match err {
                    ContactSendMessageError::Send => SendFailure::Rejected,
                    ContactSendMessageError::Other(_) => SendFailure::Unavailable,
                })
            }
        };

        self.state.send_modify(|snapshot| {
            if status.submit_success() {
                snapshot.fields.clear();
            }
            snapshot.status = status;
        });
        self.schedule_banner_reset();

        status
    }

    fn schedule_banner_reset(&self) {
        let state = Arc::clone(&self.state);
        let delay = self.config.banner_duration;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            state.send_if_modified(|snapshot| {
                let shown = snapshot.status.has_banner();
                if shown {
                    snapshot.status = SubmissionStatus::Idle;
                }
                shown
            });
        });

        if let Some(previous) = self.banner_reset().replace(task.abort_handle()) {
            previous.abort();
        }
    }
}

impl<Contact> ContactFormController<Contact> {
    fn banner_reset(&self) -> std::sync::MutexGuard<'_, Option<AbortHandle>> {
        self.banner_reset
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel_banner_reset(&self) {
        if let Some(task) = self.banner_reset().take() {
            task.abort();
        }
    }
}

impl<Contact> Drop for ContactFormController<Contact> {
    fn drop(&mut self) {
        self.cancel_banner_reset();
    }
}
