//! Background consumer for the email queue.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::email::{personalize, BrevoClient, EmailError, LeadRecipient, PersonalizedEmail};
use crate::models::lead::LeadRow;
use crate::queue::{EmailJob, EmailQueue, QUEUE_NAME};

/// Also the cadence at which due retries are promoted.
const POLL_TIMEOUT: Duration = Duration::from_secs(1);
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

const WELCOME_SUBJECT: &str = "Welcome, {{company}}";
const WELCOME_BODY: &str = "Hello,\n\
    Thanks for reaching out on behalf of {{company}}.\n\
    We will follow up shortly with ideas tailored to your team.";

pub struct MailWorker {
    queue: EmailQueue,
    mailer: BrevoClient,
}

impl MailWorker {
    pub fn new(queue: EmailQueue, mailer: BrevoClient) -> Self {
        Self { queue, mailer }
    }

    /// Consumes jobs forever. Connection failures are logged and retried.
    pub async fn run(self) {
        info!("Mail worker started on queue '{QUEUE_NAME}'");

        loop {
            let mut conn = match self.queue.consumer().await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("Mail worker cannot reach Redis: {e}");
                    tokio::time::sleep(RECONNECT_DELAY).await;
                    continue;
                }
            };

            loop {
                match EmailQueue::promote_due(&mut conn).await {
                    Ok(0) => {}
                    Ok(n) => info!("Requeued {n} due retry job(s)"),
                    Err(e) => {
                        error!("Mail worker lost its queue connection: {e}");
                        tokio::time::sleep(RECONNECT_DELAY).await;
                        break;
                    }
                }

                match EmailQueue::pop(&mut conn, POLL_TIMEOUT).await {
                    Ok(Some(job)) => self.process(job).await,
                    Ok(None) => {}
                    Err(e) => {
                        error!("Mail worker lost its queue connection: {e}");
                        tokio::time::sleep(RECONNECT_DELAY).await;
                        break;
                    }
                }
            }
        }
    }

    async fn process(&self, job: EmailJob) {
        info!(
            "Processing {} job {} for lead {} (attempt {}/{})",
            job.name,
            job.id,
            job.lead.id,
            job.attempts_made + 1,
            job.max_attempts
        );

        let Some(email) = welcome_email(&job.lead) else {
            warn!("Job {} skipped: lead {} has no email", job.id, job.lead.id);
            return;
        };

        match self.mailer.send(&email).await {
            Ok(()) => info!("Email sent to {}", email.to_email),
            Err(e) => self.retry_or_drop(job, e).await,
        }
    }

    async fn retry_or_drop(&self, job: EmailJob, e: EmailError) {
        let Some(next) = job.next_attempt() else {
            error!("Job {} failed after {} attempts: {e}", job.id, job.max_attempts);
            return;
        };

        let delay = next.backoff();
        warn!("Job {} failed: {e}; retrying in {}ms", job.id, delay.as_millis());

        if let Err(e) = self.queue.schedule_retry(&next, delay).await {
            error!("Failed to schedule retry for job {}: {e}", next.id);
        }
    }
}

/// The welcome message for a captured lead. `None` when the lead has no email.
pub fn welcome_email(lead: &LeadRow) -> Option<PersonalizedEmail> {
    let recipient = LeadRecipient {
        email: lead.email.clone(),
        business_name: Some(lead.profile_name.clone()),
        first_name: None,
        last_name: None,
    };
    personalize(WELCOME_SUBJECT, WELCOME_BODY, &recipient)
}
