//! Email job queue on Redis.
//!
//! Jobs are JSON documents pushed onto a Redis list; `worker::MailWorker` pops
//! them with a blocking read. A failed job waits out its exponential backoff in
//! a Redis sorted set scored by due time, and the worker moves due jobs back
//! onto the list, so pending retries survive a restart. Jobs are dropped once
//! their attempts are exhausted.

pub mod worker;

use std::time::Duration;

use chrono::{DateTime, Utc};
use redis::aio::MultiplexedConnection;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::lead::LeadRow;

pub const QUEUE_NAME: &str = "email-campaigns";
pub const WELCOME_JOB: &str = "send-welcome-email";
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_MS: u64 = 1000;
/// Upper bound on retries moved back to the wait list per promotion pass.
const PROMOTE_BATCH: isize = 100;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Job encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailJob {
    pub id: Uuid,
    pub name: String,
    pub attempts_made: u32,
    pub max_attempts: u32,
    pub enqueued_at: DateTime<Utc>,
    pub lead: LeadRow,
}

impl EmailJob {
    pub fn welcome(lead: LeadRow) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: WELCOME_JOB.to_string(),
            attempts_made: 0,
            max_attempts: MAX_ATTEMPTS,
            enqueued_at: Utc::now(),
            lead,
        }
    }

    /// The job to requeue after a failed attempt, or `None` when attempts are exhausted.
    pub fn next_attempt(&self) -> Option<Self> {
        let attempts_made = self.attempts_made + 1;
        (attempts_made < self.max_attempts).then(|| Self {
            attempts_made,
            ..self.clone()
        })
    }

    /// Wait before retry number `attempts_made`: 1s, 2s, 4s, ...
    pub fn backoff(&self) -> Duration {
        let exponent = self.attempts_made.saturating_sub(1).min(16);
        Duration::from_millis(BACKOFF_BASE_MS << exponent)
    }
}

fn wait_key() -> String {
    format!("{QUEUE_NAME}:wait")
}

fn delayed_key() -> String {
    format!("{QUEUE_NAME}:delayed")
}

/// Sorted-set score for a retry: the due time in Unix milliseconds.
fn due_score(now: DateTime<Utc>, delay: Duration) -> i64 {
    now.timestamp_millis()
        .saturating_add(i64::try_from(delay.as_millis()).unwrap_or(i64::MAX))
}

/// Producer/consumer handle for the email queue. Cheap to clone.
#[derive(Clone)]
pub struct EmailQueue {
    client: redis::Client,
    connection: std::sync::Arc<OnceCell<MultiplexedConnection>>,
}

impl EmailQueue {
    pub fn new(client: redis::Client) -> Self {
        Self {
            client,
            connection: std::sync::Arc::new(OnceCell::new()),
        }
    }

    async fn shared_connection(&self) -> Result<MultiplexedConnection, QueueError> {
        let conn = self
            .connection
            .get_or_try_init(|| self.client.get_multiplexed_async_connection())
            .await?;
        Ok(conn.clone())
    }

    /// Queues a welcome email for a freshly captured lead.
    pub async fn add_email_job(&self, lead: LeadRow) -> Result<Uuid, QueueError> {
        let job = EmailJob::welcome(lead);
        self.push(&job).await?;
        info!("Queued {} job {} for lead {}", job.name, job.id, job.lead.id);
        Ok(job.id)
    }

    pub async fn push(&self, job: &EmailJob) -> Result<(), QueueError> {
        let payload = serde_json::to_string(job)?;
        let mut conn = self.shared_connection().await?;
        redis::cmd("LPUSH")
            .arg(wait_key())
            .arg(payload)
            .query_async::<_, ()>(&mut conn)
            .await?;
        debug!("Pushed job {} (attempt {})", job.id, job.attempts_made + 1);
        Ok(())
    }

    /// Parks a failed job until `delay` has passed. The worker requeues it with
    /// [`EmailQueue::promote_due`].
    pub async fn schedule_retry(&self, job: &EmailJob, delay: Duration) -> Result<(), QueueError> {
        let payload = serde_json::to_string(job)?;
        let mut conn = self.shared_connection().await?;
        redis::cmd("ZADD")
            .arg(delayed_key())
            .arg(due_score(Utc::now(), delay))
            .arg(payload)
            .query_async::<_, ()>(&mut conn)
            .await?;
        debug!("Scheduled job {} retry in {}ms", job.id, delay.as_millis());
        Ok(())
    }

    /// Moves retries whose due time has passed onto the wait list. A retry is
    /// pushed only by the caller whose `ZREM` removed it, so concurrent workers
    /// never requeue the same job twice. Returns how many were moved.
    pub async fn promote_due(conn: &mut MultiplexedConnection) -> Result<usize, QueueError> {
        let due: Vec<String> = redis::cmd("ZRANGEBYSCORE")
            .arg(delayed_key())
            .arg("-inf")
            .arg(due_score(Utc::now(), Duration::ZERO))
            .arg("LIMIT")
            .arg(0)
            .arg(PROMOTE_BATCH)
            .query_async(conn)
            .await?;

        let mut promoted = 0;
        for payload in due {
            let removed: i64 = redis::cmd("ZREM")
                .arg(delayed_key())
                .arg(&payload)
                .query_async(conn)
                .await?;
            if removed == 0 {
                continue;
            }
            redis::cmd("LPUSH")
                .arg(wait_key())
                .arg(&payload)
                .query_async::<_, ()>(conn)
                .await?;
            promoted += 1;
        }
        Ok(promoted)
    }

    /// Opens a dedicated connection for blocking reads.
    pub async fn consumer(&self) -> Result<MultiplexedConnection, QueueError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    /// Waits up to `timeout` for the next job. `None` on timeout.
    pub async fn pop(
        conn: &mut MultiplexedConnection,
        timeout: Duration,
    ) -> Result<Option<EmailJob>, QueueError> {
        let popped: Option<(String, String)> = redis::cmd("BRPOP")
            .arg(wait_key())
            .arg(timeout.as_secs().max(1))
            .query_async(conn)
            .await?;

        match popped {
            Some((_, payload)) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }
}
