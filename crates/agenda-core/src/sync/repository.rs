//! Local store with best-effort cloud mirroring.
//!
//! Every write lands in SQLite first. When it changed something and a
//! device identity is known, the same change is pushed to the server on a
//! spawned task. Remote failures are logged, never retried.

use chrono::{NaiveDate, NaiveDateTime};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use super::push::{PushHandle, SkipReason, WriteResult};
use crate::cloud::{identity, CloudClient};
use crate::error::{CloudError, CoreError, DatabaseError, ValidationError};
use crate::model::{Event, Task};
use crate::storage::{Config, Database};

pub struct Repository {
    db: Database,
    client: Option<CloudClient>,
    delete_pacing: Duration,
}

impl Repository {
    pub fn new(db: Database, client: Option<CloudClient>, delete_pacing: Duration) -> Self {
        Self {
            db,
            client,
            delete_pacing,
        }
    }

    /// Build a repository from loaded configuration.
    pub fn from_config(db: Database, config: &Config) -> Result<Self, CoreError> {
        let client = CloudClient::from_config(&config.cloud)?;
        Ok(Self::new(
            db,
            client,
            Duration::from_millis(config.sync.delete_pacing_ms),
        ))
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> Option<&CloudClient> {
        self.client.as_ref()
    }

    fn require_client(&self) -> Result<&CloudClient, CloudError> {
        self.client.as_ref().ok_or(CloudError::Disabled)
    }

    /// Resolve the client and device id a push needs, or the reason to skip.
    fn push_target(&self, what: &str) -> Result<(CloudClient, String), SkipReason> {
        let Some(client) = self.client.clone() else {
            return Err(SkipReason::CloudDisabled);
        };
        match identity::device_id(&self.db) {
            Ok(device) => Ok((client, device)),
            Err(e) => {
                warn!(what, error = %e, "skipping cloud push");
                Err(SkipReason::NoIdentity)
            }
        }
    }

    fn spawn_push<F, Fut>(&self, what: &'static str, id: &str, op: F) -> PushHandle
    where
        F: FnOnce(CloudClient, String) -> Fut,
        Fut: Future<Output = Result<(), CloudError>> + Send + 'static,
    {
        let (client, device) = match self.push_target(what) {
            Ok(target) => target,
            Err(reason) => return PushHandle::Skipped(reason),
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(what, id, "no async runtime; skipping cloud push");
            return PushHandle::Skipped(SkipReason::NoRuntime);
        };

        let id = id.to_string();
        let fut = op(client, device);
        PushHandle::Pending(runtime.spawn(async move {
            let result = fut.await;
            if let Err(e) = &result {
                warn!(what, id = %id, error = %e, "cloud push failed");
            }
            result
        }))
    }

    // === Tasks ===

    /// Store a task and push it to the cloud.
    pub fn add_task(&self, task: &Task) -> Result<WriteResult, CoreError> {
        self.db.insert_task(task)?;
        debug!(task_id = %task.id, "task stored");
        let pushed = task.clone();
        let push = self.spawn_push("create task", &task.id, move |client, device| async move {
            client.create_task(&device, &pushed).await
        });
        Ok(WriteResult { applied: true, push })
    }

    pub fn update_task(&self, task: &Task) -> Result<WriteResult, CoreError> {
        if !self.db.update_task(task)? {
            return Ok(WriteResult {
                applied: false,
                push: PushHandle::Skipped(SkipReason::NothingWritten),
            });
        }
        let pushed = task.clone();
        let push = self.spawn_push("update task", &task.id, move |client, device| async move {
            client.update_task(&device, &pushed).await
        });
        Ok(WriteResult { applied: true, push })
    }

    pub fn task(&self, id: &str) -> Result<Option<Task>, CoreError> {
        Ok(self.db.get_task(id)?)
    }

    pub fn tasks(&self) -> Result<Vec<Task>, CoreError> {
        Ok(self.db.list_tasks()?)
    }

    pub fn tasks_by_priority(&self) -> Result<Vec<Task>, CoreError> {
        Ok(self.db.list_tasks_by_priority()?)
    }

    pub fn delete_task(&self, id: &str) -> Result<WriteResult, CoreError> {
        if !self.db.delete_task(id)? {
            return Ok(WriteResult {
                applied: false,
                push: PushHandle::Skipped(SkipReason::NothingWritten),
            });
        }
        debug!(task_id = %id, "task deleted");
        let task_id = id.to_string();
        let push = self.spawn_push("delete task", id, move |client, device| async move {
            client.delete_task(&device, &task_id).await
        });
        Ok(WriteResult { applied: true, push })
    }

    /// Delete every task locally, then remotely one by one with a pause
    /// between calls. Returns the removed ids.
    pub fn delete_all_tasks(&self) -> Result<(Vec<String>, PushHandle), CoreError> {
        let ids = self.db.delete_all_tasks()?;
        debug!(count = ids.len(), "all tasks deleted");
        if ids.is_empty() {
            return Ok((ids, PushHandle::Skipped(SkipReason::NothingWritten)));
        }

        let pacing = self.delete_pacing;
        let pending = ids.clone();
        let push = self.spawn_push("delete all tasks", "*", move |client, device| async move {
            let mut last_error = None;
            for (i, id) in pending.iter().enumerate() {
                if i > 0 && !pacing.is_zero() {
                    tokio::time::sleep(pacing).await;
                }
                if let Err(e) = client.delete_task(&device, id).await {
                    warn!(task_id = %id, error = %e, "remote task delete failed");
                    last_error = Some(e);
                }
            }
            last_error.map_or(Ok(()), Err)
        });
        Ok((ids, push))
    }

    // === Events ===

    pub fn add_event(&self, event: &Event) -> Result<WriteResult, CoreError> {
        self.db.insert_event(event)?;
        debug!(event_id = %event.id, "event stored");
        let pushed = event.clone();
        let push = self.spawn_push("create event", &event.id, move |client, device| async move {
            client.create_event(&device, &pushed).await
        });
        Ok(WriteResult { applied: true, push })
    }

    /// Update an event locally and push the change.
    ///
    /// # Errors
    /// Unlike the other writes, a missing device id is returned as
    /// [`CloudError::MissingIdentity`]. The local update has already been
    /// applied by then.
    pub fn update_event(&self, event: &Event) -> Result<WriteResult, CoreError> {
        if !self.db.update_event(event)? {
            return Ok(WriteResult {
                applied: false,
                push: PushHandle::Skipped(SkipReason::NothingWritten),
            });
        }
        debug!(event_id = %event.id, "event updated");

        if self.client.is_some() {
            identity::device_id(&self.db)?;
        }
        let pushed = event.clone();
        let push = self.spawn_push("update event", &event.id, move |client, device| async move {
            client.update_event(&device, &pushed).await
        });
        Ok(WriteResult { applied: true, push })
    }

    pub fn delete_event(&self, id: &str) -> Result<WriteResult, CoreError> {
        if !self.db.delete_event(id)? {
            return Ok(WriteResult {
                applied: false,
                push: PushHandle::Skipped(SkipReason::NothingWritten),
            });
        }
        debug!(event_id = %id, "event deleted");
        let event_id = id.to_string();
        let push = self.spawn_push("delete event", id, move |client, device| async move {
            client.delete_event(&device, &event_id).await
        });
        Ok(WriteResult { applied: true, push })
    }

    pub fn event(&self, id: &str) -> Result<Option<Event>, CoreError> {
        Ok(self.db.get_event(id)?)
    }

    pub fn events(&self) -> Result<Vec<Event>, CoreError> {
        Ok(self.db.list_events()?)
    }

    pub fn events_on(&self, date: NaiveDate) -> Result<Vec<Event>, CoreError> {
        Ok(self.db.events_on(date)?)
    }

    /// Turn a stored task into a one-hour event starting at `now`.
    pub fn event_from_task(
        &self,
        task_id: &str,
        now: NaiveDateTime,
    ) -> Result<(Event, WriteResult), CoreError> {
        let task = self.require_task(task_id)?;
        let event = Event::from_task(&task, now);
        let write = self.add_event(&event)?;
        Ok((event, write))
    }

    /// Schedule a task on `date` from 09:00 to 10:00 and push it like [`Repository::add_event`].
    pub fn event_from_task_on(
        &self,
        task_id: &str,
        date: NaiveDate,
    ) -> Result<(Event, WriteResult), CoreError> {
        let task = self.require_task(task_id)?;
        let event = Event::from_task_on(&task, date);
        let write = self.add_event(&event)?;
        Ok((event, write))
    }

    fn require_task(&self, task_id: &str) -> Result<Task, CoreError> {
        self.db.get_task(task_id)?.ok_or_else(|| {
            ValidationError::NotFound {
                kind: "task",
                id: task_id.to_string(),
            }
            .into()
        })
    }

    // === Remote reads ===

    pub async fn remote_tasks(&self) -> Result<Vec<Task>, CoreError> {
        let client = self.require_client()?;
        let device = identity::device_id(&self.db)?;
        Ok(client.list_tasks(&device).await?)
    }

    pub async fn remote_events(&self) -> Result<Vec<Event>, CoreError> {
        let client = self.require_client()?;
        let device = identity::device_id(&self.db)?;
        Ok(client.list_events(&device).await?)
    }

    /// Publish an event and return its share code.
    pub async fn share_event(&self, event: &Event) -> Result<String, CoreError> {
        Ok(self.require_client()?.share_event(event).await?)
    }

    pub async fn fetch_shared_event(&self, code: &str) -> Result<Event, CoreError> {
        Ok(self.require_client()?.fetch_shared_event(code).await?)
    }

    /// Fetch a shared event and keep a local copy.
    ///
    /// An event already stored under the same id is overwritten.
    pub async fn import_shared_event(&self, code: &str) -> Result<(Event, WriteResult), CoreError> {
        let event = self.fetch_shared_event(code).await?;
        let write = match self.add_event(&event) {
            Ok(write) => write,
            Err(CoreError::Database(DatabaseError::DuplicateId(_))) => {
                self.db.update_event(&event)?;
                debug!(event_id = %event.id, "shared event replaced local copy");
                let pushed = event.clone();
                let push = self.spawn_push("update event", &event.id, move |client, device| async move {
                    client.update_event(&device, &pushed).await
                });
                WriteResult { applied: true, push }
            }
            Err(e) => return Err(e),
        };
        Ok((event, write))
    }
}
