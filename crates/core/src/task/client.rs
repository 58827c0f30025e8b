//! Task collection HTTP client
//!
//! Talks to the remote CRUD resource holding the task collection.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::model::{NewTask, Task, TaskPatch};
use crate::error::Error;
use crate::Result;

/// Remote operations on the task collection.
///
/// No retries; a single failed attempt surfaces immediately to the caller.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetch every task owned by `user_id`, in server order
    async fn fetch_all(&self, user_id: i64) -> Result<Vec<Task>>;

    /// Create a task; the returned record carries the assigned id
    async fn create(&self, new: &NewTask) -> Result<Task>;

    /// Patch title and/or completed on an existing task
    async fn update(&self, id: i64, patch: &TaskPatch) -> Result<Task>;

    /// Delete a task by id
    async fn delete(&self, id: i64) -> Result<()>;
}

/// reqwest-backed implementation of [`TaskApi`]
pub struct HttpTaskClient {
    client: Client,
    base_url: String,
}

impl HttpTaskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn todo_url(&self, id: i64) -> String {
        format!("{}/todos/{}", self.base_url, id)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(Error::Status { status, body })
        }
    }
}

#[async_trait]
impl TaskApi for HttpTaskClient {
    async fn fetch_all(&self, user_id: i64) -> Result<Vec<Task>> {
        debug!("GET {} userId={}", self.todos_url(), user_id);
        let resp = self
            .client
            .get(self.todos_url())
            .query(&[("userId", user_id)])
            .send()
            .await?;
        let tasks = Self::check(resp).await?.json::<Vec<Task>>().await?;
        Ok(tasks)
    }

    async fn create(&self, new: &NewTask) -> Result<Task> {
        debug!("POST {} title={:?}", self.todos_url(), new.title);
        let resp = self.client.post(self.todos_url()).json(new).send().await?;
        let task = Self::check(resp).await?.json::<Task>().await?;
        Ok(task)
    }

    async fn update(&self, id: i64, patch: &TaskPatch) -> Result<Task> {
        debug!("PATCH {}", self.todo_url(id));
        let resp = self
            .client
            .patch(self.todo_url(id))
            .json(patch)
            .send()
            .await?;
        let task = Self::check(resp).await?.json::<Task>().await?;
        Ok(task)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        debug!("DELETE {}", self.todo_url(id));
        let resp = self.client.delete(self.todo_url(id)).send().await?;
        Self::check(resp).await?;
        Ok(())
    }
}
