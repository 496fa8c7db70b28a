use crate::entities::*;
use sea_orm::*;

pub mod api;

pub use crate::entities::task::TaskStatus;

/// A validated task payload, ready to be written to the store. Produced by
/// the request validation in [`api`]; the service never sees raw input.
#[derive(Debug, PartialEq, Clone)]
pub struct TaskPayload {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date_time: Option<chrono::NaiveDateTime>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Task {
    id: i64,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    due_date_time: Option<chrono::NaiveDateTime>,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
}

impl Task {
    /// Returns the ID of the task.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the title of the task.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description of the task, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the status of the task.
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the due date of the task, if any.
    pub fn due_date_time(&self) -> Option<chrono::NaiveDateTime> {
        self.due_date_time
    }

    /// Returns when the task was created.
    pub fn created_at(&self) -> chrono::NaiveDateTime {
        self.created_at
    }

    /// Returns when the task was last updated.
    pub fn updated_at(&self) -> chrono::NaiveDateTime {
        self.updated_at
    }
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Task {
            id: model.id,
            title: model.title,
            description: model.description,
            status: model.status,
            due_date_time: model.due_date_time,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// Represents a task not found error.
    #[error("Task not found with id: {0}")]
    TaskNotFound(i64),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService {
        TaskService { db }
    }

    /// Creates a new task in the database.
    ///
    /// The store assigns the ID and both timestamps at the moment of the
    /// insert; `created_at` and `updated_at` start out equal.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, payload: TaskPayload) -> Result<Task, TaskServiceError> {
        let now = chrono::Utc::now().naive_utc();
        let active_model = task::ActiveModel {
            title: ActiveValue::Set(payload.title),
            description: ActiveValue::Set(payload.description),
            status: ActiveValue::Set(payload.status),
            due_date_time: ActiveValue::Set(payload.due_date_time),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        tracing::info!("Task created successfully with id {}", created_model.id);
        Ok(Task::from(created_model))
    }

    /// Retrieves a task by its ID.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: i64) -> Result<Task, TaskServiceError> {
        let task_model = task::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        Ok(Task::from(task_model))
    }

    /// Retrieves all tasks from the database, ordered by creation time
    /// ascending with ID as the tiebreak.
    ///
    /// # Returns
    ///
    /// A `Result` containing a vector of `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        let tasks = task::Entity::find()
            .order_by_asc(task::Column::CreatedAt)
            .order_by_asc(task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    /// Updates only the status of a task, refreshing `updated_at`.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn update_task_status(
        &self,
        id: i64,
        status: TaskStatus,
    ) -> Result<Task, TaskServiceError> {
        let task_to_update = task::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;

        let mut active_model: task::ActiveModel = task_to_update.into();
        active_model.status = ActiveValue::Set(status);
        active_model.updated_at = ActiveValue::Set(chrono::Utc::now().naive_utc());
        let updated_model = active_model.update(self.db).await?;
        tracing::info!("Task {} status updated to: {}", id, status);

        Ok(Task::from(updated_model))
    }

    /// Overwrites the title, description, status and due date of a task,
    /// refreshing `updated_at`. `created_at` is never touched.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(
        &self,
        id: i64,
        payload: TaskPayload,
    ) -> Result<Task, TaskServiceError> {
        let task_to_update = task::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;

        let mut active_model: task::ActiveModel = task_to_update.into();
        active_model.title = ActiveValue::Set(payload.title);
        active_model.description = ActiveValue::Set(payload.description);
        active_model.status = ActiveValue::Set(payload.status);
        active_model.due_date_time = ActiveValue::Set(payload.due_date_time);
        active_model.updated_at = ActiveValue::Set(chrono::Utc::now().naive_utc());
        let updated_model = active_model.update(self.db).await?;
        tracing::info!("Task {} updated", id);

        Ok(Task::from(updated_model))
    }

    /// Deletes a task by its ID. Hard delete, no tombstone.
    ///
    /// # Returns
    ///
    /// A `Result` containing the deleted `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task_by_id(&self, id: i64) -> Result<Task, TaskServiceError> {
        let task_to_delete = task::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;

        let task_copy = Task::from(task_to_delete);
        task::Entity::delete_by_id(id).exec(self.db).await?;
        tracing::info!("Task {} deleted", id);
        Ok(task_copy)
    }
}
