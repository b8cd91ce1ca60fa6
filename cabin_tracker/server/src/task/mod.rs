use crate::entities::sea_orm_active_enums::{TaskPriority, TaskStatus};
use crate::entities::*;
use crate::validation::{ValidationErrors, Validator};
use chrono::{DateTime, Utc};
use sea_orm::*;
use uuid::Uuid;

pub mod api;
pub mod web;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Task {
    id: Uuid,
    cabin_id: Uuid,
    description: String,
    priority: TaskPriority,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Returns the ID of the task.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the ID of the cabin the task belongs to.
    pub fn cabin_id(&self) -> Uuid {
        self.cabin_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> TaskPriority {
        self.priority
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the task was last changed.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl From<maintenance_tasks::Model> for Task {
    fn from(model: maintenance_tasks::Model) -> Self {
        Self {
            id: model.id,
            cabin_id: model.cabin_id,
            description: model.description,
            priority: model.priority,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// A validated request to create a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    cabin_id: Uuid,
    description: String,
    priority: TaskPriority,
    status: TaskStatus,
}

impl NewTask {
    pub fn new(
        cabin_id: Uuid,
        description: impl Into<String>,
        priority: TaskPriority,
        status: TaskStatus,
    ) -> Result<Self, ValidationErrors> {
        let mut validator = Validator::new();
        let description = validator.required_text("description", Some(description.into()));
        validator.finish()?;
        Ok(Self {
            cabin_id,
            description: description.unwrap_or_default(),
            priority,
            status,
        })
    }

    /// Validates raw input. Missing priority and status fall back to Medium and Pending.
    pub fn parse(
        cabin_id: Option<String>,
        description: Option<String>,
        priority: Option<String>,
        status: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut validator = Validator::new();
        let cabin_id = validator.required_uuid("cabinId", cabin_id);
        let description = validator.required_text("description", description);
        let priority = validator.priority("priority", priority);
        let status = validator.status("status", status);
        validator.finish()?;

        Ok(Self {
            cabin_id: cabin_id.unwrap_or_default(),
            description: description.unwrap_or_default(),
            priority: priority.flatten().unwrap_or_default(),
            status: status.flatten().unwrap_or_default(),
        })
    }

    pub fn cabin_id(&self) -> Uuid {
        self.cabin_id
    }
}

/// A validated partial update. Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    description: Option<String>,
    priority: Option<TaskPriority>,
    status: Option<TaskStatus>,
}

impl TaskUpdate {
    pub fn parse(
        description: Option<String>,
        priority: Option<String>,
        status: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut validator = Validator::new();
        let description = validator.optional_text("description", description);
        let priority = validator.priority("priority", priority);
        let status = validator.status("status", status);
        validator.finish()?;

        Ok(Self {
            description: description.flatten(),
            priority: priority.flatten(),
            status: status.flatten(),
        })
    }

    pub fn with_description(self, description: impl Into<String>) -> Result<Self, ValidationErrors> {
        let mut validator = Validator::new();
        let description = validator.optional_text("description", Some(description.into()));
        validator.finish()?;
        Ok(Self {
            description: description.flatten(),
            ..self
        })
    }

    pub fn with_priority(self, priority: TaskPriority) -> Self {
        Self {
            priority: Some(priority),
            ..self
        }
    }

    pub fn with_status(self, status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..self
        }
    }
}

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// Represents a task not found error.
    #[error("Task with ID {0} not found")]
    TaskNotFound(Uuid),
    /// A cabin looked up by the caller does not exist.
    #[error("Cabin with ID {0} not found")]
    CabinNotFound(Uuid),
    /// A new task references a cabin that does not exist.
    #[error("Cabin with ID {0} does not exist")]
    CabinDoesNotExist(Uuid),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

fn update_error(id: Uuid, err: DbErr) -> TaskServiceError {
    match err {
        DbErr::RecordNotUpdated => TaskServiceError::TaskNotFound(id),
        other => TaskServiceError::Database(other),
    }
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService<'_> {
        TaskService { db }
    }

    /// Creates a new maintenance task for an existing cabin.
    ///
    /// # Arguments
    ///
    /// * `new_task` - The validated task to store.
    ///
    /// # Returns
    ///
    /// A `Result` containing the stored `Task`, or `CabinDoesNotExist` when the
    /// referenced cabin is missing. Nothing is persisted in that case.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, new_task: NewTask) -> Result<Task, TaskServiceError> {
        let cabin_id = new_task.cabin_id;
        if !self.cabin_exists(cabin_id).await? {
            tracing::warn!("Rejected task for missing cabin {}", cabin_id);
            return Err(TaskServiceError::CabinDoesNotExist(cabin_id));
        }

        let now = Utc::now();
        let active_model = maintenance_tasks::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            cabin_id: ActiveValue::Set(cabin_id),
            description: ActiveValue::Set(new_task.description),
            priority: ActiveValue::Set(new_task.priority),
            status: ActiveValue::Set(new_task.status),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        // The cabin can disappear between the check and the insert; the foreign key catches it.
        let created_model = active_model
            .insert(self.db)
            .await
            .map_err(|err| match err.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    TaskServiceError::CabinDoesNotExist(cabin_id)
                }
                _ => TaskServiceError::Database(err),
            })?;
        Ok(Task::from(created_model))
    }

    /// Retrieves every task, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        let tasks = maintenance_tasks::Entity::find()
            .order_by_desc(maintenance_tasks::Column::CreatedAt)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    /// Retrieves the tasks of one cabin, newest first.
    ///
    /// # Arguments
    ///
    /// * `cabin_id` - The ID of the cabin.
    ///
    /// # Returns
    ///
    /// A `Result` containing the tasks, or `CabinNotFound` if the cabin does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn get_tasks_for_cabin(&self, cabin_id: Uuid) -> Result<Vec<Task>, TaskServiceError> {
        if !self.cabin_exists(cabin_id).await? {
            return Err(TaskServiceError::CabinNotFound(cabin_id));
        }

        let tasks = maintenance_tasks::Entity::find()
            .filter(maintenance_tasks::Column::CabinId.eq(cabin_id))
            .order_by_desc(maintenance_tasks::Column::CreatedAt)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    /// Retrieves a task by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: Uuid) -> Result<Task, TaskServiceError> {
        let task_model = maintenance_tasks::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        Ok(Task::from(task_model))
    }

    /// Applies a partial update to a task and refreshes its `updated_at`.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to update.
    /// * `update` - The fields to change; absent fields are left untouched.
    ///
    /// # Returns
    ///
    /// A `Result` containing the full updated `Task`, or `TaskNotFound`.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(
        &self,
        id: Uuid,
        update: TaskUpdate,
    ) -> Result<Task, TaskServiceError> {
        let task_to_update = maintenance_tasks::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;

        let mut active_model: maintenance_tasks::ActiveModel = task_to_update.into();
        if let Some(description) = update.description {
            active_model.description = ActiveValue::Set(description);
        }
        if let Some(priority) = update.priority {
            active_model.priority = ActiveValue::Set(priority);
        }
        if let Some(status) = update.status {
            active_model.status = ActiveValue::Set(status);
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());
        // The row can be deleted between the lookup and the update.
        let updated_model = active_model
            .update(self.db)
            .await
            .map_err(|err| update_error(id, err))?;

        Ok(Task::from(updated_model))
    }

    /// Permanently deletes a task by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task_by_id(&self, id: Uuid) -> Result<(), TaskServiceError> {
        let result = maintenance_tasks::Entity::delete_by_id(id)
            .exec(self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(TaskServiceError::TaskNotFound(id));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn cabin_exists(&self, cabin_id: Uuid) -> Result<bool, TaskServiceError> {
        let cabin = cabins::Entity::find_by_id(cabin_id).one(self.db).await?;
        Ok(cabin.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldError;

    #[test]
    fn can_default_priority_and_status_when_absent() {
        let cabin_id = Uuid::new_v4();
        let new_task = NewTask::parse(
            Some(cabin_id.to_string()),
            Some("Fix the porch light".to_string()),
            None,
            None,
        )
        .unwrap();

        assert_eq!(
            new_task,
            NewTask::new(
                cabin_id,
                "Fix the porch light",
                TaskPriority::Medium,
                TaskStatus::Pending
            )
            .unwrap()
        );
    }

    #[test]
    fn can_report_every_invalid_task_field() {
        let errors = NewTask::parse(
            Some("not-a-uuid".to_string()),
            Some("".to_string()),
            Some("Critical".to_string()),
            Some("Done".to_string()),
        )
        .unwrap_err();

        let fields: Vec<&str> = errors
            .field_errors()
            .iter()
            .map(|error| error.field.as_str())
            .collect();
        assert_eq!(fields, vec!["cabinId", "description", "priority", "status"]);
    }

    #[test]
    fn can_treat_vanished_row_during_update_as_missing_task() {
        let id = Uuid::new_v4();

        assert!(matches!(
            update_error(id, DbErr::RecordNotUpdated),
            TaskServiceError::TaskNotFound(missing) if missing == id
        ));
        assert!(matches!(
            update_error(id, DbErr::Custom("connection reset".to_string())),
            TaskServiceError::Database(_)
        ));
    }

    #[test]
    fn can_leave_absent_update_fields_unset() {
        let update = TaskUpdate::parse(None, None, Some("Complete".to_string())).unwrap();

        assert_eq!(update, TaskUpdate::default().with_status(TaskStatus::Complete));
    }

    #[test]
    fn can_reject_blank_description_in_update() {
        let errors = TaskUpdate::default().with_description("  ").unwrap_err();

        assert_eq!(
            errors.field_errors(),
            &[FieldError::new("description", "description must not be empty")]
        );
    }
}
