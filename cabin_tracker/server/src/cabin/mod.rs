use crate::entities::sea_orm_active_enums::{TaskPriority, TaskStatus};
use crate::entities::*;
use crate::task::Task;
use crate::validation::{ValidationErrors, Validator};
use chrono::{DateTime, Utc};
use sea_orm::*;
use std::collections::HashMap;
use uuid::Uuid;

pub mod api;
pub mod web;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Cabin {
    id: Uuid,
    name: String,
    location: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl Cabin {
    /// Returns the ID of the cabin.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the name of the cabin.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns where the cabin is.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl From<cabins::Model> for Cabin {
    fn from(model: cabins::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            location: model.location,
            description: model.description,
            created_at: model.created_at,
        }
    }
}

/// A validated request to register a cabin.
/// Column width of `cabins.name` and `cabins.location`.
pub const MAX_CABIN_TEXT_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCabin {
    name: String,
    location: String,
    description: Option<String>,
}

impl NewCabin {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        Self::parse(Some(name.into()), Some(location.into()), description)
    }

    /// Validates raw input; `name` and `location` must be present and not blank.
    pub fn parse(
        name: Option<String>,
        location: Option<String>,
        description: Option<String>,
    ) -> Result<Self, ValidationErrors> {
        let mut validator = Validator::new();
        let name = validator.required_text_max("name", name, MAX_CABIN_TEXT_LEN);
        let location = validator.required_text_max("location", location, MAX_CABIN_TEXT_LEN);
        validator.finish()?;

        Ok(Self {
            name: name.unwrap_or_default(),
            location: location.unwrap_or_default(),
            description,
        })
    }
}

/// Pending task counts of one cabin, bucketed by priority.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PendingCounts {
    high: u64,
    medium: u64,
    low: u64,
}

impl PendingCounts {
    pub fn new(high: u64, medium: u64, low: u64) -> Self {
        Self { high, medium, low }
    }

    pub fn high(&self) -> u64 {
        self.high
    }

    pub fn medium(&self) -> u64 {
        self.medium
    }

    pub fn low(&self) -> u64 {
        self.low
    }

    /// Returns the number of pending tasks across all priorities.
    pub fn total(&self) -> u64 {
        self.high + self.medium + self.low
    }

    fn add(&mut self, priority: TaskPriority, count: u64) {
        match priority {
            TaskPriority::High => self.high += count,
            TaskPriority::Medium => self.medium += count,
            TaskPriority::Low => self.low += count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CabinSummary {
    cabin: Cabin,
    pending: PendingCounts,
}

impl CabinSummary {
    pub fn cabin(&self) -> &Cabin {
        &self.cabin
    }

    pub fn pending(&self) -> PendingCounts {
        self.pending
    }
}

/// A cabin together with its tasks, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CabinDetails {
    cabin: Cabin,
    tasks: Vec<Task>,
}

impl CabinDetails {
    pub fn cabin(&self) -> &Cabin {
        &self.cabin
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_parts(self) -> (Cabin, Vec<Task>) {
        (self.cabin, self.tasks)
    }
}

/// One row of the grouped pending-task count query.
#[derive(Debug, FromQueryResult)]
struct PendingTaskCount {
    cabin_id: Uuid,
    priority: TaskPriority,
    pending_count: i64,
}

/// Pivots grouped `(cabin, priority, count)` rows into one `PendingCounts` per cabin.
fn pivot_pending_counts(
    rows: impl IntoIterator<Item = (Uuid, TaskPriority, i64)>,
) -> HashMap<Uuid, PendingCounts> {
    let mut counts: HashMap<Uuid, PendingCounts> = HashMap::new();
    for (cabin_id, priority, count) in rows {
        counts
            .entry(cabin_id)
            .or_default()
            .add(priority, u64::try_from(count).unwrap_or_default());
    }
    counts
}

/// Error type for CabinService operations.
#[derive(Debug, thiserror::Error)]
pub enum CabinServiceError {
    /// Represents a cabin not found error.
    #[error("Cabin with ID {0} not found")]
    CabinNotFound(Uuid),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub struct CabinService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl CabinService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> CabinService<'_> {
        CabinService { db }
    }

    /// Creates a new cabin in the database.
    ///
    /// # Arguments
    ///
    /// * `new_cabin` - The validated cabin to store.
    ///
    /// # Returns
    ///
    /// A `Result` containing the stored `Cabin` with its generated ID.
    #[tracing::instrument(skip(self))]
    pub async fn create_cabin(&self, new_cabin: NewCabin) -> Result<Cabin, CabinServiceError> {
        let active_model = cabins::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            name: ActiveValue::Set(new_cabin.name),
            location: ActiveValue::Set(new_cabin.location),
            description: ActiveValue::Set(new_cabin.description),
            created_at: ActiveValue::Set(Utc::now()),
        };
        let created_model = active_model.insert(self.db).await?;
        tracing::info!("Created cabin {}", created_model.id);
        Ok(Cabin::from(created_model))
    }

    /// Retrieves all cabins, most recently created first.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_cabins(&self) -> Result<Vec<Cabin>, CabinServiceError> {
        let cabins = cabins::Entity::find()
            .order_by_desc(cabins::Column::CreatedAt)
            .all(self.db)
            .await?
            .into_iter()
            .map(Cabin::from)
            .collect();
        Ok(cabins)
    }

    /// Retrieves a cabin by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_cabin_by_id(&self, id: Uuid) -> Result<Cabin, CabinServiceError> {
        let cabin_model = cabins::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(CabinServiceError::CabinNotFound(id))?;
        Ok(Cabin::from(cabin_model))
    }

    /// Retrieves a cabin together with all of its tasks.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the cabin.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `CabinDetails`, or `CabinNotFound`.
    #[tracing::instrument(skip(self))]
    pub async fn get_cabin_details(&self, id: Uuid) -> Result<CabinDetails, CabinServiceError> {
        let cabin_model = cabins::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(CabinServiceError::CabinNotFound(id))?;

        let tasks = cabin_model
            .find_related(maintenance_tasks::Entity)
            .order_by_desc(maintenance_tasks::Column::CreatedAt)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();

        Ok(CabinDetails {
            cabin: Cabin::from(cabin_model),
            tasks,
        })
    }

    /// Permanently deletes a cabin. Its tasks go with it through the cascading foreign key,
    /// inside the same statement.
    #[tracing::instrument(skip(self))]
    pub async fn delete_cabin_by_id(&self, id: Uuid) -> Result<(), CabinServiceError> {
        let result = cabins::Entity::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(CabinServiceError::CabinNotFound(id));
        }
        tracing::info!("Deleted cabin {} and its tasks", id);
        Ok(())
    }

    /// Summarises pending tasks per cabin, most recently created cabin first.
    ///
    /// Counts come from a single grouped query over pending tasks; cabins without
    /// pending tasks report zero in every bucket.
    #[tracing::instrument(skip(self))]
    pub async fn get_cabins_summary(&self) -> Result<Vec<CabinSummary>, CabinServiceError> {
        let cabins = self.get_all_cabins().await?;

        let rows = maintenance_tasks::Entity::find()
            .select_only()
            .column(maintenance_tasks::Column::CabinId)
            .column(maintenance_tasks::Column::Priority)
            .column_as(maintenance_tasks::Column::Id.count(), "pending_count")
            .filter(maintenance_tasks::Column::Status.eq(TaskStatus::Pending))
            .group_by(maintenance_tasks::Column::CabinId)
            .group_by(maintenance_tasks::Column::Priority)
            .into_model::<PendingTaskCount>()
            .all(self.db)
            .await?;

        let mut counts = pivot_pending_counts(
            rows.into_iter()
                .map(|row| (row.cabin_id, row.priority, row.pending_count)),
        );

        let summaries = cabins
            .into_iter()
            .map(|cabin| {
                let pending = counts.remove(&cabin.id()).unwrap_or_default();
                CabinSummary { cabin, pending }
            })
            .collect();
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldError;

    #[test]
    fn can_pivot_grouped_counts_per_cabin() {
        let lakeview = Uuid::new_v4();
        let pinecrest = Uuid::new_v4();

        let counts = pivot_pending_counts(vec![
            (lakeview, TaskPriority::High, 1),
            (lakeview, TaskPriority::Medium, 2),
            (pinecrest, TaskPriority::Low, 4),
            (lakeview, TaskPriority::Low, 3),
        ]);

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&lakeview], PendingCounts::new(1, 2, 3));
        assert_eq!(counts[&lakeview].total(), 6);
        assert_eq!(counts[&pinecrest], PendingCounts::new(0, 0, 4));
        assert_eq!(counts[&pinecrest].total(), 4);
    }

    #[test]
    fn can_pivot_no_rows_into_no_counts() {
        let counts = pivot_pending_counts(Vec::new());
        assert!(counts.is_empty());
        assert_eq!(PendingCounts::default().total(), 0);
    }

    #[test]
    fn can_reject_blank_cabin_fields() {
        let errors = NewCabin::parse(Some(" ".to_string()), None, None).unwrap_err();

        assert_eq!(
            errors.field_errors(),
            &[
                FieldError::new("name", "name must not be empty"),
                FieldError::new("location", "location is required"),
            ]
        );
    }

    #[test]
    fn can_reject_names_and_locations_wider_than_the_columns() {
        let fits = "a".repeat(MAX_CABIN_TEXT_LEN);
        assert!(NewCabin::new(fits.clone(), fits, None).is_ok());

        let too_long = "a".repeat(MAX_CABIN_TEXT_LEN + 1);
        let errors = NewCabin::new(too_long.clone(), too_long, None).unwrap_err();

        assert_eq!(
            errors.field_errors(),
            &[
                FieldError::new("name", "name must be at most 255 characters"),
                FieldError::new("location", "location must be at most 255 characters"),
            ]
        );
    }

    #[test]
    fn can_keep_optional_description() {
        let new_cabin =
            NewCabin::new("Lakeview", "Tahoe", Some("Two bedrooms".to_string())).unwrap();

        assert_eq!(new_cabin.description.as_deref(), Some("Two bedrooms"));
    }
}
