use cabin_tracker_server::cabin::{Cabin, CabinService, NewCabin};
use cabin_tracker_server::entities::sea_orm_active_enums::{TaskPriority, TaskStatus};
use cabin_tracker_server::task::{NewTask, Task, TaskService};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::{postgres, testcontainers};

pub async fn setup_container() -> anyhow::Result<testcontainers::ContainerAsync<postgres::Postgres>>
{
    let container = postgres::Postgres::default().start().await?;
    Ok(container)
}

pub async fn setup_db(
    container: &testcontainers::ContainerAsync<postgres::Postgres>,
) -> anyhow::Result<DatabaseConnection> {
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    let db_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);
    let db = Database::connect(&db_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[allow(dead_code)]
pub async fn seed_cabin(db: &DatabaseConnection, name: &str, location: &str) -> anyhow::Result<Cabin> {
    let new_cabin = NewCabin::new(name, location, None)?;
    let cabin = CabinService::new(db).create_cabin(new_cabin).await?;
    // Keeps created_at strictly increasing between seeded rows.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    Ok(cabin)
}

#[allow(dead_code)]
pub async fn seed_task(
    db: &DatabaseConnection,
    cabin: &Cabin,
    description: &str,
    priority: TaskPriority,
    status: TaskStatus,
) -> anyhow::Result<Task> {
    let new_task = NewTask::new(cabin.id(), description, priority, status)?;
    let task = TaskService::new(db).create_task(new_task).await?;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    Ok(task)
}
