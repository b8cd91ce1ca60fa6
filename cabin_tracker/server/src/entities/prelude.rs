pub use super::cabins::Entity as Cabins;
pub use super::maintenance_tasks::Entity as MaintenanceTasks;
