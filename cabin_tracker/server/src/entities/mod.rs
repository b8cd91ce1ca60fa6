//! `SeaORM` entities for the cabin tracker schema.

pub mod prelude;

pub mod cabins;
pub mod maintenance_tasks;
pub mod sea_orm_active_enums;
