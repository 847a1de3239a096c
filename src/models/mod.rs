pub mod invoice;
pub mod schema;
pub mod task;
