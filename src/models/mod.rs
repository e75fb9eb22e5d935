pub mod activity;

pub use activity::{ActivitiesView, Activity};
