pub mod crop;
pub mod markers;
pub mod transform;
pub mod types;
pub mod view;
