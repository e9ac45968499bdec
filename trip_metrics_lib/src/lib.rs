pub mod clock;
pub mod events;
pub mod summary;
pub mod tracker;
