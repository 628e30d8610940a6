pub mod attendance;
pub mod group;
pub mod meeting;
pub mod membership;
pub mod person;
