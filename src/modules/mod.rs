pub mod auth;
pub mod groups;
pub mod students;
pub mod subjects;
pub mod users;
