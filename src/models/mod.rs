pub mod building;
pub mod comment;
pub mod response;
pub mod task;
pub mod user;
