pub mod auth;
pub mod comments;
pub mod files;
pub mod history;
pub mod lookups;
pub mod multipart;
pub mod reports;
pub mod requests;
pub mod responses;
pub mod users;
