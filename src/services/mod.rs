pub mod answer;
pub mod auth;
pub mod cache;
pub mod category;
pub mod feed;
pub mod follow;
pub mod post;
pub mod rating;
pub mod report;
pub mod upload;
pub mod user;
