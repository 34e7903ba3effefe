pub mod category;
pub mod config;
pub mod db;
pub mod environment;
pub mod errors;
pub mod event;
pub mod export;
pub mod info;
pub mod iso_date;
pub mod listing;
pub mod log;
pub mod mailer;
pub mod normalization;
pub mod registration;
pub mod routes;
pub mod selector;
pub mod settings;
pub mod submission;
pub mod validation;
