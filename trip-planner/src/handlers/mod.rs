//! HTTP handlers for the trip planner service.

pub mod api;
pub mod form;
pub mod health;
pub mod pages;
