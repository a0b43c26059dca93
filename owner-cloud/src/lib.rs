//! owner-cloud: restaurant owner backend
//!
//! - Owner management API (JWT authenticated, `owner` role)
//! - Schedule worker that opens and closes restaurants from their weekly hours
//! - Live WebSocket push of availability changes to owner dashboards
//! - Document and image uploads to S3

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod live;
pub mod schedule;
pub mod state;
pub mod storage;
pub mod tasks;
