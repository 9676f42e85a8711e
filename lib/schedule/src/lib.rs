//! Talk schedule data for the talkfinder skill.
//!
//! This crate provides:
//!
//! - **TalkSource trait**: Fetch one talk by its position in the schedule
//! - **JoindInClient**: A `TalkSource` backed by the joind.in REST API
//! - **ScheduleConfig**: Endpoint, event and timeout settings

pub mod config;
pub mod error;
pub mod joindin;
pub mod talk;

pub use config::ScheduleConfig;
pub use error::ScheduleError;
pub use joindin::JoindInClient;
pub use talk::{Talk, TalkSource};
