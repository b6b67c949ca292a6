//! The transcript data model.
//!
//! A session is an ordered list of [`message::Message`]s. Each message carries
//! an ordered list of [`action::Action`]s: text, tool requests from the model,
//! tool results fed back to it, and errors the model reports about itself.
pub mod action;
pub mod message;
