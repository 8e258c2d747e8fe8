//! LeetCode Mentor: hint relay server and client.
//!
//! Server side: `routes` -> `hints` (orchestration) -> `leetcode` (metadata)
//! and `groq` (chat completions), degrading to `fallback` on any failure.
//!
//! Client side: `mentor` (popup flow) over `page` (problem context) and
//! `history` (local hint cache with a 7-day sweep).

pub mod config;
pub mod domain;
pub mod error;
pub mod fallback;
pub mod groq;
pub mod hints;
pub mod history;
pub mod leetcode;
pub mod mentor;
pub mod page;
pub mod protocol;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod text;
