//! copilot-web — Browser and JSON front end for the analyze workflow:
//!   - one page with a variant/question input, optional screenshot, Analyze button
//!   - JSON API for the same request
//!   - prevalence lookup passthrough

pub mod router;
pub mod handlers;
pub mod state;
