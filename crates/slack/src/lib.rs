//! Slack interface for the affirmation bot.
//!
//! - **Slash commands** (`commands`) - `/customer_affirm`, `/customer_affirm add "..."`, `stats`
//! - **Interactions** (`interactions`) - Shuffle and share button clicks
//! - **Block Kit** (`blocks`) - response payloads (cards, stats panel, copy)
//!
//! # Architecture
//!
//! ```text
//! Slack form POST → normalize/parse → Router → Service (server crate)
//!                                        ↓
//!                        ResponseMessage (JSON body or response_url)
//! ```
//!
//! # Key Types
//!
//! - `CommandRouter` - maps a parsed command to static copy or the command service
//! - `InteractionRouter` - maps a button click to a `response_url` follow-up
//! - `MessageBuilder` - constructs Block Kit messages
//! - `AffirmationCommandService` / `AffirmationInteractionService` - traits the host implements

pub mod blocks;
pub mod commands;
pub mod interactions;
