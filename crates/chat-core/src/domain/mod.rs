//! Domain rules for p2p-chat.
//!
//! This module contains pure logic with no infrastructure dependencies: it
//! never touches sockets, terminals, or threads, so everything here can be
//! tested on any platform without setup.
//!
//! - **`command`** – Classifies a line of local input (exit command or text
//!   to send).
//! - **`session`** – The session lifecycle state machine and the reasons a
//!   session can end.
//! - **`notice`** – Every status line shown to the user, in one place.

pub mod command;
pub mod notice;
pub mod session;
