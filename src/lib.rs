//! Host-side controller for the code timer panel.
//!
//! The panel view (a webview or any other front end) talks to the host in
//! JSON [`protocol`] messages.  The host runs a pausable countdown
//! ([`timer`]), fetches short coding hints from a text-generation service
//! ([`hint`]), renders them to safe markup ([`markup`]) and ties it all
//! together on one [`bus`] task per panel session.

pub mod bus;
pub mod config;
pub mod hint;
pub mod markup;
pub mod protocol;
pub mod timer;

pub use bus::ChannelBus;
pub use protocol::{Command, Event, EventSink};
