//! # Twilio Client
//!
//! Thin telephony layer: a REST client for sending messages and placing
//! calls, and TwiML writers for answering webhooks. The quiz logic itself
//! never appears here; this crate only moves text and prompts across the
//! phone network.

pub mod client;
pub mod client_trait;
pub mod error;
pub mod twiml;

pub use client::{TwilioClient, TwilioConfig};
pub use client_trait::{MessageRecord, TwilioApi};
pub use error::TwilioError;
