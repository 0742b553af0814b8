//! Scripted lead intake dialogue.
//!
//! A user dictates a lead one field per message ("my name is ...",
//! "my email is ...", "my phone is ..."). Once the phone arrives and the
//! record is complete, the lead is handed back for submission.

use regex::Regex;
use std::sync::LazyLock;

use super::session::IntakeSession;
use crate::lead::{IdStrategy, LeadCandidate, LeadRejection};

pub const REPLY_START: &str = "Yes, we can do that. Please tell me your name.";
pub const REPLY_EMAIL_RECORDED: &str = "Email recorded. Please provide a phone number.";
pub const REPLY_MISSING: &str = "Some details are missing. Please try again.";
pub const REPLY_BAD_EMAIL: &str = "That email doesn't look right. Please provide a valid email.";
pub const REPLY_BAD_PHONE: &str =
    "That phone number doesn't look right. Please provide a valid phone number.";
pub const REPLY_UNKNOWN: &str = "Sorry, I didn't understand. Can you please repeat?";
pub const REPLY_ADDED: &str = "Lead successfully added!";
pub const REPLY_SUBMIT_FAILED: &str = "Could not save the lead right now. Please try again later.";

static START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:add one lead|start)\b").unwrap());
static NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bmy name is\s+(.+)").unwrap());
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmy email is\s+(.+)").unwrap());
static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bmy phone is\s+(.+)").unwrap());

/// What a single user message asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Utterance {
    Start,
    Name(String),
    Email(String),
    Phone(String),
    Unknown,
}

/// Classify a message. Rules are checked in order; the first match wins.
pub fn parse_utterance(message: &str) -> Utterance {
    if START.is_match(message) {
        return Utterance::Start;
    }
    if let Some(value) = capture(&NAME, message) {
        return Utterance::Name(value);
    }
    if let Some(value) = capture(&EMAIL, message) {
        return Utterance::Email(value);
    }
    if let Some(value) = capture(&PHONE, message) {
        return Utterance::Phone(value);
    }
    Utterance::Unknown
}

fn capture(re: &Regex, message: &str) -> Option<String> {
    let value = re
        .captures(message)?
        .get(1)?
        .as_str()
        .trim()
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | ','))
        .trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// The outcome of one conversation turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// Answer the user; nothing to submit.
    Reply(String),
    /// The record is complete and valid; submit it to the CRM.
    Submit(LeadCandidate),
}

/// Apply a message to a session.
pub fn advance(session: &mut IntakeSession, message: &str, ids: &IdStrategy) -> Turn {
    session.touch();

    match parse_utterance(message) {
        Utterance::Start => {
            session.reset();
            Turn::Reply(REPLY_START.to_string())
        }
        Utterance::Name(name) => {
            let reply = format!("Got it, {}. Please provide an email.", name);
            session.name = Some(name);
            Turn::Reply(reply)
        }
        Utterance::Email(email) => {
            session.email = Some(email);
            Turn::Reply(REPLY_EMAIL_RECORDED.to_string())
        }
        Utterance::Phone(phone) => {
            session.phone = Some(phone);
            complete(session, ids)
        }
        Utterance::Unknown => Turn::Reply(REPLY_UNKNOWN.to_string()),
    }
}

fn complete(session: &mut IntakeSession, ids: &IdStrategy) -> Turn {
    let (Some(name), Some(email), Some(phone)) = (&session.name, &session.email, &session.phone)
    else {
        return Turn::Reply(REPLY_MISSING.to_string());
    };

    let lead = LeadCandidate {
        enq_id: ids.next_id(),
        firstnm: name.clone(),
        email: email.clone(),
        mobile: phone.clone(),
    };

    match lead.validate() {
        Ok(()) => Turn::Submit(lead),
        Err(LeadRejection::Missing(_)) => Turn::Reply(REPLY_MISSING.to_string()),
        Err(LeadRejection::InvalidEmail) => {
            session.email = None;
            Turn::Reply(REPLY_BAD_EMAIL.to_string())
        }
        Err(LeadRejection::InvalidPhone) => {
            session.phone = None;
            Turn::Reply(REPLY_BAD_PHONE.to_string())
        }
    }
}
