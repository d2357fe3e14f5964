//! Sending domain resolution

use lettre::message::Mailbox;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::MailgunError;

/// Working domain value meaning "use the domain of the From address"
pub const SENDER_DOMAIN: &str = "_sender";

static NAMED_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(.+?)\s*<\s*([^>]+)\s*>$").expect("valid address pattern"));

/// Decide which Mailgun domain a message from `from` is sent through.
///
/// An explicit working domain is returned as is. With `_sender`, the domain
/// of a valid mailbox (`user@domain` or `Name <user@domain>`) wins;
/// otherwise the text after the last `@` of the bracketed or bare address
/// is used.
pub fn resolve_domain(working_domain: &str, from: &str) -> Result<String, MailgunError> {
    if working_domain != SENDER_DOMAIN {
        return Ok(working_domain.to_string());
    }

    let sender = from.trim();
    if let Ok(mailbox) = sender.parse::<Mailbox>() {
        return Ok(mailbox.email.domain().to_string());
    }

    let address = NAMED_ADDRESS
        .captures(sender)
        .and_then(|captures| captures.get(2))
        .map(|m| m.as_str())
        .unwrap_or(sender)
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>');

    match address.rsplit_once('@') {
        Some((_, domain)) if !domain.trim().is_empty() => Ok(domain.trim().to_string()),
        _ => Err(MailgunError::DomainUnresolvable(from.to_string())),
    }
}
