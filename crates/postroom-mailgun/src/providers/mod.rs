//! Mail provider abstractions and implementations

mod mailgun;
mod traits;

#[cfg(test)]
pub mod mock;

pub use mailgun::{DeliveryOptions, MailgunClient, MailgunClientFactory};
pub use traits::*;

#[cfg(test)]
pub use mock::{MockMailProvider, MockProviderFactory};
