//! Email channel: renders the HTML mail template, composes the message and
//! submits it over SMTP with LOGIN authentication.
//!
//! The `body` field is inserted into the template without escaping. It is a
//! trust boundary: whoever can call the gateway can inject arbitrary HTML
//! into outgoing mail.

pub mod dispatcher;
pub mod error;
pub mod message;
pub mod smtp;
pub mod template;

pub use {
    dispatcher::EmailDispatcher,
    error::{Error, Result},
    smtp::{MailSubmitter, SmtpSubmitter},
    template::{FsTemplateSource, MailTemplateVars, TemplateCache, TemplateSource},
};
