//! Raw RFC 822 message composition.

use {chrono::NaiveDateTime, herald_config::EmailConfig};

/// Timestamp appended to every subject line.
const SUBJECT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Build the full message: headers, blank line, rendered HTML body.
///
/// `To` lists every recipient joined by `;`. The subject carries `sent_at`
/// so repeated alerts do not collapse into one thread.
pub fn compose(config: &EmailConfig, rendered_body: &str, sent_at: NaiveDateTime) -> String {
    let subject = format!("{} {}", config.subject, sent_at.format(SUBJECT_TIME_FORMAT));
    format!(
        "From: {} <{}>\r\n\
         To: {}\r\n\
         Subject: {subject}\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: text/html; charset=\"UTF-8\"\r\n\
         \r\n\
         {rendered_body}\r\n",
        config.sender,
        config.smtp.from,
        config.emails.join(";"),
    )
}
