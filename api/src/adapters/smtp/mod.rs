//! SMTP mail adapter

mod mailer;

pub use mailer::SmtpMailer;
