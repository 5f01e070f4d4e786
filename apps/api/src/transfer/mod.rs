//! Moving a resume in and out of the service: JSON import, JSON download
//! and the printable HTML export.

pub mod handlers;
pub mod import;
