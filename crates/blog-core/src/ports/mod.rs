//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod mail;
mod repository;

pub use mail::{Mailer, OutgoingMail, mask_email};
pub use repository::{
    BaseRepository, CommentRepository, PostRepository, PublishedFilter, TagRepository,
};
