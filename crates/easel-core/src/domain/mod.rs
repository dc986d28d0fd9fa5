//! Domain entities - the core business objects.

mod account;
mod post;
pub mod upload;

pub use account::{
    Account, Author, NewAccount, PASSWORD_MAX_CHARS, PASSWORD_MIN_CHARS, RegularUser, Registrant,
    Role, password_is_well_formed,
};
pub use post::{NewPost, Post};
pub use upload::IncomingFile;
