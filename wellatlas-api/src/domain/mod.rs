mod crew;
mod customer;
mod file;
mod job;
mod note;
mod site;

pub use crew::*;
pub use customer::*;
pub use file::*;
pub use job::*;
pub use note::*;
pub use site::*;
