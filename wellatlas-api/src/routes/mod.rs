pub(crate) mod body;
pub(crate) mod crew;
pub(crate) mod customers;
pub(crate) mod error;
pub(crate) mod export;
pub(crate) mod gantt;
pub(crate) mod jobs;
pub(crate) mod sites;
pub(crate) mod timeline;

pub(crate) use body::JsonOrForm;
pub(crate) use error::ApiError;
