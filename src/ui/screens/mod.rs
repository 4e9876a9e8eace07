pub(crate) mod auth;
pub(crate) mod categories;
pub(crate) mod form;
pub(crate) mod home;
