pub(crate) mod pagination;
pub(crate) mod posts_service;
pub(crate) mod users_service;
