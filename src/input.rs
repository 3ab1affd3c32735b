pub(crate) mod event;
pub(crate) mod gesture;
pub(crate) mod interpreter;
