pub(crate) mod selector;
pub(crate) mod style;
