pub(crate) mod polygon;
pub(crate) mod zone;
