pub(crate) mod composite;
pub(crate) mod decode;
pub(crate) mod raster;
pub(crate) mod source;
