pub mod dto;
pub mod model;
pub mod translate;
pub mod validate;
