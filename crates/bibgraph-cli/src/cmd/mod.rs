pub mod convert;
pub mod roles;
pub mod suggest;
