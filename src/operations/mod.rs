pub mod boolean;
pub mod clip;
pub mod query;
pub mod shaping;
