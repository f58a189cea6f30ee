use std::result;

pub type Result<T, E = String> = result::Result<T, E>;
