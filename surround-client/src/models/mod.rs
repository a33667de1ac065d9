pub mod pause_control;
pub mod record;
pub mod time_control;
