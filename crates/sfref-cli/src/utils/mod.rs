pub mod browser;
pub mod logging;
pub mod picker;
