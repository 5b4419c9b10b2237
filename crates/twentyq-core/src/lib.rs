#![deny(warnings)]
pub mod belief;
pub mod model;
pub mod question;
pub mod session;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "twentyq"
    }

    pub const fn codename() -> &'static str {
        "Information Gain"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
