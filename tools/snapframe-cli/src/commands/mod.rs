pub mod capture;
pub mod monitors;
pub mod prefs;
