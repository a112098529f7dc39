pub mod app;
pub mod appsettings;
pub mod countdown;
pub mod delivery;
pub mod fetcher;
pub mod i18n;
pub mod models;
pub mod notify;
pub mod presentation;
pub mod storage;
pub mod usage;

#[cfg(test)]
mod test_utils;
