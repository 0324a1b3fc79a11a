pub mod browser;
pub mod clock;
pub mod config;
pub mod loading;
pub mod output;
pub mod roster;
pub mod rules;
pub mod scoring;
pub mod units;
