pub mod migration;
pub mod spotify;
pub mod tidal;
