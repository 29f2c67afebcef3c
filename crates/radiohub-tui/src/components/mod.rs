pub mod header;
pub mod help_overlay;
pub mod now_playing;
pub mod station_list;
