pub mod entity;
pub mod qgram_index;
