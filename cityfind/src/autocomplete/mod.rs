pub mod autocomplete;
pub mod dropdown;
pub mod fetch;
pub mod storage;
