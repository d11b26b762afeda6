pub mod blocks;
pub mod panels;
pub mod table;
