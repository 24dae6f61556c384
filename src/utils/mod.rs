pub mod echar;
