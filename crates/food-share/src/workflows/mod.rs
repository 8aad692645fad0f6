pub mod donations;
pub mod matching;
pub mod quality;
