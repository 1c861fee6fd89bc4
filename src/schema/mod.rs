pub mod background;
pub mod pose;
pub mod setting;
pub mod story;
