pub mod timeframe;
pub mod display;
