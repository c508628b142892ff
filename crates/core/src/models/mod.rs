pub mod chart;
pub mod portfolio;
pub mod price;
pub mod settings;
pub mod trade;
pub mod transaction;
