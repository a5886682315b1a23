pub mod catalog;
pub mod heat_loss;
pub mod quotation;
pub mod units;
