mod contract;
mod element;
mod format;
mod matrix;
mod vector;

pub use element::Element;
pub use format::FormatElement;
pub use matrix::{multiply, Matrix};
pub use vector::{dot_product, Vector};
