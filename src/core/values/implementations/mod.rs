pub mod input_bag;
pub mod output_bag;

pub use input_bag::InputBag;
pub use output_bag::OutputBag;
