mod function;
mod sea_generator;

pub use function::SeaFunction;
pub use sea_generator::SeaGenerator;
