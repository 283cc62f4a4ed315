mod function;
mod sine_generator;

pub use function::SineFunction;
pub use sine_generator::SineGenerator;
