mod parameter_resolver;

pub use parameter_resolver::{ParameterResolver, OVERRIDABLE_KEYS};
