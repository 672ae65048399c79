mod fragments;
mod load_definitions;

pub use load_definitions::LoadDefinitionsUseCase;
