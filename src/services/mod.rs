pub mod catalog;
pub mod gemini;
pub mod generator;
pub mod library;
pub mod parser;
pub mod recommendations;
pub mod resolver;

pub use recommendations::RecommendationService;
