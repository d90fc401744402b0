pub mod charges;
pub mod model;

pub use charges::ChargePredictionService;
pub use model::ModelServerClient;
