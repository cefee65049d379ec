//! Plant biography aggregate

pub mod model;
pub mod repository;
pub mod view;

pub use model::{Author, PlantBio, PlantDetails, PlantQuery};
pub use repository::{PlantRepositoryInterface, SaveOutcome};
pub use view::PlantView;
