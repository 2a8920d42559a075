//! Business logic services

pub mod catalog;
pub mod circulation;
pub mod reports;
pub mod roster;

use crate::{config::CirculationConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub circulation: circulation::CirculationService,
    pub roster: roster::RosterService,
    pub reports: reports::ReportsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, circulation_config: CirculationConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            circulation: circulation::CirculationService::new(repository.clone(), circulation_config),
            roster: roster::RosterService::new(repository.clone()),
            reports: reports::ReportsService::new(repository),
        }
    }
}
