//! Application state and composition.

use std::sync::Arc;

use babel_domain::Catalogue;

use crate::api::Dispatcher;
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::ports::{RollPort, SheetStore};
use crate::use_cases::{DerivedUseCases, PopulationUseCases, RollUseCases};

/// Main application state.
///
/// Wires the host ports and the catalogue into the use cases and the
/// dispatcher that routes sheet events to them.
pub struct App {
    pub use_cases: UseCases,
    pub dispatcher: Dispatcher,
    pub catalogue: Arc<Catalogue>,
}

/// Container for all use cases.
pub struct UseCases {
    pub derived: Arc<DerivedUseCases>,
    pub rolls: Arc<RollUseCases>,
    pub population: Arc<PopulationUseCases>,
}

impl App {
    pub fn new(
        config: &EngineConfig,
        catalogue: Catalogue,
        store: Arc<dyn SheetStore>,
        roller: Arc<dyn RollPort>,
    ) -> Self {
        let catalogue = Arc::new(catalogue);

        let derived = Arc::new(DerivedUseCases::new(store.clone()));
        let rolls = Arc::new(RollUseCases::new(store.clone(), roller));
        let population = Arc::new(PopulationUseCases::new(
            store,
            catalogue.clone(),
            rolls.clone(),
            config.slots(),
        ));

        let dispatcher = Dispatcher::new(
            derived.clone(),
            rolls.clone(),
            population.clone(),
            config.max_cascade_depth,
        );

        Self {
            use_cases: UseCases {
                derived,
                rolls,
                population,
            },
            dispatcher,
            catalogue,
        }
    }
}
