//! CLI command implementations

mod config;
mod list;
mod mv;
mod run;
mod select;
mod status;
mod stop;

pub use config::{config, ConfigArgs};
pub use list::{list, ListArgs};
pub use mv::{mv, MoveArgs};
pub use run::{run, RunArgs};
pub use select::{select, SelectArgs};
pub use status::status;
pub use stop::stop;

use gimbal_core::backend::SimBackend;
use gimbal_core::config::ConfigFile;

/// Build the simulated network from the config file's `[sim]` section
pub(crate) fn sim_backend(config: &ConfigFile) -> SimBackend {
    let backend = SimBackend::new();
    for source in &config.sim.sources {
        backend.add_source(&source.name, source.motion);
    }
    backend
}
