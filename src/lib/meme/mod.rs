//! Module implementing the meme making pipeline.

mod engine;
mod error;
mod output;
mod task;


pub use self::engine::{Builder as EngineBuilder,
                       BuildError as EngineBuildError,
                       Config as EngineConfig,
                       ConfigError as EngineConfigError,
                       DynResolver,
                       Engine};
pub use self::error::MemeError;
pub use self::output::MemeOutput;
