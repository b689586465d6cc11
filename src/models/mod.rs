pub mod journey;
pub mod language;
pub mod profile;
pub mod results;

pub use journey::*;
pub use language::*;
pub use profile::*;
pub use results::*;
