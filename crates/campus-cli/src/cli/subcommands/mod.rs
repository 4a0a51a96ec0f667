mod results;

pub use results::ResultsCommands;
