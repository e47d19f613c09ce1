//! Antora reference resolution.
//!
//! Turns `component:module:family$path` references into concrete paths by
//! walking the project tree and reading component descriptors.

pub mod collect;
pub mod disambiguate;
pub mod family;
pub mod locate;
pub mod prefix;
pub mod proximity;
mod resolver;

pub use collect::PrefixCollector;
pub use disambiguate::ComponentDisambiguator;
pub use resolver::AntoraResolver;
