pub mod gate;
pub mod provider;
pub mod registry;
pub mod router;
#[cfg(test)]
pub(crate) mod testing;

pub use gate::ConcurrencyGateRegistry;
pub use provider::{ModelProvider, ProviderCallError};
pub use registry::ProviderRegistry;
pub use router::{extract_first_json, hedge_json, HedgeError, Hedged, ProviderFailure};
