pub use crate::server::{
    AppState, Blueprint, BlueprintError, BlueprintProvider, BlueprintRegistry,
};
pub use crwa_derive::{api_handler, api_model};
pub use crwa_domain::Environment;
pub use crwa_domain::config::AppConfig;
pub use crwa_domain::constants::*;
