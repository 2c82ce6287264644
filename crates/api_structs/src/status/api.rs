use serde::{Deserialize, Serialize};

pub mod get_service_health {
    use super::*;

    /// Liveness payload returned by the root route
    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub message: String,
    }
}
