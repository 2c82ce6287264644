use crate::dtos::ReminderInput;
use mealmind_domain::ID;
use serde::{Deserialize, Serialize};

pub mod schedule_reminders {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    /// When `reminders` is omitted the user's stored reminders are
    /// re-scheduled as-is.
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub reminders: Option<Vec<ReminderInput>>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub scheduled_count: usize,
    }

    impl APIResponse {
        pub fn new(scheduled_count: usize) -> Self {
            Self { scheduled_count }
        }
    }
}

pub mod cancel_reminders {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub cancelled_count: usize,
    }

    impl APIResponse {
        pub fn new(cancelled_count: usize) -> Self {
            Self { cancelled_count }
        }
    }
}
