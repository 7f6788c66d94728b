use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{router_for_state, run, run_with_listener, spawn_with_listener};

mod allocations;
mod costs;
mod members;
mod projects;
mod server;
mod statistics;
mod user;

pub mod types {
    pub mod project {
        pub use api_types::project::{BudgetUpdate, ProjectNew, ProjectView, ProjectsResponse};
    }

    pub mod member {
        pub use api_types::member::{MemberInvite, MemberView, MembersResponse, ProjectRole};
    }

    pub mod cost {
        pub use api_types::cost::{
            CostCreated, CostDetailResponse, CostListQuery, CostListResponse, CostNew,
            CostSplitView, CostStatus, CostView, SplitMode, SplitNew,
        };
    }

    pub mod allocation {
        pub use api_types::allocation::{
            AllocationCreated, AllocationNew, AllocationView, AllocationsResponse,
        };
    }

    pub mod stats {
        pub use api_types::stats::{ProjectStats, StatsQuery};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) | EngineError::DuplicateMember(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::Validation(_)
        | EngineError::InvalidAmount(_)
        | EngineError::CurrencyMismatch(_)
        | EngineError::SplitMismatch(_)
        | EngineError::NoParticipants
        | EngineError::InvalidTransition(_)
        | EngineError::InvalidId(_)
        | EngineError::InvalidCursor(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

pub(crate) fn map_currency(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Usd => api_types::Currency::Usd,
        engine::Currency::Eur => api_types::Currency::Eur,
        engine::Currency::Gbp => api_types::Currency::Gbp,
    }
}

pub(crate) fn engine_currency(currency: api_types::Currency) -> engine::Currency {
    match currency {
        api_types::Currency::Usd => engine::Currency::Usd,
        api_types::Currency::Eur => engine::Currency::Eur,
        api_types::Currency::Gbp => engine::Currency::Gbp,
    }
}
