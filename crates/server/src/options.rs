use api_types::options::OptionsResponse;
use axum::{Json, extract::State};

use crate::server::ServerState;

pub async fn get(State(state): State<ServerState>) -> Json<OptionsResponse> {
    let options = state.engine.options().clone();

    Json(OptionsResponse {
        batches: options.batches,
        income_payment_methods: options.income_payment_methods,
        receivers: options.receivers,
        registration_sources: options.registration_sources,
        expense_categories: options.expense_categories,
        expense_payment_methods: options.expense_payment_methods,
    })
}
