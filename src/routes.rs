use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{bookings, catalog, customers, dashboard, health, payments};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route(
            "/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route("/customers/search", get(customers::search_customers))
        .route("/customers/count", get(dashboard::customers_count))
        .route(
            "/customers/:id",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route(
            "/services",
            get(catalog::list_services).post(catalog::create_service),
        )
        .route("/services/search", get(catalog::search_services))
        .route("/services/count", get(dashboard::services_count))
        .route(
            "/services/:id",
            get(catalog::get_service)
                .put(catalog::update_service)
                .delete(catalog::delete_service),
        )
        .route(
            "/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/bookings/count", get(dashboard::bookings_count))
        .route(
            "/bookings/:id",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .route("/search/customers", get(customers::search_customers))
        .route("/search/services", get(catalog::search_services))
        .route(
            "/dashboard/getCustomersCounts",
            get(dashboard::customers_count),
        )
        .route("/dashboard/getServicesCounts", get(dashboard::services_count))
        .route("/dashboard/getBookingsCounts", get(dashboard::bookings_count))
        .route("/pg/create-order", post(payments::create_order))
        // the gateway redirects to `<callback>/?id=`, so accept the trailing slash too
        .route("/pg/callback", post(payments::payment_callback))
        .route("/pg/callback/", post(payments::payment_callback))
        .route("/pg/transactions/:order_id", get(payments::get_transaction));

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
