//! Protected greeting endpoints

use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

use crate::auth::service::AuthService;
use crate::auth::user::Principal;
use crate::handlers::auth::with_principal;

pub fn greeting(principal: &Principal) -> String {
    format!("Hello World! Welcome, {}!", principal.username)
}

pub fn describe_user(principal: &Principal) -> String {
    format!(
        "Current user: {}, roles: [{}]",
        principal.username,
        principal.roles.join(", ")
    )
}

/// Create the /api/hello and /api/user routes
pub fn hello_routes(
    service: Arc<AuthService>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let hello = warp::path!("api" / "hello")
        .and(warp::get())
        .and(with_principal(service.clone()))
        .map(|principal: Principal| greeting(&principal));

    let user = warp::path!("api" / "user")
        .and(warp::get())
        .and(with_principal(service))
        .map(|principal: Principal| describe_user(&principal));

    hello.or(user)
}
