use std::sync::Arc;

use actix_web::{FromRequest, Handler, Responder, Route, http::Method, web};

use crate::handlers::Handlers;

mod api_routes;

/// Binds method + path pairs to handler operations.
pub struct Router {
    handlers: Arc<Handlers>,
}

impl Router {
    pub fn new(handlers: Arc<Handlers>) -> Self {
        Self { handlers }
    }
}

struct RouteEntry {
    method: Method,
    path: String,
    route: Route,
}

/// Ordered route bindings. Applied as one resource per path, so a known path
/// hit with an unbound method answers 405 rather than 404.
#[derive(Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn add<F, Args>(&mut self, method: Method, path: &str, handler: F) -> &mut Self
    where
        F: Handler<Args>,
        Args: FromRequest + 'static,
        F::Output: Responder + 'static,
    {
        self.entries.push(RouteEntry {
            route: web::method(method.clone()).to(handler),
            method,
            path: path.to_string(),
        });
        self
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&Method, &str)> {
        self.entries
            .iter()
            .map(|entry| (&entry.method, entry.path.as_str()))
    }

    pub fn apply(self, cfg: &mut web::ServiceConfig) {
        let mut by_path: Vec<(String, Vec<Route>)> = Vec::new();
        for entry in self.entries {
            log::debug!("Registering route {} {}", entry.method, entry.path);
            match by_path.iter_mut().find(|(path, _)| *path == entry.path) {
                Some((_, routes)) => routes.push(entry.route),
                None => by_path.push((entry.path, vec![entry.route])),
            }
        }

        for (path, routes) in by_path {
            let resource = routes
                .into_iter()
                .fold(web::resource(path.as_str()), |resource, route| {
                    resource.route(route)
                });
            cfg.service(resource);
        }
    }
}
