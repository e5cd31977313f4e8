//! Route table the host exposes to modules while HTTP is enabled.
//!
//! The router only records declarations. Matching and dispatching requests is
//! the web server's job.

use hzn_domain::RouteGroupSpec;
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One declared route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub method: Method,
    pub uri: String,
    /// `namespace::Controller@action`.
    pub action: String,
    pub name: Option<String>,
    pub middleware: Vec<String>,
    /// Parameter patterns, e.g. `("view", "(.*)")`.
    pub constraints: Vec<(String, String)>,
}

impl Route {
    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn constraint(&mut self, param: impl Into<String>, pattern: impl Into<String>) -> &mut Self {
        self.constraints.push((param.into(), pattern.into()));
        self
    }
}

/// Collects routes sharing a prefix, controller namespace and middleware.
#[derive(Debug)]
pub struct RouteGroup {
    prefix: String,
    namespace: String,
    middleware: Vec<String>,
    routes: Vec<Route>,
}

impl RouteGroup {
    fn new(spec: &RouteGroupSpec) -> Self {
        Self {
            prefix: trim(&spec.prefix).to_owned(),
            namespace: spec.namespace.clone(),
            middleware: spec.middleware.clone(),
            routes: Vec::new(),
        }
    }

    pub fn get(&mut self, uri: &str, action: &str) -> &mut Route {
        self.add(Method::Get, uri, action)
    }

    pub fn post(&mut self, uri: &str, action: &str) -> &mut Route {
        self.add(Method::Post, uri, action)
    }

    pub fn put(&mut self, uri: &str, action: &str) -> &mut Route {
        self.add(Method::Put, uri, action)
    }

    pub fn delete(&mut self, uri: &str, action: &str) -> &mut Route {
        self.add(Method::Delete, uri, action)
    }

    /// Nests routes under an additional prefix.
    pub fn prefix(&mut self, prefix: &str, define: impl FnOnce(&mut Self)) {
        let mut nested = Self {
            prefix: join(&self.prefix, prefix),
            namespace: self.namespace.clone(),
            middleware: self.middleware.clone(),
            routes: Vec::new(),
        };
        define(&mut nested);
        self.routes.append(&mut nested.routes);
    }

    pub fn add(&mut self, method: Method, uri: &str, action: &str) -> &mut Route {
        let action = if self.namespace.is_empty() {
            action.to_owned()
        } else {
            format!("{}::{action}", self.namespace)
        };

        self.routes.push(Route {
            method,
            uri: format!("/{}", join(&self.prefix, uri)),
            action,
            name: None,
            middleware: self.middleware.clone(),
            constraints: Vec::new(),
        });
        let last = self.routes.len() - 1;
        &mut self.routes[last]
    }
}

/// Shared, append-only route table.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Arc<RwLock<Vec<Route>>>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a group of routes; returns how many were added.
    pub fn group(&self, spec: &RouteGroupSpec, define: impl FnOnce(&mut RouteGroup)) -> usize {
        let mut group = RouteGroup::new(spec);
        define(&mut group);

        let added = group.routes.len();
        debug!(prefix = %spec.prefix, namespace = %spec.namespace, added, "Route group registered");
        self.routes.write().append(&mut group.routes);
        added
    }

    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        self.routes.read().clone()
    }

    /// The last route declared under `name`.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<Route> {
        self.routes.read().iter().rev().find(|r| r.name.as_deref() == Some(name)).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }
}

fn trim(segment: &str) -> &str {
    segment.trim_matches('/')
}

fn join(prefix: &str, uri: &str) -> String {
    match (trim(prefix), trim(uri)) {
        ("", uri) => uri.to_owned(),
        (prefix, "") => prefix.to_owned(),
        (prefix, uri) => format!("{prefix}/{uri}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(prefix: &str) -> RouteGroupSpec {
        RouteGroupSpec {
            prefix: prefix.into(),
            namespace: "horizon::http::controllers".into(),
            middleware: vec!["web".into()],
        }
    }

    #[test]
    fn group_applies_prefix_namespace_and_middleware() {
        let router = Router::new();
        let added = router.group(&spec("/jobs/"), |g| {
            g.prefix("api", |api| {
                api.get("/stats", "DashboardStatsController@index").name("horizon.stats.index");
            });
            g.get("/{view?}", "HomeController@index")
                .constraint("view", "(.*)")
                .name("horizon.index");
        });

        assert_eq!(added, 2);
        let stats = router.by_name("horizon.stats.index").unwrap();
        assert_eq!(stats.uri, "/jobs/api/stats");
        assert_eq!(stats.action, "horizon::http::controllers::DashboardStatsController@index");
        assert_eq!(stats.middleware, vec!["web"]);

        let home = router.by_name("horizon.index").unwrap();
        assert_eq!(home.uri, "/jobs/{view?}");
        assert_eq!(home.constraints, vec![("view".to_owned(), "(.*)".to_owned())]);
    }

    #[test]
    fn empty_prefix_mounts_at_root() {
        let router = Router::new();
        router.group(&spec(""), |g| {
            g.post("/retry/{id}", "RetryController@store");
        });
        assert_eq!(router.routes()[0].uri, "/retry/{id}");
        assert_eq!(router.routes()[0].method, Method::Post);
    }
}
