//! Dashboard route group.

use hzn_domain::RouteGroupSpec;
use hzn_kernel::config::ConfigStore;
use hzn_kernel::router::{RouteGroup, Router};
use std::fmt;
use tracing::{debug, info};

/// Controller namespace every dashboard route is scoped to.
pub const CONTROLLER_NAMESPACE: &str = "horizon::http::controllers";

const DEFAULT_PREFIX: &str = "horizon";
const DEFAULT_MIDDLEWARE: &str = "web";

/// Supplies the routes placed inside Horizon's group.
pub trait RouteSource: Send + Sync {
    fn define(&self, routes: &mut RouteGroup);
}

impl<F> RouteSource for F
where
    F: Fn(&mut RouteGroup) + Send + Sync,
{
    fn define(&self, routes: &mut RouteGroup) {
        self(routes);
    }
}

/// The dashboard API plus the single-page catch-all.
#[derive(Debug, Default, Clone, Copy)]
pub struct DashboardRoutes;

impl RouteSource for DashboardRoutes {
    fn define(&self, routes: &mut RouteGroup) {
        routes.prefix("api", |api| {
            api.get("/stats", "DashboardStatsController@index").name("horizon.stats.index");

            api.get("/workload", "WorkloadController@index").name("horizon.workload.index");

            api.get("/masters", "MasterSupervisorController@index").name("horizon.masters.index");

            api.get("/monitoring", "MonitoringController@index").name("horizon.monitoring.index");
            api.post("/monitoring", "MonitoringController@store").name("horizon.monitoring.store");
            api.get("/monitoring/{tag}", "MonitoringController@paginate")
                .name("horizon.monitoring-tag.paginate");
            api.delete("/monitoring/{tag}", "MonitoringController@destroy")
                .name("horizon.monitoring-tag.destroy");

            api.get("/metrics/jobs", "JobMetricsController@index").name("horizon.jobs-metrics.index");
            api.get("/metrics/jobs/{id}", "JobMetricsController@show").name("horizon.jobs-metrics.show");

            api.get("/metrics/queues", "QueueMetricsController@index").name("horizon.queues-metrics.index");
            api.get("/metrics/queues/{id}", "QueueMetricsController@show")
                .name("horizon.queues-metrics.show");

            api.get("/jobs/recent", "RecentJobsController@index").name("horizon.recent-jobs.index");
            api.get("/jobs/failed", "FailedJobsController@index").name("horizon.failed-jobs.index");
            api.get("/jobs/failed/{id}", "FailedJobsController@show").name("horizon.failed-jobs.show");
            api.post("/jobs/retry/{id}", "RetryController@store").name("horizon.retry-jobs.show");
        });

        routes.get("/{view?}", "HomeController@index").constraint("view", "(.*)").name("horizon.index");
    }
}

pub struct RouteGroupRegistrar<'a> {
    source: &'a dyn RouteSource,
}

impl fmt::Debug for RouteGroupRegistrar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteGroupRegistrar").finish_non_exhaustive()
    }
}

impl<'a> RouteGroupRegistrar<'a> {
    pub const fn new(source: &'a dyn RouteSource) -> Self {
        Self { source }
    }

    /// Group options from live configuration: `horizon.uri` (default
    /// `"horizon"`) and `horizon.middleware` (default `["web"]`).
    #[must_use]
    pub fn group_spec(config: &ConfigStore) -> RouteGroupSpec {
        RouteGroupSpec {
            prefix: config.get_or("horizon.uri", DEFAULT_PREFIX.to_owned()),
            namespace: CONTROLLER_NAMESPACE.to_owned(),
            middleware: config.get_or("horizon.middleware", vec![DEFAULT_MIDDLEWARE.to_owned()]),
        }
    }

    /// Opens the group and lets the source fill it. Returns the number of
    /// routes added, zero when the host runs without HTTP.
    pub fn register_routes(&self, router: Option<&Router>, spec: &RouteGroupSpec) -> usize {
        let Some(router) = router else {
            debug!("HTTP disabled, skipping horizon routes");
            return 0;
        };

        let added = router.group(spec, |group| self.source.define(group));
        info!(prefix = %spec.prefix, middleware = ?spec.middleware, routes = added, "Horizon routes registered");
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn group_spec_falls_back_to_defaults() {
        let spec = RouteGroupRegistrar::group_spec(&ConfigStore::new());
        assert_eq!(spec.prefix, "horizon");
        assert_eq!(spec.middleware, vec!["web"]);
        assert_eq!(spec.namespace, CONTROLLER_NAMESPACE);
    }

    #[test]
    fn group_spec_reads_live_config() {
        let config =
            ConfigStore::from_value(json!({ "horizon": { "uri": "jobs", "middleware": ["auth"] } })).unwrap();
        let spec = RouteGroupRegistrar::group_spec(&config);
        assert_eq!(spec.prefix, "jobs");
        assert_eq!(spec.middleware, vec!["auth"]);
    }

    #[test]
    fn dashboard_routes_are_named_and_scoped() {
        let router = Router::new();
        let spec = RouteGroupRegistrar::group_spec(&ConfigStore::new());
        let added = RouteGroupRegistrar::new(&DashboardRoutes).register_routes(Some(&router), &spec);

        assert_eq!(added, 16);
        assert!(router.routes().iter().all(|r| r.name.as_deref().is_some_and(|n| n.starts_with("horizon."))));
        assert_eq!(router.routes().last().unwrap().uri, "/horizon/{view?}", "catch-all comes last");
        assert_eq!(router.by_name("horizon.retry-jobs.show").unwrap().uri, "/horizon/api/jobs/retry/{id}");
    }

    #[test]
    fn custom_sources_are_accepted() {
        let router = Router::new();
        let source = |g: &mut RouteGroup| {
            g.get("/ping", "PingController@show");
        };
        let spec = RouteGroupRegistrar::group_spec(&ConfigStore::new());

        assert_eq!(RouteGroupRegistrar::new(&source).register_routes(Some(&router), &spec), 1);
        assert_eq!(router.routes()[0].action, "horizon::http::controllers::PingController@show");
    }

    #[test]
    fn disabled_http_is_a_noop() {
        let spec = RouteGroupRegistrar::group_spec(&ConfigStore::new());
        assert_eq!(RouteGroupRegistrar::new(&DashboardRoutes).register_routes(None, &spec), 0);
    }
}
