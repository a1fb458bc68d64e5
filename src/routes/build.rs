use std::sync::Arc;

use tracing::{info, warn};

use super::declaration::{Meta, Route, RouteParts, RouteUnit};
use crate::error::Result;
use crate::middleware::compose;
use crate::router::{HttpMethod, RouteMethod, RouteTable};

/// Reduce route declarations to a route table.
///
/// Declarations are processed in order, and registration order is match
/// precedence:
/// - a per-method mapping registers each recognized method key; the flow is
///   route middleware, then the mapping's shared middleware, then the
///   method's own pipeline; unrecognized keys are dropped
/// - a pipeline or bare handler registers under the `ANY` bucket
/// - a nested child route is registered right after its parent
///
/// Fails on the first malformed path template.
pub fn build_routes(routes: impl IntoIterator<Item = Route>) -> Result<RouteTable> {
    let mut table = RouteTable::new();
    let unlabelled = Arc::new(Meta::default());

    for route in routes {
        register(&mut table, route, &unlabelled)?;
    }

    let routes_summary: Vec<String> = table
        .describe()
        .iter()
        .take(10)
        .map(|r| format!("{} {}", r.method, r.path))
        .collect();
    info!(
        routes_count = table.len(),
        routes_summary = ?routes_summary,
        "Routing table built"
    );

    Ok(table)
}

fn register(table: &mut RouteTable, route: Route, unlabelled: &Arc<Meta>) -> Result<()> {
    let RouteParts {
        path,
        unit,
        middleware: outer,
        meta,
        child,
    } = route.into_parts();
    let route_meta = meta.map(Arc::new);

    match unit {
        RouteUnit::Methods(map) => {
            let (entries, shared, map_meta) = map.into_parts();
            let meta = route_meta.unwrap_or_else(|| Arc::new(map_meta));
            for (key, endpoint) in entries {
                let Some(method) = HttpMethod::from_mapping_key(&key) else {
                    warn!(path = %path, key = %key, "Discarding unrecognized method key");
                    continue;
                };
                let (own, handler) = endpoint.into_parts();
                let flow: Vec<_> = outer
                    .iter()
                    .chain(&shared)
                    .cloned()
                    .chain(own)
                    .collect();
                table.add(
                    RouteMethod::Exact(method),
                    &path,
                    compose(&flow, handler),
                    Arc::clone(&meta),
                )?;
            }
        }
        RouteUnit::Pipeline(pipeline) => {
            let (own, handler) = pipeline.into_parts();
            let flow: Vec<_> = outer.into_iter().chain(own).collect();
            let meta = route_meta.unwrap_or_else(|| Arc::clone(unlabelled));
            table.add(RouteMethod::Any, &path, compose(&flow, handler), meta)?;
        }
        RouteUnit::Handler(handler) => {
            let meta = route_meta.unwrap_or_else(|| Arc::clone(unlabelled));
            table.add(RouteMethod::Any, &path, compose(&outer, handler), meta)?;
        }
    }

    if let Some(child) = child {
        register(table, *child, unlabelled)?;
    }
    Ok(())
}
