//! AddressTable - the bijective mapping between source routes and output routes.
//!
//! Built once per build from the discovered files, then shared read-only by
//! transpilation, page generation and declaration emission.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::Route;

/// Source route -> output route mapping (and its inverse).
///
/// # Invariants
/// - Every source route maps to exactly one output route
/// - No two source routes share an output route
#[derive(Debug, Default, Clone)]
pub struct AddressTable {
    /// Source route -> output route
    by_route: FxHashMap<Route, Route>,
    /// Output route -> source route
    by_output: FxHashMap<Route, Route>,
    /// Source extensions with a registered type declaration
    declared: FxHashSet<String>,
}

/// Input for [`AddressTable::build`]: a source route and the output it held
/// in the previous build, if any.
#[derive(Debug, Clone)]
pub struct AddressRequest {
    pub route: Route,
    pub reserved: Option<Route>,
}

impl AddressTable {
    /// Assign output routes.
    ///
    /// Reserved outputs are claimed first so cached and updated files keep
    /// their location. Remaining routes are assigned in sorted order, files
    /// whose output equals their source route first, then transformed ones.
    /// Collisions fall back to `<route>.<ext>`, then `<route>.<n>.<ext>`
    /// (`<stem>.<n>.<ext>` for files without a transpiler).
    pub fn build(
        requests: &[AddressRequest],
        output_extensions: &FxHashMap<String, String>,
        declared: FxHashSet<String>,
    ) -> Self {
        let mut table = Self {
            declared,
            ..Self::default()
        };

        let mut pending: Vec<&Route> = Vec::new();
        for request in requests {
            match &request.reserved {
                Some(output) if !table.by_output.contains_key(output) => {
                    table.insert(request.route.clone(), output.clone());
                }
                _ => pending.push(&request.route),
            }
        }

        pending.sort();
        pending.dedup();

        let (identity, transformed): (Vec<&Route>, Vec<&Route>) =
            pending.into_iter().partition(|route| {
                output_extension(route, output_extensions).is_none()
            });

        for route in identity.into_iter().chain(transformed) {
            if table.by_route.contains_key(route) {
                continue;
            }
            let output = table.free_output(route, output_extensions);
            table.insert(route.clone(), output);
        }

        table
    }

    /// Output route assigned to a source route.
    pub fn output_of(&self, route: &Route) -> Option<&Route> {
        self.by_route.get(route)
    }

    /// Source route an output route was compiled from.
    pub fn original_of(&self, output: &Route) -> Option<&Route> {
        self.by_output.get(output)
    }

    /// Whether `output` is a known output route.
    pub fn is_output(&self, output: &Route) -> bool {
        self.by_output.contains_key(output)
    }

    /// Whether the source route's extension carries a type declaration.
    pub fn has_declaration(&self, route: &Route) -> bool {
        route
            .extension()
            .is_some_and(|ext| self.declared.contains(ext))
    }

    pub fn len(&self) -> usize {
        self.by_route.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_route.is_empty()
    }

    // -------------------------------------------------------------------------
    // Private
    // -------------------------------------------------------------------------

    fn insert(&mut self, route: Route, output: Route) {
        self.by_output.insert(output.clone(), route.clone());
        self.by_route.insert(route, output);
    }

    /// First unclaimed output candidate for `route`.
    fn free_output(&self, route: &Route, output_extensions: &FxHashMap<String, String>) -> Route {
        let out_ext = output_extension(route, output_extensions);
        let preferred = match out_ext {
            Some(ext) => route.with_extension(ext),
            None => route.clone(),
        };
        if !self.by_output.contains_key(&preferred) {
            return preferred;
        }

        let candidate = |n: usize| match (out_ext, route.extension()) {
            (Some(ext), _) if n == 0 => route.with_suffix(&format!(".{ext}")),
            (Some(ext), _) => route.with_suffix(&format!(".{n}.{ext}")),
            (None, Some(ext)) => route.with_extension(&format!("{}.{ext}", n + 1)),
            (None, None) => route.with_suffix(&format!(".{}", n + 1)),
        };

        (0..)
            .map(candidate)
            .find(|c| !self.by_output.contains_key(c))
            .unwrap_or(preferred)
    }
}

/// Registered output extension for a route's source extension.
fn output_extension<'a>(
    route: &Route,
    output_extensions: &'a FxHashMap<String, String>,
) -> Option<&'a str> {
    route
        .extension()
        .and_then(|ext| output_extensions.get(ext))
        .map(String::as_str)
}
