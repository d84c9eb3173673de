//! Kiln - build orchestration for static and server-rendered web applications.
//!
//! A [`Mediator`] discovers source files, classifies them against a
//! content-hash cache, compiles them through per-extension transpilers
//! (once per render mode), rewrites their imports to stable output paths,
//! builds page shells, bundles page dependencies and hands a route table
//! to the serving layer.
//!
//! ```ignore
//! let mut mediator = Mediator::new(root).with_ssr(true);
//! mediator.declare_transpilation("page", "js", |file, mode| compile(file, mode));
//! mediator.set_page_handler("page", |input| Ok(Some(shell(input.route))));
//! mediator.build(&["public".into()]).await?;
//! let routes = mediator.route_table();
//! ```

pub mod address;
pub mod bundler;
pub mod cache;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod core;
pub mod error;
pub mod freshness;
pub mod logger;
pub mod mediator;
pub mod page;
pub mod plugin;
pub mod plugins;
pub mod scan;
pub mod typegen;

pub use error::{BuildError, Result};
pub use mediator::{BuildReport, Mediator, RouteContent, RouteEntry};
