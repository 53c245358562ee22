// Module layout (Clean Architecture style)
// - bootstrap: configuration and startup
// - infrastructure: DB and mail adapters
// - presentation: HTTP handlers, session cookies, HTML views
// - application: ports, use cases, pagination and token primitives
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
